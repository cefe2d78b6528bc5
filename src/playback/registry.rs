// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use anyhow::{anyhow, Result};
use rustc_hash::{FxHashMap, FxHashSet};

/// The runtime state of one slot: its playback handle and the counters that
/// must survive across re-evaluations.
#[derive(Debug)]
pub struct SlotRuntime<H> {
    pub(crate) handle: H,
    pub(crate) orig_src: String,
    pub(crate) loop_count: usize,

    /// Extra copies started by [TriggerMode::Multi]. They don't count toward
    /// the loop budget and are dropped once they end.
    pub(crate) spawned: Vec<H>,

    /// Set when the source was (re)assigned and the handle hasn't been moved
    /// to the declared offset since.
    pub(crate) rewind_pending: bool,
}
impl<H: PlaysAudio> SlotRuntime<H> {
    /// Wraps a freshly created handle, which is expected to be paused.
    pub fn new_with(handle: H) -> Self {
        Self {
            handle,
            orig_src: String::default(),
            loop_count: 0,
            spawned: Vec::default(),
            rewind_pending: false,
        }
    }

    #[allow(missing_docs)]
    pub fn handle(&self) -> &H {
        &self.handle
    }

    #[allow(missing_docs)]
    pub fn handle_mut(&mut self) -> &mut H {
        &mut self.handle
    }

    /// The source most recently assigned to the handle.
    pub fn orig_src(&self) -> &str {
        &self.orig_src
    }

    /// Play-throughs started since the slot was last stopped.
    pub fn loop_count(&self) -> usize {
        self.loop_count
    }

    /// Multi-trigger copies that are still live.
    pub fn spawned(&self) -> &[H] {
        &self.spawned
    }

    /// Pauses the handle and every spawned copy.
    fn silence(&mut self) {
        self.handle.pause();
        self.spawned.iter_mut().for_each(|h| h.pause());
    }
}

/// Everything the system remembers about one element.
#[derive(Debug)]
pub struct ElementAudio<H> {
    slots: FxHashMap<usize, SlotRuntime<H>>,

    /// The record most recently applied, with `default` states resolved.
    pub(crate) last_applied: Option<PropertyRecord>,

    /// Interaction categories whose listeners are attached.
    pub(crate) bound: FxHashSet<PseudoState>,

    /// The record to apply when a press ends.
    pub(crate) active_snapshot: Option<PropertyRecord>,
}
impl<H> Default for ElementAudio<H> {
    fn default() -> Self {
        Self {
            slots: Default::default(),
            last_applied: Default::default(),
            bound: Default::default(),
            active_snapshot: Default::default(),
        }
    }
}
impl<H: PlaysAudio> ElementAudio<H> {
    /// Returns the slot's runtime state, creating it with `create` on first
    /// use. Later calls return the same state and never call `create`.
    pub fn get_or_create(
        &mut self,
        key: SlotKey,
        create: impl FnOnce(SlotKey) -> H,
    ) -> &mut SlotRuntime<H> {
        self.slots
            .entry(key.slot)
            .or_insert_with(|| SlotRuntime::new_with(create(key)))
    }

    #[allow(missing_docs)]
    pub fn slot(&self, index: usize) -> Option<&SlotRuntime<H>> {
        self.slots.get(&index)
    }

    /// The number of slots whose handles have been created.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[allow(missing_docs)]
    pub fn last_applied(&self) -> Option<&PropertyRecord> {
        self.last_applied.as_ref()
    }

    #[allow(missing_docs)]
    pub fn is_bound(&self, category: PseudoState) -> bool {
        self.bound.contains(&category)
    }
}

/// Owns the per-element audio state of every element the system knows
/// about, keyed by [ElementUid].
#[derive(Debug)]
pub struct PlaybackRegistry<H> {
    elements: FxHashMap<ElementUid, ElementAudio<H>>,
}
impl<H> Default for PlaybackRegistry<H> {
    fn default() -> Self {
        Self {
            elements: Default::default(),
        }
    }
}
impl<H: PlaysAudio> PlaybackRegistry<H> {
    /// Starts tracking `element`. Returns false if it was already known.
    pub fn register(&mut self, element: ElementUid) -> bool {
        if self.elements.contains_key(&element) {
            false
        } else {
            self.elements.insert(element, ElementAudio::default());
            true
        }
    }

    #[allow(missing_docs)]
    pub fn contains(&self, element: ElementUid) -> bool {
        self.elements.contains_key(&element)
    }

    #[allow(missing_docs)]
    pub fn element(&self, element: ElementUid) -> Option<&ElementAudio<H>> {
        self.elements.get(&element)
    }

    #[allow(missing_docs)]
    pub fn element_mut(&mut self, element: ElementUid) -> Option<&mut ElementAudio<H>> {
        self.elements.get_mut(&element)
    }

    /// Like [PlaybackRegistry::element_mut()], but registers the element
    /// first if needed.
    pub fn entry(&mut self, element: ElementUid) -> &mut ElementAudio<H> {
        self.elements.entry(element).or_default()
    }

    /// Returns the slot's runtime state, creating it (and registering its
    /// element) on first use.
    pub fn get_or_create(
        &mut self,
        key: SlotKey,
        create: impl FnOnce(SlotKey) -> H,
    ) -> &mut SlotRuntime<H> {
        self.entry(key.element).get_or_create(key, create)
    }

    /// Returns an existing slot.
    pub fn slot(&self, key: SlotKey) -> Result<&SlotRuntime<H>> {
        self.elements
            .get(&key.element)
            .ok_or_else(|| anyhow!("Element {} not found", key.element))?
            .slot(key.slot)
            .ok_or_else(|| anyhow!("Slot {key} not found"))
    }

    /// Calls `f` with every created slot of `element`.
    pub fn for_each(&mut self, element: ElementUid, mut f: impl FnMut(usize, &mut SlotRuntime<H>)) {
        if let Some(audio) = self.elements.get_mut(&element) {
            audio.slots.iter_mut().for_each(|(index, slot)| f(*index, slot));
        }
    }

    /// Stops tracking `element`, pausing all of its sound. Returns the state
    /// that was released, if the element was known.
    pub fn release(&mut self, element: ElementUid) -> Option<ElementAudio<H>> {
        let mut audio = self.elements.remove(&element)?;
        audio.slots.values_mut().for_each(SlotRuntime::silence);
        Some(audio)
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

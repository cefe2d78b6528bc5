// Copyright (c) 2024 Mike Tsao

use super::{CssaEvent, CssaInput, Interaction, TreeChange, TriggerBinder};
use crate::{
    playback::{apply, PlaybackRegistry, Transition},
    prelude::*,
    style::{read_all, HeadNode},
    types::CrossbeamChannel,
};
use crossbeam::channel::Receiver;
use delegate::delegate;
use std::sync::Arc;

/// Drives the whole system. Feed it [CssaInput]s as they happen; it reads
/// fresh snapshots from the [Document], runs the slot state machine, and
/// reports its bookkeeping as [CssaEvent]s.
///
/// The [Conductor] owns the playback engine and every handle, but only
/// borrows the document, so the caller is free to change the document
/// between inputs.
#[derive(Debug)]
pub struct Conductor<E: CreatesPlayback> {
    settings: Arc<CssaSettings>,
    engine: E,
    registry: PlaybackRegistry<E::Handle>,
    binder: TriggerBinder,
    events: CrossbeamChannel<CssaEvent>,
}
impl<E: CreatesPlayback> Conductor<E> {
    #[allow(missing_docs)]
    pub fn new_with(settings: CssaSettings, engine: E) -> Self {
        let settings = Arc::new(settings);
        Self {
            binder: TriggerBinder::new_with(&settings),
            settings,
            engine,
            registry: Default::default(),
            events: Default::default(),
        }
    }

    /// Sets up the elements already in the tree, if configured to.
    pub fn start<D: Document + ?Sized>(&mut self, document: &D) {
        if self.settings.process_existing_tree() {
            for element in document.descendants(document.root()) {
                self.process_element(document, element, false);
            }
        }
        log::info!("Tracking {} element(s)", self.registry.len());
    }

    /// Handles one input.
    pub fn handle_input<D: Document + ?Sized>(&mut self, document: &D, input: CssaInput) {
        match input {
            CssaInput::Tree(change) => self.handle_tree_change(document, change),
            CssaInput::Interaction(element, interaction) => {
                self.handle_interaction(document, element, interaction);
            }
            CssaInput::PlaybackEnded(key) => {
                self.handle_playback_ended(document, key);
            }
            CssaInput::EndTurn => self.end_turn(document),
        }
    }

    #[allow(missing_docs)]
    pub fn handle_tree_change<D: Document + ?Sized>(&mut self, document: &D, change: TreeChange) {
        match change {
            TreeChange::NodeAdded(element) | TreeChange::AttributeChanged(element) => {
                if !self.settings.observe_tree_changes() {
                    return;
                }
                for element in self.affected(document, element) {
                    self.process_element(document, element, false);
                }
            }
            TreeChange::NodeRemoved(element) => {
                if !self.settings.observe_tree_changes() {
                    return;
                }
                // Handles would otherwise outlive the subtree, so this
                // ignores recurse_into_children.
                let mut removed = vec![element];
                removed.extend(document.descendants(element));
                for element in removed {
                    if self.registry.release(element).is_some() {
                        log::debug!("Released {element}");
                        let _ = self.events.sender.send(CssaEvent::ElementReleased(element));
                    }
                }
            }
            TreeChange::HeadNodeAdded(node) => self.handle_head_node(document, &node),
        }
    }

    fn handle_head_node<D: Document + ?Sized>(&mut self, document: &D, node: &HeadNode) {
        if self.settings.observe_style_insertions() && node.affects_styles() {
            log::debug!("New stylesheet <{}>; rescanning", node.tag);
            self.rescan(document);
        }
    }

    /// Applies whatever the interaction calls for. Returns the transitions,
    /// which are empty if the interaction was ignored or deferred.
    pub fn handle_interaction<D: Document + ?Sized>(
        &mut self,
        document: &D,
        element: ElementUid,
        interaction: Interaction,
    ) -> Vec<Transition> {
        match self
            .binder
            .on_interaction(document, &self.registry, element, interaction)
        {
            Some(record) => apply(&mut self.registry, &mut self.engine, element, record),
            None => Vec::default(),
        }
    }

    /// Re-evaluates the element that owns the finished slot. Completions for
    /// slots that are no longer tracked are ignored.
    pub fn handle_playback_ended<D: Document + ?Sized>(
        &mut self,
        document: &D,
        key: SlotKey,
    ) -> Vec<Transition> {
        if let Err(e) = self.registry.slot(key) {
            log::debug!("Ignoring completion of {key}: {e}");
            return Vec::default();
        }
        self.apply_snapshot(document, key.element)
    }

    /// Runs the work that was waiting for the end of the turn.
    pub fn end_turn<D: Document + ?Sized>(&mut self, document: &D) {
        self.binder.flush_deferred(document, &mut self.registry);
    }

    /// Processes the whole tree again, and re-binds known elements because
    /// the set of rules may have changed.
    pub fn rescan<D: Document + ?Sized>(&mut self, document: &D) {
        for element in document.descendants(document.root()) {
            self.process_element(document, element, true);
        }
    }

    /// Reads a fresh snapshot of `element` and applies it.
    pub fn apply_snapshot<D: Document + ?Sized>(
        &mut self,
        document: &D,
        element: ElementUid,
    ) -> Vec<Transition> {
        let record = read_all(document, element);
        apply(&mut self.registry, &mut self.engine, element, record)
    }

    fn affected<D: Document + ?Sized>(&self, document: &D, element: ElementUid) -> Vec<ElementUid> {
        let mut affected = vec![element];
        if self.settings.recurse_into_children() {
            affected.extend(document.descendants(element));
        }
        affected
    }

    /// Known elements are re-applied (and re-bound if asked). Unknown ones
    /// are set up if they declare a sound.
    fn process_element<D: Document + ?Sized>(
        &mut self,
        document: &D,
        element: ElementUid,
        rebind: bool,
    ) {
        if self.registry.contains(element) {
            self.apply_snapshot(document, element);
            if rebind {
                self.bind(document, element);
            }
            return;
        }
        let record = read_all(document, element);
        if !record.has_source() {
            return;
        }
        self.registry.register(element);
        log::debug!("Registered {element}");
        let _ = self.events.sender.send(CssaEvent::ElementRegistered(element));
        apply(&mut self.registry, &mut self.engine, element, record);
        self.bind(document, element);
    }

    fn bind<D: Document + ?Sized>(&mut self, document: &D, element: ElementUid) {
        for category in self.binder.bind(document, &mut self.registry, element) {
            let _ = self
                .events
                .sender
                .send(CssaEvent::ListenerBound(element, category));
        }
    }

    delegate! {
        to self.registry {
            #[call(contains)]
            /// Whether `element` is tracked.
            pub fn is_tracked(&self, element: ElementUid) -> bool;
        }
    }

    #[allow(missing_docs)]
    pub fn settings(&self) -> &CssaSettings {
        &self.settings
    }

    #[allow(missing_docs)]
    pub fn registry(&self) -> &PlaybackRegistry<E::Handle> {
        &self.registry
    }

    #[allow(missing_docs)]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    #[allow(missing_docs)]
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Where [CssaEvent]s arrive.
    ///
    /// The channel is unbounded and the [Conductor] holds both ends, so
    /// events stay queued until someone drains this receiver. Hosts that
    /// don't care about them should still drain it now and then.
    pub fn receiver(&self) -> &Receiver<CssaEvent> {
        &self.events.receiver
    }
}

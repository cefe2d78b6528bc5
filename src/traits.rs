// Copyright (c) 2024 Mike Tsao

//! The traits that describe the platform this crate plugs into: where
//! computed styles come from, what the element tree looks like, and what
//! makes the sound.

use crate::{style::ElementIdentity, types::prelude::*};
use core::time::Duration;

/// Quick import of all important traits.
pub mod prelude {
    pub use super::{
        CreatesPlayback, Document, HasElementTree, MatchesRules, PlaysAudio, ProvidesStyles,
    };
}

/// Something that [ProvidesStyles] can report the computed value of a
/// property for an element. The value should reflect any interaction state
/// (hover, focus, and so on) that currently applies to the element.
pub trait ProvidesStyles {
    /// Returns the computed value of `property`, or an empty string if the
    /// element doesn't declare it.
    fn computed_value(&self, element: ElementUid, property: &str) -> String;
}

/// Answers whether the current style rules say anything about an element in
/// a given interaction state.
pub trait MatchesRules {
    /// True if any known rule's selector text ends with exactly
    /// `{selector}:{pseudo}`.
    fn has_rule_targeting(&self, selector: &str, pseudo: PseudoState) -> bool;
}

/// The shape of the observed tree.
pub trait HasElementTree {
    /// The element whose descendants are observed.
    fn root(&self) -> ElementUid;

    /// The element's children, in document order. Elements that have been
    /// detached from the tree should still report their own children.
    fn children(&self, element: ElementUid) -> Vec<ElementUid>;

    /// The element's tag, id, and classes, or [None] if the element is
    /// unknown.
    fn identity(&self, element: ElementUid) -> Option<ElementIdentity>;

    /// Every descendant of `element`, in document order, not including
    /// `element` itself.
    fn descendants(&self, element: ElementUid) -> Vec<ElementUid> {
        let mut found = Vec::default();
        let mut stack: Vec<ElementUid> = self.children(element).into_iter().rev().collect();
        while let Some(uid) = stack.pop() {
            found.push(uid);
            stack.extend(self.children(uid).into_iter().rev());
        }
        found
    }
}

/// Everything the system needs to know about the visual side of the
/// platform.
pub trait Document: ProvidesStyles + MatchesRules + HasElementTree {}
impl<T: ProvidesStyles + MatchesRules + HasElementTree> Document for T {}

/// One playable sound. Implementations wrap whatever the platform uses for
/// media output.
///
/// A handle is paused when created. Reaching the end of the sound leaves it
/// paused and ended; seeking back into the sound clears `ended`. Only
/// reaching the end, never a pause or seek, is reported as a completion.
pub trait PlaysAudio: core::fmt::Debug {
    /// Starts or resumes playback. Playing an ended handle starts over.
    fn play(&mut self);

    /// Pauses playback, keeping the position.
    fn pause(&mut self);

    /// Moves the playback position.
    fn seek(&mut self, position: Duration);

    /// Sets the output level.
    fn set_volume(&mut self, volume: Volume);

    /// The current output level.
    fn volume(&self) -> Volume;

    /// Replaces the sound. Whatever was playing stops, and the position
    /// returns to the beginning.
    fn set_source(&mut self, source: &str);

    #[allow(missing_docs)]
    fn is_paused(&self) -> bool;

    /// Whether the handle played through to the end and hasn't been rewound
    /// since.
    fn is_ended(&self) -> bool;

    /// Returns an independent, paused handle for the same source. The copy
    /// never reports completions.
    fn duplicate(&self) -> Self
    where
        Self: Sized;
}

/// The playback engine. It makes one handle per slot, and remembers the
/// [SlotKey] so that it can report the handle's completions back to the
/// system, typically as a
/// [CssaInput::PlaybackEnded](crate::orchestration::CssaInput::PlaybackEnded).
///
/// Completions must be queued, not reported from inside a [PlaysAudio]
/// method call.
pub trait CreatesPlayback {
    #[allow(missing_docs)]
    type Handle: PlaysAudio;

    /// Creates the handle for `key`.
    fn create_handle(&mut self, key: SlotKey) -> Self::Handle;
}

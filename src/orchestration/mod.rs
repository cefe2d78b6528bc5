// Copyright (c) 2024 Mike Tsao

//! Keeps every element's sound in step with its declarations as the tree,
//! the stylesheets, and the user's interactions change.

use crate::{prelude::*, style::HeadNode};
use strum_macros::Display;

/// The most commonly used imports.
pub mod prelude {
    pub use super::{Conductor, CssaEvent, CssaInput, Interaction, TreeChange, TriggerBinder};
}

pub use {binder::TriggerBinder, conductor::Conductor};

mod binder;
mod conductor;

/// A structural change reported by whoever watches the tree.
#[derive(Clone, Debug, PartialEq)]
pub enum TreeChange {
    /// An element was inserted. Its descendants came with it.
    NodeAdded(ElementUid),
    /// An element and its subtree were taken out of the tree.
    NodeRemoved(ElementUid),
    /// An element's inline style, class, or id changed.
    AttributeChanged(ElementUid),
    /// A node was added to the head-like region of the document.
    HeadNodeAdded(HeadNode),
}

/// A user interaction with one element.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Interaction {
    PressStart,
    PressEnd,
    HoverEnter,
    HoverExit,
    FocusGained,
    FocusLost,
    Toggled,
}
impl Interaction {
    /// The interaction state this interaction enters or leaves.
    pub fn category(&self) -> PseudoState {
        match self {
            Interaction::PressStart | Interaction::PressEnd => PseudoState::Active,
            Interaction::HoverEnter | Interaction::HoverExit => PseudoState::Hover,
            Interaction::FocusGained | Interaction::FocusLost => PseudoState::Focus,
            Interaction::Toggled => PseudoState::Checked,
        }
    }
}

/// Everything the [Conductor] reacts to.
#[derive(Clone, Debug, PartialEq)]
pub enum CssaInput {
    #[allow(missing_docs)]
    Tree(TreeChange),
    #[allow(missing_docs)]
    Interaction(ElementUid, Interaction),
    /// A slot's handle played to the end. Engines queue these and deliver
    /// them later, never from inside a handle call.
    PlaybackEnded(SlotKey),
    /// The current scheduling turn is over. Work deferred until then runs
    /// now.
    EndTurn,
}

/// Notifications the [Conductor] sends about its own bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CssaEvent {
    /// The element declared a sound and is now tracked.
    ElementRegistered(ElementUid),
    /// The element left the tree and its sounds were silenced.
    ElementReleased(ElementUid),
    /// A listener for the interaction state was attached to the element.
    ListenerBound(ElementUid, PseudoState),
}

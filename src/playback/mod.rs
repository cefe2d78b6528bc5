// Copyright (c) 2024 Mike Tsao

//! Slot playback: the state machine that decides what each slot's sound
//! should do, and the registry that owns the sounds.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{apply, apply_slot, PlaybackRegistry, SlotRuntime, Transition};
}

pub use {
    machine::{apply, apply_slot, Transition},
    registry::{ElementAudio, PlaybackRegistry, SlotRuntime},
};

mod machine;
mod registry;

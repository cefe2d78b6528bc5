// Copyright (c) 2024 Mike Tsao

//! Common data types used throughout the system.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        AudioSource, DeclaredValue, ElementUid, LoopLimit, PlaybackIntent, PlaybackMode,
        PropertyName, PropertyRecord, PseudoState, SlotKey, SlotSettings, TimeOffset,
        TriggerMode, Volume,
    };
}

pub use {
    channels::CrossbeamChannel,
    properties::{split_entries, PropertyName, PropertyRecord, SlotSettings},
    uid::{ElementUid, ElementUidFactory, SlotKey},
    values::{
        AudioSource, DeclaredValue, LoopLimit, PlaybackIntent, PlaybackMode, PseudoState,
        TimeOffset, TriggerMode, ValueError, Volume,
    },
};

mod channels;
mod properties;
mod uid;
mod values;

// Copyright (c) 2024 Mike Tsao

//! Simple in-memory stand-ins for the platform: a tree with declared styles
//! and a playback engine whose clock moves only when asked. Useful for tests,
//! demos, and for learning how the pieces fit together.

pub use {
    document::ToyDocument,
    engine::{ToyPlayback, ToyPlaybackEngine},
};

mod document;
mod engine;

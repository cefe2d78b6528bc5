// Copyright (c) 2024 Mike Tsao

#![deny(missing_docs, unused_imports, unused_variables)]
#![allow(rustdoc::private_intra_doc_links)]

//! Cssa plays sounds that a tree of visual elements declares in its styles.
//!
//! Each element declares comma-separated lists of audio properties (a
//! `source`, a `state` of playing, paused, or stopped, a `loop` count, and so
//! on). The lists are zipped by index into *slots*, and each slot drives one
//! playback handle. Whenever the declarations might have changed, the system
//! re-reads them and moves each slot's handle to match.
//!
//! The platform is abstracted behind a few traits (see [traits]):
//! [Document](traits::Document) supplies computed styles, rules, and the tree
//! shape, and [CreatesPlayback](traits::CreatesPlayback) makes the sounds.
//!
//! * *Most of the time*: create a [Conductor], call
//! [Conductor::start()], and send it a [CssaInput] whenever the tree
//! changes, the user interacts with an element, or a sound finishes.
//! * *For more control*: read snapshots with [style::read_snapshot()] and run
//! them through [playback::apply()] against your own
//! [PlaybackRegistry](playback::PlaybackRegistry).
//!
//! The [toys] module has a fake document and a silent engine that are handy
//! for experiments and tests.

/// A collection of imports that are useful to users of this crate. `use
/// cssa::prelude::*;` for easier onboarding.
pub mod prelude {
    pub use super::{
        orchestration::prelude::*, playback::prelude::*, style::prelude::*, traits::prelude::*,
        types::prelude::*, util::prelude::*,
    };
}

// Fundamental structures that are important enough to re-export at top level.
pub use {
    orchestration::{Conductor, CssaInput},
    util::CssaSettings,
};

pub mod orchestration;
pub mod playback;
pub mod style;
pub mod toys;
pub mod traits;
pub mod types;
pub mod util;

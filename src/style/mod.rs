// Copyright (c) 2024 Mike Tsao

//! Reading declared audio properties, and describing elements the way style
//! rules do.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{read_snapshot, ElementIdentity, StyleRules};
}

pub use {
    reader::{read_all, read_snapshot},
    rules::{ElementIdentity, HeadNode, StyleRules},
};

mod reader;
mod rules;

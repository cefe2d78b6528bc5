// Copyright (c) 2024 Mike Tsao

//! System utilities.

/// Commonly used imports.
pub mod prelude {
    pub use super::settings::{CssaSettings, CssaSettingsBuilder};
}

pub use settings::{CssaSettings, CssaSettingsBuilder};

mod settings;

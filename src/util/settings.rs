// Copyright (c) 2024 Mike Tsao

//! Configuration for the whole system. Intended to be serialized.

use crate::prelude::*;
use anyhow::Result;
use derivative::Derivative;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Decides which kinds of change the system reacts to. Built once, then
/// shared read-only.
#[derive(Clone, Debug, Derivative, Builder, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[builder(default)]
#[serde(rename_all = "kebab-case", default)]
pub struct CssaSettings {
    /// Whether [Conductor::start()](crate::orchestration::Conductor::start())
    /// sets up the elements that already exist.
    #[derivative(Default(value = "true"))]
    process_existing_tree: bool,

    /// Whether added, removed, and changed elements are handled.
    #[derivative(Default(value = "true"))]
    observe_tree_changes: bool,

    /// Whether a new stylesheet causes a rescan.
    #[derivative(Default(value = "true"))]
    observe_style_insertions: bool,

    /// Whether tree changes also cover the changed element's descendants.
    #[derivative(Default(value = "true"))]
    recurse_into_children: bool,

    /// The interaction states that get listeners when a rule targets them.
    #[derivative(Default(value = "PseudoState::iter().collect()"))]
    interaction_categories: Vec<PseudoState>,
}
impl CssaSettings {
    /// Reads settings from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[allow(missing_docs)]
    pub fn process_existing_tree(&self) -> bool {
        self.process_existing_tree
    }

    #[allow(missing_docs)]
    pub fn observe_tree_changes(&self) -> bool {
        self.observe_tree_changes
    }

    #[allow(missing_docs)]
    pub fn observe_style_insertions(&self) -> bool {
        self.observe_style_insertions
    }

    #[allow(missing_docs)]
    pub fn recurse_into_children(&self) -> bool {
        self.recurse_into_children
    }

    #[allow(missing_docs)]
    pub fn interaction_categories(&self) -> &[PseudoState] {
        &self.interaction_categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_observe_everything() {
        let settings = CssaSettings::default();
        assert!(settings.process_existing_tree());
        assert!(settings.observe_tree_changes());
        assert!(settings.observe_style_insertions());
        assert!(settings.recurse_into_children());
        assert_eq!(
            settings.interaction_categories(),
            &[
                PseudoState::Active,
                PseudoState::Hover,
                PseudoState::Focus,
                PseudoState::Checked
            ]
        );
        assert_eq!(CssaSettingsBuilder::default().build().unwrap(), settings);
    }

    #[test]
    fn json_fills_in_missing_fields() {
        let settings = CssaSettings::from_json_str(
            r#"{ "recurse-into-children": false, "interaction-categories": ["hover"] }"#,
        )
        .unwrap();
        assert!(!settings.recurse_into_children());
        assert!(settings.observe_tree_changes());
        assert_eq!(settings.interaction_categories(), &[PseudoState::Hover]);

        assert!(CssaSettings::from_json_str("{").is_err());
        assert!(
            CssaSettings::from_json_str(r#"{ "interaction-categories": ["visited"] }"#).is_err()
        );
    }

    #[test]
    fn round_trips_through_json() {
        let settings = CssaSettingsBuilder::default()
            .observe_style_insertions(false)
            .build()
            .unwrap();
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"observe-style-insertions\":false"));
        assert_eq!(CssaSettings::from_json_str(&json).unwrap(), settings);
    }
}

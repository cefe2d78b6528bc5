// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use serde::{Deserialize, Serialize};

/// What a style rule can see of an element: its tag, id, and classes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ElementIdentity {
    #[allow(missing_docs)]
    pub tag: String,
    #[allow(missing_docs)]
    pub id: Option<String>,
    #[allow(missing_docs)]
    pub classes: Vec<String>,
}
impl ElementIdentity {
    #[allow(missing_docs)]
    pub fn new_with(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    #[allow(missing_docs)]
    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Appends every whitespace-separated class name in `classes`.
    pub fn classes(mut self, classes: &str) -> Self {
        self.classes
            .extend(classes.split_whitespace().map(str::to_string));
        self
    }

    /// The compound selector that describes this element, formatted as
    /// `tag#id.class1.class2`. The tag is lowercased; the id and class parts
    /// are omitted when absent.
    pub fn selector(&self) -> String {
        let mut selector = self.tag.to_lowercase();
        if let Some(id) = self.id.as_ref().filter(|id| !id.is_empty()) {
            selector.push('#');
            selector.push_str(id);
        }
        for class in self.classes.iter().filter(|c| !c.is_empty()) {
            selector.push('.');
            selector.push_str(class);
        }
        selector
    }
}

/// The selector texts of every known style rule.
///
/// Matching is coarse: a rule targets an element in a state if
/// its selector text ends with the element's selector plus the state, so
/// `.menu button.ok:hover` targets `button.ok` in [PseudoState::Hover].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRules {
    selector_texts: Vec<String>,
}
impl StyleRules {
    /// Records one rule's selector text.
    pub fn add_rule(&mut self, selector_text: &str) {
        self.selector_texts.push(selector_text.trim().to_string());
    }

    #[allow(missing_docs)]
    pub fn selector_texts(&self) -> &[String] {
        &self.selector_texts
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.selector_texts.is_empty()
    }
}
impl MatchesRules for StyleRules {
    fn has_rule_targeting(&self, selector: &str, pseudo: PseudoState) -> bool {
        let target = format!("{selector}:{pseudo}");
        self.selector_texts.iter().any(|text| text.ends_with(&target))
    }
}

/// A node that appeared in the head-like region of the document. Only some
/// of them change which style rules exist.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeadNode {
    /// The node's tag name.
    pub tag: String,
    /// The node's `rel` attribute, if any.
    pub rel: Option<String>,
}
impl HeadNode {
    #[allow(missing_docs)]
    pub fn new_with(tag: &str, rel: Option<&str>) -> Self {
        Self {
            tag: tag.to_string(),
            rel: rel.map(str::to_string),
        }
    }

    /// True for inline `<style>` elements and `rel="stylesheet"` links.
    pub fn affects_styles(&self) -> bool {
        self.tag.eq_ignore_ascii_case("style")
            || self
                .rel
                .as_deref()
                .is_some_and(|rel| rel.eq_ignore_ascii_case("stylesheet"))
    }
}

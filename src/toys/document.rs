// Copyright (c) 2024 Mike Tsao

use crate::{prelude::*, types::ElementUidFactory};
use rustc_hash::{FxHashMap, FxHashSet};
use strum::IntoEnumIterator;

#[derive(Debug, Default)]
struct ToyElement {
    identity: ElementIdentity,
    parent: Option<ElementUid>,
    children: Vec<ElementUid>,
    declared: FxHashMap<PropertyName, String>,
    when: FxHashMap<PseudoState, FxHashMap<PropertyName, String>>,
    states: FxHashSet<PseudoState>,
}

/// An in-memory element tree with just enough of a style engine to drive the
/// system: each element carries its own declarations, plus overrides that
/// apply while it's in a given [PseudoState].
///
/// [ToyDocument::declare_when()] also records a rule whose selector text
/// targets the element in that state, so the binder sees it.
#[derive(Debug)]
pub struct ToyDocument {
    uid_factory: ElementUidFactory,
    root: ElementUid,
    elements: FxHashMap<ElementUid, ToyElement>,
    rules: StyleRules,
}
impl Default for ToyDocument {
    fn default() -> Self {
        let uid_factory = ElementUidFactory::default();
        let root = uid_factory.mint_next();
        let mut elements = FxHashMap::default();
        elements.insert(
            root,
            ToyElement {
                identity: ElementIdentity::new_with("body"),
                ..Default::default()
            },
        );
        Self {
            uid_factory,
            root,
            elements,
            rules: Default::default(),
        }
    }
}
impl ToyDocument {
    /// Adds a new element as the last child of `parent`.
    pub fn create_element(&mut self, parent: ElementUid, identity: ElementIdentity) -> ElementUid {
        let uid = self.uid_factory.mint_next();
        self.elements.insert(
            uid,
            ToyElement {
                identity,
                parent: Some(parent),
                ..Default::default()
            },
        );
        if let Some(parent) = self.elements.get_mut(&parent) {
            parent.children.push(uid);
        }
        uid
    }

    /// Takes `element` out of the tree. The element and its subtree still
    /// exist, so their descendants can be walked after removal.
    pub fn detach(&mut self, element: ElementUid) {
        let parent = self.elements.get_mut(&element).and_then(|e| e.parent.take());
        if let Some(parent) = parent.and_then(|p| self.elements.get_mut(&p)) {
            parent.children.retain(|c| *c != element);
        }
    }

    /// Sets the value `element` declares for `name` regardless of state.
    pub fn declare(&mut self, element: ElementUid, name: PropertyName, value: &str) {
        if let Some(e) = self.elements.get_mut(&element) {
            e.declared.insert(name, value.to_string());
        }
    }

    /// Sets the value `element` declares for `name` while it's in `pseudo`,
    /// and records the matching rule.
    pub fn declare_when(
        &mut self,
        element: ElementUid,
        pseudo: PseudoState,
        name: PropertyName,
        value: &str,
    ) {
        if let Some(e) = self.elements.get_mut(&element) {
            e.when
                .entry(pseudo)
                .or_default()
                .insert(name, value.to_string());
            let selector = e.identity.selector();
            self.rules.add_rule(&format!("{selector}:{pseudo}"));
        }
    }

    /// Puts `element` into or out of `pseudo`.
    pub fn set_state(&mut self, element: ElementUid, pseudo: PseudoState, is_on: bool) {
        if let Some(e) = self.elements.get_mut(&element) {
            if is_on {
                e.states.insert(pseudo);
            } else {
                e.states.remove(&pseudo);
            }
        }
    }

    /// Replaces the element's classes.
    pub fn set_classes(&mut self, element: ElementUid, classes: &str) {
        if let Some(e) = self.elements.get_mut(&element) {
            e.identity.classes = classes.split_whitespace().map(str::to_string).collect();
        }
    }

    #[allow(missing_docs)]
    pub fn set_id(&mut self, element: ElementUid, id: Option<&str>) {
        if let Some(e) = self.elements.get_mut(&element) {
            e.identity.id = id.map(str::to_string);
        }
    }

    /// Direct access to the rule list, for adding rules that no element
    /// declares values for.
    pub fn rules_mut(&mut self) -> &mut StyleRules {
        &mut self.rules
    }

    #[allow(missing_docs)]
    pub fn parent(&self, element: ElementUid) -> Option<ElementUid> {
        self.elements.get(&element).and_then(|e| e.parent)
    }
}
impl ProvidesStyles for ToyDocument {
    fn computed_value(&self, element: ElementUid, property: &str) -> String {
        let Ok(name) = property.parse::<PropertyName>() else {
            return String::default();
        };
        let Some(e) = self.elements.get(&element) else {
            return String::default();
        };
        // Later states win, the way later rules would.
        PseudoState::iter()
            .filter(|pseudo| e.states.contains(pseudo))
            .filter_map(|pseudo| e.when.get(&pseudo).and_then(|m| m.get(&name)))
            .last()
            .or_else(|| e.declared.get(&name))
            .cloned()
            .unwrap_or_default()
    }
}
impl MatchesRules for ToyDocument {
    fn has_rule_targeting(&self, selector: &str, pseudo: PseudoState) -> bool {
        self.rules.has_rule_targeting(selector, pseudo)
    }
}
impl HasElementTree for ToyDocument {
    fn root(&self) -> ElementUid {
        self.root
    }

    fn children(&self, element: ElementUid) -> Vec<ElementUid> {
        self.elements
            .get(&element)
            .map(|e| e.children.clone())
            .unwrap_or_default()
    }

    fn identity(&self, element: ElementUid) -> Option<ElementIdentity> {
        self.elements.get(&element).map(|e| e.identity.clone())
    }
}

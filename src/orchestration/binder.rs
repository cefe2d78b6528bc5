// Copyright (c) 2024 Mike Tsao

use super::Interaction;
use crate::{playback::PlaybackRegistry, prelude::*, style::read_all};
use std::sync::Arc;

/// Emulates interaction-state style rules. An element gets a listener for
/// a state only if some rule targets it in that state; after that,
/// interactions in that state re-evaluate the element's sound.
///
/// Pressing is special. Some platforms update the pressed style only after
/// reporting the press, so the snapshot taken at press-start waits until the
/// end of the turn, and is applied when the press ends.
#[derive(Debug)]
pub struct TriggerBinder {
    settings: Arc<CssaSettings>,
    pending_active: Vec<ElementUid>,
}
impl TriggerBinder {
    #[allow(missing_docs)]
    pub fn new_with(settings: &Arc<CssaSettings>) -> Self {
        Self {
            settings: Arc::clone(settings),
            pending_active: Default::default(),
        }
    }

    /// Attaches listeners for every configured state that a rule targets and
    /// that isn't already bound. Returns the newly bound states. Calling it
    /// again is harmless.
    pub fn bind<D: Document + ?Sized, H: PlaysAudio>(
        &self,
        document: &D,
        registry: &mut PlaybackRegistry<H>,
        element: ElementUid,
    ) -> Vec<PseudoState> {
        let Some(identity) = document.identity(element) else {
            log::warn!("Can't bind {element}: not in the document");
            return Vec::default();
        };
        let selector = identity.selector();
        let audio = registry.entry(element);
        let newly_bound: Vec<PseudoState> = self
            .settings
            .interaction_categories()
            .iter()
            .copied()
            .filter(|category| {
                !audio.bound.contains(category) && document.has_rule_targeting(&selector, *category)
            })
            .collect();
        for category in &newly_bound {
            audio.bound.insert(*category);
            if *category == PseudoState::Active {
                audio.active_snapshot = Some(read_all(document, element));
            }
            log::debug!("{element} ({selector}) listens for :{category}");
        }
        newly_bound
    }

    /// Returns the record to apply for `interaction`, if any. Interactions in
    /// states that aren't bound for the element are ignored.
    pub fn on_interaction<D: Document + ?Sized, H: PlaysAudio>(
        &mut self,
        document: &D,
        registry: &PlaybackRegistry<H>,
        element: ElementUid,
        interaction: Interaction,
    ) -> Option<PropertyRecord> {
        let category = interaction.category();
        let Some(audio) = registry.element(element) else {
            log::trace!("{interaction} on untracked {element}");
            return None;
        };
        if !audio.is_bound(category) {
            log::trace!("{interaction} on {element}, which doesn't listen for :{category}");
            return None;
        }
        match interaction {
            Interaction::PressStart => {
                if !self.pending_active.contains(&element) {
                    self.pending_active.push(element);
                }
                None
            }
            Interaction::PressEnd => audio.active_snapshot.clone(),
            _ => Some(read_all(document, element)),
        }
    }

    /// Takes the snapshots deferred by press-starts during this turn.
    pub fn flush_deferred<D: Document + ?Sized, H: PlaysAudio>(
        &mut self,
        document: &D,
        registry: &mut PlaybackRegistry<H>,
    ) {
        for element in self.pending_active.drain(..) {
            if let Some(audio) = registry.element_mut(element) {
                audio.active_snapshot = Some(read_all(document, element));
            }
        }
    }

    /// Whether any press-start is waiting for the end of the turn.
    pub fn has_deferred(&self) -> bool {
        !self.pending_active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        style::ElementIdentity,
        toys::{ToyDocument, ToyPlayback},
        util::CssaSettingsBuilder,
    };

    fn button(doc: &mut ToyDocument) -> ElementUid {
        let uid = doc.create_element(doc.root(), ElementIdentity::new_with("button").classes("ok"));
        doc.declare(uid, PropertyName::Source, "url(click.wav)");
        uid
    }

    #[test]
    fn binds_only_targeted_states_once() {
        let mut doc = ToyDocument::default();
        let uid = button(&mut doc);
        doc.declare_when(uid, PseudoState::Hover, PropertyName::State, "playing");
        doc.rules_mut().add_rule("form button.ok:focus");
        doc.rules_mut().add_rule("button.cancel:active");

        let binder = TriggerBinder::new_with(&Arc::new(CssaSettings::default()));
        let mut registry = PlaybackRegistry::<ToyPlayback>::default();
        assert_eq!(
            binder.bind(&doc, &mut registry, uid),
            vec![PseudoState::Hover, PseudoState::Focus]
        );
        assert!(binder.bind(&doc, &mut registry, uid).is_empty());

        let audio = registry.element(uid).unwrap();
        assert!(audio.is_bound(PseudoState::Hover));
        assert!(!audio.is_bound(PseudoState::Active));

        // A rule that shows up later gets bound on the next pass.
        doc.rules_mut().add_rule("button.ok:checked");
        assert_eq!(
            binder.bind(&doc, &mut registry, uid),
            vec![PseudoState::Checked]
        );
    }

    #[test]
    fn unconfigured_states_are_never_bound() {
        let mut doc = ToyDocument::default();
        let uid = button(&mut doc);
        doc.declare_when(uid, PseudoState::Hover, PropertyName::State, "playing");
        doc.declare_when(uid, PseudoState::Focus, PropertyName::State, "playing");

        let settings = CssaSettingsBuilder::default()
            .interaction_categories(vec![PseudoState::Focus])
            .build()
            .unwrap();
        let binder = TriggerBinder::new_with(&Arc::new(settings));
        let mut registry = PlaybackRegistry::<ToyPlayback>::default();
        assert_eq!(
            binder.bind(&doc, &mut registry, uid),
            vec![PseudoState::Focus]
        );
    }

    #[test]
    fn press_snapshot_waits_for_end_of_turn() {
        let mut doc = ToyDocument::default();
        let uid = button(&mut doc);
        doc.declare(uid, PropertyName::State, "stopped");
        doc.declare_when(uid, PseudoState::Active, PropertyName::State, "playing");

        let mut binder = TriggerBinder::new_with(&Arc::new(CssaSettings::default()));
        let mut registry = PlaybackRegistry::<ToyPlayback>::default();
        binder.bind(&doc, &mut registry, uid);
        let state_of = |r: &PropertyRecord| r.entry(PropertyName::State, 0).map(str::to_string);
        assert_eq!(
            state_of(registry.element(uid).unwrap().active_snapshot.as_ref().unwrap()),
            Some("stopped".to_string()),
            "the bind-time snapshot"
        );

        assert!(binder
            .on_interaction(&doc, &registry, uid, Interaction::PressStart)
            .is_none());
        assert!(binder.has_deferred());

        // The pressed style lands after the press was reported.
        doc.set_state(uid, PseudoState::Active, true);
        binder.flush_deferred(&doc, &mut registry);
        assert!(!binder.has_deferred());
        doc.set_state(uid, PseudoState::Active, false);

        let record = binder
            .on_interaction(&doc, &registry, uid, Interaction::PressEnd)
            .unwrap();
        assert_eq!(state_of(&record), Some("playing".to_string()));
    }

    #[test]
    fn unbound_interactions_are_ignored() {
        let mut doc = ToyDocument::default();
        let uid = button(&mut doc);
        doc.declare_when(uid, PseudoState::Hover, PropertyName::State, "playing");

        let mut binder = TriggerBinder::new_with(&Arc::new(CssaSettings::default()));
        let mut registry = PlaybackRegistry::<ToyPlayback>::default();
        assert!(binder
            .on_interaction(&doc, &registry, uid, Interaction::HoverEnter)
            .is_none());

        binder.bind(&doc, &mut registry, uid);
        assert!(binder
            .on_interaction(&doc, &registry, uid, Interaction::FocusGained)
            .is_none());
        doc.set_state(uid, PseudoState::Hover, true);
        let record = binder
            .on_interaction(&doc, &registry, uid, Interaction::HoverEnter)
            .unwrap();
        assert_eq!(record.entry(PropertyName::State, 0), Some("playing"));
    }
}

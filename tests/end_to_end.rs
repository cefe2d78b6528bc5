// Copyright (c) 2024 Mike Tsao

use cssa::{prelude::*, style::ElementIdentity, toys::*};
use std::time::Duration;

/// Runs the engine forward one tick at a time, delivering completions the
/// way a real platform's event loop would, until nothing is playing.
fn run_until_quiet(
    conductor: &mut Conductor<ToyPlaybackEngine>,
    document: &ToyDocument,
    engine: &ToyPlaybackEngine,
) -> usize {
    let mut ticks = 0;
    while engine.playing_count() > 0 {
        assert!(ticks < 1000, "playback never stopped");
        for key in engine.advance(Duration::from_millis(100)) {
            conductor.handle_input(document, CssaInput::PlaybackEnded(key));
        }
        conductor.handle_input(document, CssaInput::EndTurn);
        ticks += 1;
    }
    ticks
}

// A sound declared with `loop: 2` plays twice, retriggered by its own
// completion, and then stays quiet.
#[test]
fn loop_two_plays_twice_then_stops() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut document = ToyDocument::default();
    let banner = document.create_element(document.root(), ElementIdentity::new_with("header"));
    document.declare(banner, PropertyName::Source, "url(\"fanfare.ogg\")");
    document.declare(banner, PropertyName::State, "playing");
    document.declare(banner, PropertyName::Loop, "2");

    let engine = ToyPlaybackEngine::default();
    engine.set_length("fanfare.ogg", Duration::from_millis(500));
    let mut conductor = Conductor::new_with(CssaSettings::default(), engine.clone());
    conductor.start(&document);
    assert_eq!(engine.playing_count(), 1);

    let ticks = run_until_quiet(&mut conductor, &document, &engine);
    assert_eq!(ticks, 10, "two 500ms plays at 100ms per tick");

    let slot = conductor
        .registry()
        .slot(SlotKey::new(banner, 0))
        .unwrap();
    assert_eq!(slot.loop_count(), 2);
    assert_eq!(slot.orig_src(), "fanfare.ogg");

    // Re-evaluating doesn't sneak in a third play.
    let transitions = conductor.apply_snapshot(&document, banner);
    assert_eq!(transitions, vec![Transition::LoopBudgetExhausted]);
    assert_eq!(engine.playing_count(), 0);
}

// Stopping re-arms the budget, so the next `playing` gets a full set of loops.
#[test]
fn stop_rearms_loop_budget() {
    let mut document = ToyDocument::default();
    let e = document.create_element(document.root(), ElementIdentity::new_with("div"));
    document.declare(e, PropertyName::Source, "url(a.wav)");
    document.declare(e, PropertyName::State, "playing");

    let engine = ToyPlaybackEngine::default();
    let mut conductor = Conductor::new_with(CssaSettings::default(), engine.clone());
    conductor.start(&document);
    run_until_quiet(&mut conductor, &document, &engine);

    document.declare(e, PropertyName::State, "stopped");
    conductor.handle_input(&document, CssaInput::Tree(TreeChange::AttributeChanged(e)));
    document.declare(e, PropertyName::State, "playing");
    conductor.handle_input(&document, CssaInput::Tree(TreeChange::AttributeChanged(e)));
    assert_eq!(engine.playing_count(), 1);
}

// Several slots on one element run independently, each with its own budget.
#[test]
fn parallel_slots() {
    let mut document = ToyDocument::default();
    let e = document.create_element(document.root(), ElementIdentity::new_with("div"));
    document.declare(
        e,
        PropertyName::Source,
        "url(rain.ogg), url(thunder.ogg), url(wind.ogg)",
    );
    document.declare(e, PropertyName::State, "playing, playing");
    document.declare(e, PropertyName::Loop, "infinite, 1");
    document.declare(e, PropertyName::Volume, "20%, 80%");

    let engine = ToyPlaybackEngine::default();
    let mut conductor = Conductor::new_with(CssaSettings::default(), engine.clone());
    conductor.start(&document);
    assert_eq!(engine.playing_count(), 2, "the third slot defaults to stopped");

    for _ in 0..5 {
        for key in engine.advance(Duration::from_secs(1)) {
            conductor.handle_input(&document, CssaInput::PlaybackEnded(key));
        }
    }
    let registry = conductor.registry();
    assert_eq!(registry.slot(SlotKey::new(e, 0)).unwrap().loop_count(), 6);
    assert_eq!(registry.slot(SlotKey::new(e, 1)).unwrap().loop_count(), 1);
    assert_eq!(registry.slot(SlotKey::new(e, 2)).unwrap().loop_count(), 0);
    assert_eq!(
        engine.playing_count(),
        1,
        "only the infinite slot keeps going"
    );
}

// Settings can come from JSON, and they change what the conductor reacts to.
#[test]
fn settings_from_json() {
    let settings = CssaSettings::from_json_str(
        r#"{ "process-existing-tree": false, "observe-style-insertions": false }"#,
    )
    .unwrap();
    let mut document = ToyDocument::default();
    let e = document.create_element(document.root(), ElementIdentity::new_with("div"));
    document.declare(e, PropertyName::Source, "url(a.wav)");

    let engine = ToyPlaybackEngine::default();
    let mut conductor = Conductor::new_with(settings, engine);
    conductor.start(&document);
    assert!(conductor.registry().is_empty());

    conductor.handle_input(
        &document,
        CssaInput::Tree(TreeChange::HeadNodeAdded(cssa::style::HeadNode::new_with(
            "style", None,
        ))),
    );
    assert!(conductor.registry().is_empty(), "rescans are turned off");

    conductor.handle_input(&document, CssaInput::Tree(TreeChange::NodeAdded(e)));
    assert!(conductor.is_tracked(e));
}

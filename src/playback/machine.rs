// Copyright (c) 2024 Mike Tsao

//! The per-slot audio state machine.
//!
//! Each slot compares what its declaration asks for ([PlaybackIntent]) with
//! what its handle is doing (paused or playing) and picks one of the
//! [Transition]s below. The loop budget, trigger mode, and playback mode
//! refine the choice.

use super::registry::{PlaybackRegistry, SlotRuntime};
use crate::prelude::*;
use strum_macros::Display;

/// What [apply_slot()] did to a slot.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum Transition {
    /// Asked to play while paused, with loop budget left: playback started
    /// and the loop count went up.
    Started,
    /// Asked to play while paused, but the loop budget is used up.
    LoopBudgetExhausted,
    /// Asked to play while playing, in [TriggerMode::Reset]: rewound to the
    /// offset.
    Restarted,
    /// Asked to play while playing, in [TriggerMode::Multi]: an extra copy
    /// started at the offset.
    Spawned,
    /// Asked to play while playing, in [TriggerMode::Continue].
    Continued,
    /// Asked to pause while paused.
    Unchanged,
    /// Asked to pause while playing.
    Paused,
    /// Asked to stop while paused: rewound to the offset with a fresh loop
    /// budget.
    Rearmed,
    /// Asked to stop while playing, in [PlaybackMode::Playthrough]: left to
    /// finish.
    PlayingThrough,
    /// Asked to stop while playing, in [PlaybackMode::Stop] or
    /// [PlaybackMode::Pause]: paused at the offset with a fresh loop budget.
    Halted,
    /// Declared `default`, but there was no earlier state to carry over.
    Unresolved,
}

/// Applies every slot of `record` to `element`, then remembers `record` as
/// the element's last-applied record. Any `default` state that could be
/// resolved is rewritten in `record` as the state it resolved to.
///
/// Returns the transition of each slot, in slot order.
pub fn apply<E: CreatesPlayback>(
    registry: &mut PlaybackRegistry<E::Handle>,
    engine: &mut E,
    element: ElementUid,
    mut record: PropertyRecord,
) -> Vec<Transition> {
    let transitions = (0..record.slot_count())
        .map(|index| apply_slot(registry, engine, element, &mut record, index))
        .collect();
    registry.entry(element).last_applied = Some(record);
    transitions
}

/// Applies slot `index` of `record` to `element`.
pub fn apply_slot<E: CreatesPlayback>(
    registry: &mut PlaybackRegistry<E::Handle>,
    engine: &mut E,
    element: ElementUid,
    record: &mut PropertyRecord,
    index: usize,
) -> Transition {
    let key = SlotKey::new(element, index);
    let mut settings = SlotSettings::from_record(record, index);
    let audio = registry.entry(element);

    if settings.intent == PlaybackIntent::UseLast {
        if let Some(intent) = previous_intent(audio.last_applied.as_ref(), index) {
            settings.intent = intent;
            record.set_entry(PropertyName::State, index, <&'static str>::from(intent));
        }
    }

    let slot = audio.get_or_create(key, |key| engine.create_handle(key));
    if slot.orig_src != settings.source.as_str() {
        slot.orig_src = settings.source.as_str().to_string();
        slot.handle.set_source(slot.orig_src.as_str());
        slot.rewind_pending = true;
    }
    slot.handle.set_volume(settings.volume);
    slot.spawned.retain(|spawn| !spawn.is_ended());

    let transition = transition(slot, &settings);
    match transition {
        Transition::Continued | Transition::Unchanged | Transition::PlayingThrough => {
            log::trace!("{key}: {transition}")
        }
        _ => log::debug!(
            "{key}: {transition} ({}, loop {}/{})",
            settings.source,
            slot.loop_count,
            settings.loop_limit
        ),
    }
    transition
}

/// The state slot `index` was left in by the previous application. A
/// previous entry that was itself an unresolved `default` yields [None], as
/// does the lack of any previous application.
fn previous_intent(last_applied: Option<&PropertyRecord>, index: usize) -> Option<PlaybackIntent> {
    let intent = SlotSettings::from_record(last_applied?, index).intent;
    (intent != PlaybackIntent::UseLast).then_some(intent)
}

fn transition<H: PlaysAudio>(slot: &mut SlotRuntime<H>, settings: &SlotSettings) -> Transition {
    let offset = settings.offset.as_duration();
    match (settings.intent, slot.handle.is_paused()) {
        (PlaybackIntent::Playing, true) => {
            if !settings.loop_limit.allows(slot.loop_count) {
                return Transition::LoopBudgetExhausted;
            }
            if slot.handle.is_ended() || slot.rewind_pending {
                slot.handle.seek(offset);
                slot.rewind_pending = false;
            }
            slot.handle.play();
            slot.loop_count += 1;
            Transition::Started
        }
        (PlaybackIntent::Playing, false) => match settings.trigger_mode {
            TriggerMode::Reset => {
                slot.handle.seek(offset);
                slot.handle.play();
                Transition::Restarted
            }
            TriggerMode::Multi => {
                let mut spawn = slot.handle.duplicate();
                spawn.set_volume(slot.handle.volume());
                spawn.seek(offset);
                spawn.play();
                slot.spawned.push(spawn);
                Transition::Spawned
            }
            TriggerMode::Continue => Transition::Continued,
        },
        (PlaybackIntent::Paused, true) => Transition::Unchanged,
        (PlaybackIntent::Paused, false) => {
            slot.handle.pause();
            Transition::Paused
        }
        (PlaybackIntent::Stopped, true) => {
            slot.handle.seek(offset);
            slot.rewind_pending = false;
            slot.loop_count = 0;
            Transition::Rearmed
        }
        (PlaybackIntent::Stopped, false) => match settings.playback_mode {
            PlaybackMode::Playthrough => Transition::PlayingThrough,
            PlaybackMode::Stop | PlaybackMode::Pause => {
                slot.handle.seek(offset);
                slot.handle.pause();
                slot.rewind_pending = false;
                slot.loop_count = 0;
                Transition::Halted
            }
        },
        (PlaybackIntent::UseLast, _) => Transition::Unresolved,
    }
}

// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use core::{cell::RefCell, time::Duration};
use rustc_hash::FxHashMap;
use std::rc::{Rc, Weak};

#[derive(Debug)]
struct ToyVoice {
    key: Option<SlotKey>,
    source: String,
    is_paused: bool,
    is_ended: bool,
    position: Duration,
    volume: Volume,
}
impl ToyVoice {
    fn new_with(key: Option<SlotKey>, source: &str) -> Self {
        Self {
            key,
            source: source.to_string(),
            is_paused: true,
            is_ended: false,
            position: Duration::ZERO,
            volume: Volume::MAX,
        }
    }
}

#[derive(Debug, Default)]
struct ToyMixer {
    voices: Vec<Weak<RefCell<ToyVoice>>>,
    lengths: FxHashMap<String, Duration>,
}
impl ToyMixer {
    fn length_of(&self, source: &str) -> Duration {
        self.lengths
            .get(source)
            .copied()
            .unwrap_or(ToyPlaybackEngine::DEFAULT_LENGTH)
    }

    fn live_voices(&self) -> impl Iterator<Item = Rc<RefCell<ToyVoice>>> + '_ {
        self.voices.iter().filter_map(Weak::upgrade)
    }
}

/// A playback engine that makes no sound. Time passes only when
/// [ToyPlaybackEngine::advance()] is called, which returns the slots whose
/// handles reached the end.
///
/// Clones share the same voices, so a test can keep one clone while the
/// system owns another.
#[derive(Clone, Debug, Default)]
pub struct ToyPlaybackEngine {
    mixer: Rc<RefCell<ToyMixer>>,
}
impl ToyPlaybackEngine {
    /// How long a source plays unless [ToyPlaybackEngine::set_length()] says
    /// otherwise.
    pub const DEFAULT_LENGTH: Duration = Duration::from_secs(1);

    /// Sets how long `source` plays.
    pub fn set_length(&self, source: &str, length: Duration) {
        self.mixer
            .borrow_mut()
            .lengths
            .insert(source.to_string(), length);
    }

    /// Moves every playing voice forward by `elapsed`. Voices that reach the
    /// end stop there, paused and ended. Returns the keys of the slot
    /// handles that ended, in creation order; copies made by
    /// [PlaysAudio::duplicate()] are not reported.
    pub fn advance(&self, elapsed: Duration) -> Vec<SlotKey> {
        let mut mixer = self.mixer.borrow_mut();
        mixer.voices.retain(|v| v.strong_count() > 0);
        let mut ended = Vec::default();
        for voice in mixer.live_voices() {
            let mut voice = voice.borrow_mut();
            if voice.is_paused {
                continue;
            }
            let length = mixer.length_of(&voice.source);
            voice.position = (voice.position + elapsed).min(length);
            if voice.position >= length {
                voice.is_paused = true;
                voice.is_ended = true;
                if let Some(key) = voice.key {
                    ended.push(key);
                }
            }
        }
        ended
    }

    /// The number of live handles that are playing, spawned copies included.
    pub fn playing_count(&self) -> usize {
        self.mixer
            .borrow()
            .live_voices()
            .filter(|v| !v.borrow().is_paused)
            .count()
    }

    /// The number of live handles.
    pub fn voice_count(&self) -> usize {
        self.mixer.borrow().live_voices().count()
    }

    fn add_voice(&self, voice: ToyVoice) -> ToyPlayback {
        let voice = Rc::new(RefCell::new(voice));
        self.mixer.borrow_mut().voices.push(Rc::downgrade(&voice));
        ToyPlayback {
            voice,
            engine: self.clone(),
        }
    }
}
impl CreatesPlayback for ToyPlaybackEngine {
    type Handle = ToyPlayback;

    fn create_handle(&mut self, key: SlotKey) -> Self::Handle {
        self.add_voice(ToyVoice::new_with(Some(key), ""))
    }
}

/// A handle made by [ToyPlaybackEngine].
#[derive(Debug)]
pub struct ToyPlayback {
    voice: Rc<RefCell<ToyVoice>>,
    engine: ToyPlaybackEngine,
}
impl ToyPlayback {
    /// The current playback position.
    pub fn position(&self) -> Duration {
        self.voice.borrow().position
    }

    /// The currently assigned source.
    pub fn source(&self) -> String {
        self.voice.borrow().source.clone()
    }

    fn length(&self) -> Duration {
        self.engine.mixer.borrow().length_of(&self.voice.borrow().source)
    }
}
impl PlaysAudio for ToyPlayback {
    fn play(&mut self) {
        let mut voice = self.voice.borrow_mut();
        if voice.source.is_empty() {
            log::warn!("ToyPlayback: nothing to play for {:?}", voice.key);
            return;
        }
        if voice.is_ended {
            voice.position = Duration::ZERO;
            voice.is_ended = false;
        }
        voice.is_paused = false;
    }

    fn pause(&mut self) {
        self.voice.borrow_mut().is_paused = true;
    }

    fn seek(&mut self, position: Duration) {
        let length = self.length();
        let mut voice = self.voice.borrow_mut();
        voice.position = position.min(length);
        voice.is_ended = voice.is_ended && voice.position >= length;
    }

    fn set_volume(&mut self, volume: Volume) {
        self.voice.borrow_mut().volume = volume;
    }

    fn volume(&self) -> Volume {
        self.voice.borrow().volume
    }

    fn set_source(&mut self, source: &str) {
        let mut voice = self.voice.borrow_mut();
        voice.source = source.to_string();
        voice.is_paused = true;
        voice.is_ended = false;
        voice.position = Duration::ZERO;
    }

    fn is_paused(&self) -> bool {
        self.voice.borrow().is_paused
    }

    fn is_ended(&self) -> bool {
        self.voice.borrow().is_ended
    }

    fn duplicate(&self) -> Self {
        let source = self.voice.borrow().source.clone();
        self.engine.add_voice(ToyVoice::new_with(None, &source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voices_play_to_the_end() {
        let mut engine = ToyPlaybackEngine::default();
        engine.set_length("a.wav", Duration::from_millis(300));
        let key = SlotKey::new(ElementUid(1), 0);
        let mut handle = engine.create_handle(key);
        assert!(handle.is_paused());

        handle.set_source("a.wav");
        handle.play();
        assert_eq!(engine.playing_count(), 1);
        assert!(engine.advance(Duration::from_millis(200)).is_empty());
        assert_eq!(handle.position(), Duration::from_millis(200));

        assert_eq!(engine.advance(Duration::from_millis(200)), vec![key]);
        assert!(handle.is_paused());
        assert!(handle.is_ended());
        assert_eq!(handle.position(), Duration::from_millis(300));

        handle.seek(Duration::from_millis(100));
        assert!(!handle.is_ended(), "seeking back into the sound un-ends it");

        handle.play();
        handle.pause();
        assert!(
            engine.advance(Duration::from_secs(1)).is_empty(),
            "paused voices don't move"
        );
    }

    #[test]
    fn playing_an_ended_voice_starts_over() {
        let mut engine = ToyPlaybackEngine::default();
        let mut handle = engine.create_handle(SlotKey::new(ElementUid(1), 0));
        handle.set_source("a.wav");
        handle.play();
        engine.advance(Duration::from_secs(2));
        assert!(handle.is_ended());

        handle.play();
        assert!(!handle.is_ended());
        assert_eq!(handle.position(), Duration::ZERO);
    }

    #[test]
    fn empty_source_does_not_play() {
        let mut engine = ToyPlaybackEngine::default();
        let mut handle = engine.create_handle(SlotKey::new(ElementUid(1), 0));
        handle.play();
        assert!(handle.is_paused());
    }

    #[test]
    fn duplicates_are_independent_and_unreported() {
        let mut engine = ToyPlaybackEngine::default();
        let mut handle = engine.create_handle(SlotKey::new(ElementUid(1), 0));
        handle.set_source("a.wav");
        handle.set_volume(Volume::new(0.5));

        let mut copy = handle.duplicate();
        assert_eq!(copy.source(), "a.wav");
        assert!(copy.is_paused());
        assert_eq!(copy.volume(), Volume::MAX, "copies don't inherit volume");
        copy.play();
        assert_eq!(engine.voice_count(), 2);
        assert!(engine.advance(Duration::from_secs(5)).is_empty());
        assert!(copy.is_ended());

        drop(copy);
        assert_eq!(engine.voice_count(), 1);
    }
}

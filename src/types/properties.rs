// Copyright (c) 2024 Mike Tsao

//! The declared property lists of one element, and the effective values of
//! one slot within them.

use super::values::{
    AudioSource, DeclaredValue, LoopLimit, PlaybackIntent, PlaybackMode, TimeOffset, TriggerMode,
    Volume,
};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

/// The properties an element can declare to describe its audio. The string
/// form of each variant is the name the style provider is asked for.
#[derive(
    Clone,
    Copy,
    Debug,
    AsRefStr,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
    IntoStaticStr,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum PropertyName {
    /// `url(...)` of the sound.
    Source,
    /// `playing`, `paused`, `stopped`, or `default`.
    State,
    /// `playthrough`, `stop`, or `pause`.
    PlaybackMode,
    /// Where playback (re)starts.
    Offset,
    /// Declared length of the sound.
    Duration,
    /// `continue`, `reset`, or `multi`.
    TriggerMode,
    /// `infinite` or a play count.
    Loop,
    /// Integer percentage.
    Volume,
}
impl PropertyName {
    /// Every recognized property, in declaration order.
    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }
}

/// Splits a declared value into its comma-separated entries. A blank
/// declaration has no entries at all.
pub fn split_entries(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::default();
    }
    raw.split(',').map(|entry| entry.trim().to_string()).collect()
}

/// The raw entries of each declared property for one element. Lists for
/// different properties may have different lengths; the element has as many
/// slots as its longest list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PropertyRecord {
    lists: FxHashMap<PropertyName, Vec<String>>,
}
impl PropertyRecord {
    /// Adds a property by splitting its raw declaration. Handy for building
    /// records by hand.
    pub fn with(mut self, name: PropertyName, raw: &str) -> Self {
        self.set_list(name, split_entries(raw));
        self
    }

    /// Replaces the entries of `name`.
    pub fn set_list(&mut self, name: PropertyName, entries: Vec<String>) {
        self.lists.insert(name, entries);
    }

    /// All entries declared for `name`. Missing properties have none.
    pub fn list(&self, name: PropertyName) -> &[String] {
        self.lists.get(&name).map(Vec::as_slice).unwrap_or_default()
    }

    /// The entry of `name` for slot `index`, or [None] if it's missing or
    /// blank.
    pub fn entry(&self, name: PropertyName, index: usize) -> Option<&str> {
        self.list(name)
            .get(index)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Overwrites one entry, growing the list with blank entries if needed.
    pub fn set_entry(&mut self, name: PropertyName, index: usize, value: &str) {
        let list = self.lists.entry(name).or_default();
        if list.len() <= index {
            list.resize(index + 1, String::default());
        }
        list[index] = value.to_string();
    }

    /// The number of slots, which is the length of the longest list.
    pub fn slot_count(&self) -> usize {
        self.lists.values().map(Vec::len).max().unwrap_or_default()
    }

    /// Whether the element declares a sound for at least one slot.
    pub fn has_source(&self) -> bool {
        !self.list(PropertyName::Source).is_empty()
    }
}

/// The effective values of one slot, with every default applied.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SlotSettings {
    #[allow(missing_docs)]
    pub source: AudioSource,
    #[allow(missing_docs)]
    pub intent: PlaybackIntent,
    #[allow(missing_docs)]
    pub playback_mode: PlaybackMode,
    #[allow(missing_docs)]
    pub trigger_mode: TriggerMode,
    #[allow(missing_docs)]
    pub loop_limit: LoopLimit,
    #[allow(missing_docs)]
    pub offset: TimeOffset,
    /// Parsed like `offset`. Informational; no transition depends on it.
    pub duration: Option<TimeOffset>,
    #[allow(missing_docs)]
    pub volume: Volume,
}
impl SlotSettings {
    /// Resolves slot `index` of `record`.
    pub fn from_record(record: &PropertyRecord, index: usize) -> Self {
        Self {
            source: Self::value(record, PropertyName::Source, index),
            intent: Self::value(record, PropertyName::State, index),
            playback_mode: Self::value(record, PropertyName::PlaybackMode, index),
            trigger_mode: Self::value(record, PropertyName::TriggerMode, index),
            loop_limit: Self::value(record, PropertyName::Loop, index),
            offset: Self::value(record, PropertyName::Offset, index),
            duration: record
                .entry(PropertyName::Duration, index)
                .and_then(|s| s.parse().ok()),
            volume: Self::value(record, PropertyName::Volume, index),
        }
    }

    fn value<T: DeclaredValue>(record: &PropertyRecord, name: PropertyName, index: usize) -> T {
        record
            .entry(name, index)
            .map(T::parse_or_default)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::time::Duration;
    use float_cmp::approx_eq;

    #[test]
    fn property_names_are_kebab_case() {
        let names: Vec<&'static str> = PropertyName::all().into_iter().map(|n| n.into()).collect();
        assert_eq!(
            names,
            vec![
                "source",
                "state",
                "playback-mode",
                "offset",
                "duration",
                "trigger-mode",
                "loop",
                "volume"
            ]
        );
        assert_eq!(
            "trigger-mode".parse::<PropertyName>().ok(),
            Some(PropertyName::TriggerMode)
        );
    }

    #[test]
    fn entries_are_split_and_trimmed() {
        assert_eq!(
            split_entries(" url(a) ,url(b),  url(c)"),
            vec!["url(a)", "url(b)", "url(c)"]
        );
        assert!(split_entries("   ").is_empty());
        assert_eq!(split_entries("a,,b"), vec!["a", "", "b"]);
    }

    #[test]
    fn slot_count_is_longest_list() {
        let record = PropertyRecord::default()
            .with(PropertyName::Source, "url(a), url(b), url(c)")
            .with(PropertyName::Volume, "50");
        assert_eq!(record.slot_count(), 3);
        assert_eq!(PropertyRecord::default().slot_count(), 0);

        let first = SlotSettings::from_record(&record, 0);
        assert!(approx_eq!(f64, first.volume.value(), 0.5));
        for index in 1..3 {
            let settings = SlotSettings::from_record(&record, index);
            assert!(
                approx_eq!(f64, settings.volume.value(), 1.0),
                "slots past the end of the volume list should use the default"
            );
        }
        assert_eq!(SlotSettings::from_record(&record, 2).source.as_str(), "c");
    }

    #[test]
    fn blank_entries_use_defaults() {
        let record = PropertyRecord::default()
            .with(PropertyName::Source, "url(a), url(b)")
            .with(PropertyName::State, ", playing")
            .with(PropertyName::Loop, "infinite,")
            .with(PropertyName::Offset, "2s, 100ms")
            .with(PropertyName::Duration, "1m, later");

        let first = SlotSettings::from_record(&record, 0);
        assert_eq!(first.intent, PlaybackIntent::Stopped);
        assert_eq!(first.loop_limit, LoopLimit::Infinite);
        assert_eq!(first.offset.as_duration(), Duration::from_secs(2));
        assert_eq!(first.duration, Some(TimeOffset(Duration::from_secs(60))));

        let second = SlotSettings::from_record(&record, 1);
        assert_eq!(second.intent, PlaybackIntent::Playing);
        assert_eq!(second.loop_limit, LoopLimit::Times(1));
        assert_eq!(second.offset.as_duration(), Duration::from_millis(100));
        assert_eq!(second.duration, None);
        assert_eq!(second.trigger_mode, TriggerMode::Continue);
        assert_eq!(second.playback_mode, PlaybackMode::Playthrough);
    }

    #[test]
    fn set_entry_grows_list() {
        let mut record = PropertyRecord::default();
        record.set_entry(PropertyName::State, 2, "paused");
        assert_eq!(record.list(PropertyName::State), &["", "", "paused"]);
        assert_eq!(record.entry(PropertyName::State, 0), None);
        assert_eq!(record.entry(PropertyName::State, 2), Some("paused"));
        assert!(!record.has_source());
    }
}

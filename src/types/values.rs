// Copyright (c) 2024 Mike Tsao

//! Typed forms of the declared property values. Every property has a strict
//! [FromStr] parser and a total `parse_or_default()` that never fails, which
//! is the only form the state machine uses.

use core::{fmt, str::FromStr, time::Duration};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;

/// Why a declared value couldn't be understood. These never escape the
/// crate's public operations; they exist so that the strict parsers can be
/// tested on their own.
#[derive(Debug, Error, PartialEq)]
pub enum ValueError {
    /// The value was missing or blank.
    #[error("value is empty")]
    Empty,
    /// The value didn't start with a number where one was required.
    #[error("expected a number, found {0:?}")]
    NotANumber(String),
    /// The value was a number, but not one this property accepts.
    #[error("{0:?} is out of range")]
    OutOfRange(String),
    /// The value wasn't one of the property's keywords.
    #[error("{0:?} is not a recognized keyword")]
    UnknownKeyword(String),
    /// The value had no `url(...)` wrapper.
    #[error("{0:?} is not a url() value")]
    NotAUrl(String),
}

/// Implemented by each typed property value. `parse_or_default()` is the
/// tolerant entry point: blank, malformed, or unrecognized input yields the
/// property's documented default.
pub trait DeclaredValue: FromStr<Err = ValueError> + Default {
    /// Parses `s`, falling back to the default on any error.
    fn parse_or_default(s: &str) -> Self {
        s.trim().parse().unwrap_or_default()
    }
}

fn keyword<T: FromStr>(s: &str) -> Result<T, ValueError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ValueError::Empty);
    }
    s.parse().map_err(|_| ValueError::UnknownKeyword(s.to_string()))
}

/// Parses the leading integer of `s` the way lenient style engines do:
/// optional sign, then digits, ignoring whatever follows (`"50%"` is 50).
fn leading_integer(s: &str) -> Result<i64, ValueError> {
    static LEADING_INTEGER: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^[+-]?\d+").expect("leading-integer pattern"));
    let s = s.trim();
    if s.is_empty() {
        return Err(ValueError::Empty);
    }
    LEADING_INTEGER
        .find(s)
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| ValueError::NotANumber(s.to_string()))
}

/// What the declaration asks a slot to be doing.
#[derive(Clone, Copy, Debug, Default, Display, EnumIter, IntoStaticStr, PartialEq, Eq)]
#[strum(serialize_all = "kebab-case")]
pub enum PlaybackIntent {
    /// Audio should be playing.
    Playing,
    /// Audio should hold its position.
    Paused,
    /// Audio should be at its offset, ready to play again.
    #[default]
    Stopped,
    /// Keep whatever state was applied last time. Declared as `default`.
    #[strum(serialize = "default")]
    UseLast,
}

/// What happens to audio that's still playing when the slot is asked to stop.
#[derive(Clone, Copy, Debug, Default, Display, EnumIter, IntoStaticStr, PartialEq, Eq)]
#[strum(serialize_all = "kebab-case")]
pub enum PlaybackMode {
    /// Let the current play-through finish.
    #[default]
    Playthrough,
    /// Rewind to the offset and pause.
    Stop,
    /// Same as [PlaybackMode::Stop].
    Pause,
}

/// What happens when a slot that's already playing is asked to play again.
#[derive(Clone, Copy, Debug, Default, Display, EnumIter, IntoStaticStr, PartialEq, Eq)]
#[strum(serialize_all = "kebab-case")]
pub enum TriggerMode {
    /// Keep playing; the request is ignored.
    #[default]
    Continue,
    /// Rewind to the offset and keep playing.
    Reset,
    /// Start an additional, independent copy of the sound.
    Multi,
}

// strum's EnumString would produce its own FromStr with its own error type, so
// keywords are matched against the IntoStaticStr names instead.
macro_rules! keyword_value {
    ($t:ty) => {
        impl FromStr for $t {
            type Err = ValueError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                keyword::<KeywordOf<$t>>(s).map(|k| k.0)
            }
        }
        impl DeclaredValue for $t {}
    };
}

struct KeywordOf<T>(T);
impl<T> FromStr for KeywordOf<T>
where
    T: strum::IntoEnumIterator + Into<&'static str> + Copy,
{
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        T::iter()
            .find(|v| Into::<&'static str>::into(*v) == s)
            .map(Self)
            .ok_or(())
    }
}

keyword_value!(PlaybackIntent);
keyword_value!(PlaybackMode);
keyword_value!(TriggerMode);

/// How many times a slot may play before it must be stopped to re-arm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopLimit {
    /// No limit. Declared as `infinite`.
    Infinite,
    /// At most this many play-throughs.
    Times(usize),
}
impl Default for LoopLimit {
    fn default() -> Self {
        Self::Times(1)
    }
}
impl LoopLimit {
    /// Whether a slot that has already played `loop_count` times may start
    /// again.
    pub fn allows(&self, loop_count: usize) -> bool {
        match self {
            LoopLimit::Infinite => true,
            LoopLimit::Times(n) => loop_count < *n,
        }
    }
}
impl FromStr for LoopLimit {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == "infinite" {
            return Ok(Self::Infinite);
        }
        let n = leading_integer(s)?;
        usize::try_from(n)
            .map(Self::Times)
            .map_err(|_| ValueError::OutOfRange(s.trim().to_string()))
    }
}
impl DeclaredValue for LoopLimit {}
impl fmt::Display for LoopLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopLimit::Infinite => write!(f, "infinite"),
            LoopLimit::Times(n) => write!(f, "{n}"),
        }
    }
}

/// A point in a sound, declared in the style engine's `<time>` notation:
/// `250ms`, `1.5s`, `2m`, `1h`. A bare number is seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOffset(pub Duration);
impl TimeOffset {
    /// The beginning of the sound.
    pub const ZERO: Self = Self(Duration::ZERO);

    #[allow(missing_docs)]
    pub fn as_duration(&self) -> Duration {
        self.0
    }
}
impl FromStr for TimeOffset {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        static TIME: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"^([+-]?(?:\d+\.?\d*|\.\d+))\s*(ms|s|m|h)?$").expect("time pattern")
        });
        let s = s.trim();
        if s.is_empty() {
            return Err(ValueError::Empty);
        }
        let caps = TIME
            .captures(s)
            .ok_or_else(|| ValueError::NotANumber(s.to_string()))?;
        let value: f64 = caps[1]
            .parse()
            .map_err(|_| ValueError::NotANumber(s.to_string()))?;
        let seconds = match caps.get(2).map(|m| m.as_str()) {
            Some("ms") => value / 1000.0,
            Some("m") => value * 60.0,
            Some("h") => value * 3600.0,
            _ => value,
        };
        Duration::try_from_secs_f64(seconds)
            .map(Self)
            .map_err(|_| ValueError::OutOfRange(s.to_string()))
    }
}
impl DeclaredValue for TimeOffset {}
impl fmt::Display for TimeOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0.as_millis())
    }
}

/// Output level, 0.0..=1.0. Declared as an integer percentage.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Volume(f64);
impl Default for Volume {
    fn default() -> Self {
        Self::MAX
    }
}
impl Volume {
    /// Full volume.
    pub const MAX: Self = Self(1.0);

    /// Creates a [Volume], clamping to the legal range.
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    #[allow(missing_docs)]
    pub fn value(&self) -> f64 {
        self.0
    }
}
impl FromStr for Volume {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let percent = leading_integer(s)?;
        if (0..=100).contains(&percent) {
            Ok(Self(percent as f64 / 100.0))
        } else {
            Err(ValueError::OutOfRange(s.trim().to_string()))
        }
    }
}
impl DeclaredValue for Volume {
    fn parse_or_default(s: &str) -> Self {
        // Anything over 100% is pinned to full. A negative percentage is
        // malformed like any other, and falls back to the default.
        match s.parse() {
            Ok(v) => v,
            Err(ValueError::OutOfRange(_)) => match leading_integer(s) {
                Ok(p) if p > 100 => Self::MAX,
                _ => Self::default(),
            },
            Err(_) => Self::default(),
        }
    }
}
impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", (self.0 * 100.0).round())
    }
}

/// The location of a sound, extracted from a `url(...)` declaration. An
/// empty source means "no sound."
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct AudioSource(pub String);
impl AudioSource {
    #[allow(missing_docs)]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
impl FromStr for AudioSource {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        static URL: Lazy<Regex> =
            Lazy::new(|| Regex::new(r#"\(['"]?(.*?)['"]?\)"#).expect("url pattern"));
        let s = s.trim();
        if s.is_empty() {
            return Err(ValueError::Empty);
        }
        URL.captures(s)
            .map(|caps| Self(caps[1].to_string()))
            .ok_or_else(|| ValueError::NotAUrl(s.to_string()))
    }
}
impl DeclaredValue for AudioSource {}
impl fmt::Display for AudioSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "url({})", self.0)
    }
}

/// The interaction states whose style rules the system emulates with
/// listeners.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum PseudoState {
    /// The element is being pressed.
    Active,
    /// The pointer is over the element.
    Hover,
    /// The element has input focus.
    Focus,
    /// The element is a checked toggle.
    Checked,
}

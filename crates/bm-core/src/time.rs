//! Conversions between wall-clock milliseconds and beat numbers.
//!
//! A non-positive `bpm` is a caller error: the arithmetic is carried out
//! anyway and yields meaningless (infinite or NaN) values.

use crate::prelude::*;

/// The finest subdivision a converted beat is snapped to (a quarter note split in 24).
pub const BEAT_SUBDIVISIONS: f64 = 96.0;

/// Precision used to discard floating point drift.
const ROUNDING_PRECISION: f64 = 1_000_000.0;

/// Rounds `value` to the nearest multiple of `step`.
pub fn round_to_nearest(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

/// Rounds `value` to the nearest multiple of `1 / denominator`.
fn round_to_fraction(value: f64, denominator: f64) -> f64 {
    (value * denominator).round() / denominator
}

/// Rounds to the nearest millionth, so that `11.999994` and `12` compare equal.
pub fn round_away_floating_point_nonsense(value: f64) -> f64 {
    round_to_fraction(value, ROUNDING_PRECISION)
}

/// Replaces a negative zero with a positive one.
pub fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

/// Converts a duration in milliseconds into beats, snapped to the nearest 96th of a beat.
pub fn milliseconds_to_beats(ms: Millis, bpm: Bpm) -> Beats {
    let beats = (ms / 1000.0) * (bpm / 60.0);
    round_to_fraction(beats, BEAT_SUBDIVISIONS)
}

/// Converts beats into milliseconds. Unlike [`milliseconds_to_beats`] no snapping is done.
pub fn beats_to_milliseconds(beats: Beats, bpm: Bpm) -> Millis {
    (beats / (bpm / 60.0)) * 1000.0
}

/// Moves a cursor position to the closest whole beat of the grid.
pub fn snap_to_nearest_beat(cursor_ms: Millis, bpm: Bpm, offset_ms: Millis) -> Millis {
    let beats = milliseconds_to_beats(cursor_ms - offset_ms, bpm).round();
    beats_to_milliseconds(beats, bpm) + offset_ms
}

/// Snaps a beat number to the nearest multiple of `snap`.
pub fn snap_beats(beats: Beats, snap: BeatSnap) -> Beats {
    round_away_floating_point_nonsense(round_to_nearest(beats, snap.as_beats()))
}

/// A grid subdivision used when placing entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BeatSnap {
    /// Number of snap steps that make up a single beat.
    per_beat: u32,
}

impl BeatSnap {
    pub const WHOLE: Self = Self { per_beat: 1 };
    pub const HALF: Self = Self { per_beat: 2 };
    pub const QUARTER: Self = Self { per_beat: 4 };
    pub const EIGHTH: Self = Self { per_beat: 8 };
    pub const SIXTEENTH: Self = Self { per_beat: 16 };

    /// Returns `None` for zero.
    pub fn per_beat(per_beat: u32) -> Option<Self> {
        (per_beat > 0).then_some(Self { per_beat })
    }

    pub fn as_beats(&self) -> Beats {
        1.0 / f64::from(self.per_beat)
    }
}

impl Default for BeatSnap {
    fn default() -> Self {
        Self::QUARTER
    }
}

impl Display for BeatSnap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "1/{}", self.per_beat)
    }
}

/// The two pieces of song metadata that relate audio time to the beat grid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SongTiming {
    pub bpm: Bpm,
    /// Audio-to-grid skew in milliseconds, may be negative.
    pub offset_ms: Millis,
}

impl SongTiming {
    pub fn new(bpm: Bpm, offset_ms: Millis) -> Self {
        Self { bpm, offset_ms }
    }

    /// Beat number under an audio position.
    pub fn position_to_beats(&self, position_ms: Millis) -> Beats {
        milliseconds_to_beats(position_ms - self.offset_ms, self.bpm)
    }

    /// Audio position of a beat number.
    pub fn beats_to_position(&self, beats: Beats) -> Millis {
        beats_to_milliseconds(beats, self.bpm) + self.offset_ms
    }

    pub fn snap_to_nearest_beat(&self, position_ms: Millis) -> Millis {
        snap_to_nearest_beat(position_ms, self.bpm, self.offset_ms)
    }
}

use super::*;

/// Source of the current audio playback position.
pub trait Clock {
    fn snapshot(&self) -> ClockSnapshot;
}

/// Playback state captured at a single instant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ClockSnapshot {
    pub bpm: Bpm,
    pub offset_ms: Millis,
    pub position_ms: Millis,
}

impl ClockSnapshot {
    pub fn timing(&self) -> SongTiming {
        SongTiming::new(self.bpm, self.offset_ms)
    }

    /// The beat under the playhead.
    pub fn cursor_beat(&self) -> Beats {
        self.timing().position_to_beats(self.position_ms)
    }

    /// The playhead moved onto the closest whole beat.
    pub fn snapped_position(&self) -> Millis {
        self.timing().snap_to_nearest_beat(self.position_ms)
    }
}

/// A clock that is not running, e.g. a paused editor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock(pub ClockSnapshot);

impl Clock for FixedClock {
    fn snapshot(&self) -> ClockSnapshot {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_position() {
        let clock = FixedClock(ClockSnapshot {
            bpm: 120.0,
            offset_ms: -500.0,
            position_ms: 1000.0,
        });
        let snapshot = clock.snapshot();
        assert_eq!(snapshot.cursor_beat(), 3.0);
        assert_eq!(
            ClockSnapshot {
                position_ms: 1200.0,
                ..snapshot
            }
            .snapped_position(),
            1000.0
        );
    }
}

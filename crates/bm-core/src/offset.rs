//! Moving entities between grid-relative and offset-inclusive beat numbers.

use crate::prelude::*;

/// An entity positioned on the timeline.
pub trait Timed {
    fn time(&self) -> Beats;
    fn set_time(&mut self, time: Beats);
}

macro_rules! impl_timed {
    ($($entity:ty),*) => {
        $(
            impl Timed for $entity {
                fn time(&self) -> Beats {
                    self.time
                }

                fn set_time(&mut self, time: Beats) {
                    self.time = time;
                }
            }
        )*
    };
}

impl_timed!(Note, Obstacle, BasicEvent);

fn shift_by_beats<T: Timed + Clone>(entities: &[T], offset_beats: Beats) -> Vec<T> {
    entities
        .iter()
        .map(|entity| {
            let mut entity = entity.clone();
            let time = round_away_floating_point_nonsense(entity.time() + offset_beats);
            entity.set_time(normalize_zero(time));
            entity
        })
        .collect()
}

/// Moves entities later by `offset_ms`, expressed in beats at the given `bpm`.
pub fn shift_entities_by_offset<T: Timed + Clone>(
    entities: &[T],
    offset_ms: Millis,
    bpm: Bpm,
) -> Vec<T> {
    shift_by_beats(entities, milliseconds_to_beats(offset_ms, bpm))
}

/// Undoes [`shift_entities_by_offset`].
pub fn unshift_entities_by_offset<T: Timed + Clone>(
    entities: &[T],
    offset_ms: Millis,
    bpm: Bpm,
) -> Vec<T> {
    shift_by_beats(entities, -milliseconds_to_beats(offset_ms, bpm))
}

impl Entities {
    pub fn shifted(&self, offset_ms: Millis, bpm: Bpm) -> Self {
        Self {
            notes: shift_entities_by_offset(&self.notes, offset_ms, bpm),
            obstacles: shift_entities_by_offset(&self.obstacles, offset_ms, bpm),
            events: shift_entities_by_offset(&self.events, offset_ms, bpm),
        }
    }

    pub fn unshifted(&self, offset_ms: Millis, bpm: Bpm) -> Self {
        Self {
            notes: unshift_entities_by_offset(&self.notes, offset_ms, bpm),
            obstacles: unshift_entities_by_offset(&self.obstacles, offset_ms, bpm),
            events: unshift_entities_by_offset(&self.events, offset_ms, bpm),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn notes_at(times: &[Beats]) -> Vec<Note> {
        times
            .iter()
            .map(|&time| Note::new(time, 0, 0, NoteKind::Blue, CutDirection::Any))
            .collect()
    }

    fn times<T: Timed>(entities: &[T]) -> Vec<Beats> {
        entities.iter().map(Timed::time).collect()
    }

    #[test]
    fn shift_forward() {
        let notes = notes_at(&[0.0, 1.5, 4.0]);
        let shifted = shift_entities_by_offset(&notes, 250.0, 120.0);
        assert_eq!(times(&shifted), vec![0.5, 2.0, 4.5]);
        // Input is untouched
        assert_eq!(times(&notes), vec![0.0, 1.5, 4.0]);
        assert_eq!(shifted[1].id, notes[1].id);
    }

    #[test]
    fn unshift_backward_keeps_negative_times() {
        let events = vec![BasicEvent::trigger(0.25, TrackId::SmallRing)];
        let unshifted = unshift_entities_by_offset(&events, 250.0, 120.0);
        assert_eq!(times(&unshifted), vec![-0.25]);
    }

    #[test]
    fn negative_zero_is_never_produced() {
        let notes = notes_at(&[0.5]);
        let unshifted = unshift_entities_by_offset(&notes, 250.0, 120.0);
        assert_eq!(unshifted[0].time, 0.0);
        assert!(unshifted[0].time.is_sign_positive());

        // Rounds to a negative zero before normalization
        let notes = notes_at(&[-0.0000001]);
        let shifted = shift_entities_by_offset(&notes, 0.0, 120.0);
        assert_eq!(shifted[0].time, 0.0);
        assert!(shifted[0].time.is_sign_positive());
    }

    #[test]
    fn drift_is_rounded_away() {
        let notes = notes_at(&[0.1]);
        let shifted = shift_entities_by_offset(&notes, 100.0, 120.0);
        // 100ms at 120bpm snaps to 19/96 of a beat
        assert_eq!(shifted[0].time, round_away_floating_point_nonsense(0.1 + 19.0 / 96.0));
    }

    #[test]
    fn shift_all_entities() {
        let entities = Entities {
            notes: notes_at(&[1.0]),
            obstacles: vec![Obstacle::ceiling(2.0, 1, 4.0, 2)],
            events: vec![BasicEvent::value(3.0, TrackId::LaserSpeedLeft, 3)],
        };
        let shifted = entities.shifted(-500.0, 60.0);
        assert_eq!(times(&shifted.notes), vec![0.5]);
        assert_eq!(times(&shifted.obstacles), vec![1.5]);
        assert_eq!(shifted.obstacles[0].duration, 4.0);
        assert_eq!(times(&shifted.events), vec![2.5]);
        assert_eq!(shifted.unshifted(-500.0, 60.0), entities);
    }

    proptest! {
        #[test]
        fn unshift_undoes_shift(
            micro_beats in proptest::collection::vec(-64_000_000i64..512_000_000, 0..16),
            offset in -2_000.0f64..2_000.0,
            bpm in 40.0f64..300.0,
        ) {
            let raw_times: Vec<Beats> = micro_beats.iter().map(|&x| x as f64 / 1e6).collect();
            let notes = notes_at(&raw_times);
            let shifted = shift_entities_by_offset(&notes, offset, bpm);
            let restored = unshift_entities_by_offset(&shifted, offset, bpm);
            for (original, restored) in notes.iter().zip(&restored) {
                prop_assert!((original.time - restored.time).abs() <= 1e-6);
            }
        }
    }
}

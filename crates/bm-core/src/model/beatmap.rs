use super::*;

/// All timed entities of a single difficulty.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Entities {
    pub notes: Vec<Note>,
    pub obstacles: Vec<Obstacle>,
    pub events: Vec<BasicEvent>,
}

/// A difficulty being edited, with entity times relative to the grid's beat-zero.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Beatmap {
    pub entities: Entities,
}

/// Read access to the entities being edited.
pub trait EntityRepository {
    /// Events of a single track, in no particular order.
    fn events_for_track(&self, track_id: TrackId) -> Vec<BasicEvent>;
    fn all_entities(&self) -> Entities;
}

impl Entities {
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty() && self.obstacles.is_empty() && self.events.is_empty()
    }

    /// Sorts every list by time, keeping the relative order of simultaneous entities.
    pub fn sort(&mut self) {
        self.notes.sort_by(|a, b| a.time.total_cmp(&b.time));
        self.obstacles.sort_by(|a, b| a.time.total_cmp(&b.time));
        self.events.sort_by(|a, b| a.time.total_cmp(&b.time));
    }
}

impl Beatmap {
    pub fn new(entities: Entities) -> Self {
        Self { entities }
    }

    /// Calculate the last beat when anything happens.
    pub fn last_beat(&self) -> Beats {
        let notes = self.entities.notes.iter().map(|note| note.time);
        let obstacles = self.entities.obstacles.iter().map(Obstacle::end);
        let events = self.entities.events.iter().map(|event| event.time);
        notes
            .chain(obstacles)
            .chain(events)
            .max_by(f64::total_cmp)
            .unwrap_or(0.0)
    }
}

impl EntityRepository for Beatmap {
    fn events_for_track(&self, track_id: TrackId) -> Vec<BasicEvent> {
        self.entities
            .events
            .iter()
            .filter(|event| event.track_id == track_id)
            .cloned()
            .collect()
    }

    fn all_entities(&self) -> Entities {
        self.entities.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_beat_includes_obstacle_tails() {
        let beatmap = Beatmap::new(Entities {
            notes: vec![Note::new(12.0, 1, 0, NoteKind::Red, CutDirection::Down)],
            obstacles: vec![Obstacle::full(8.0, 0, 6.0, 1)],
            events: vec![BasicEvent::trigger(10.0, TrackId::LargeRing)],
        });
        assert_eq!(beatmap.last_beat(), 14.0);
        assert_eq!(Beatmap::default().last_beat(), 0.0);
    }

    #[test]
    fn events_are_filtered_by_track() {
        let beatmap = Beatmap::new(Entities {
            events: vec![
                BasicEvent::trigger(1.0, TrackId::LargeRing),
                BasicEvent::trigger(2.0, TrackId::SmallRing),
                BasicEvent::value(3.0, TrackId::LaserSpeedLeft, 4),
            ],
            ..Entities::default()
        });
        let rings = beatmap.events_for_track(TrackId::SmallRing);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].time, 2.0);
        assert_eq!(beatmap.all_entities(), beatmap.entities);
    }
}

use super::*;

/// Difficulty files of the first release carry their own timing fields
/// and lack event brightness.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Difficulty {
    #[serde(rename = "_version", default)]
    pub version: String,
    #[serde(rename = "_beatsPerMinute", default)]
    pub beats_per_minute: f64,
    #[serde(rename = "_beatsPerBar", default = "default_beats_per_bar")]
    pub beats_per_bar: i32,
    #[serde(rename = "_noteJumpSpeed", default)]
    pub note_jump_speed: f64,
    #[serde(rename = "_shuffle", default)]
    pub shuffle: f64,
    #[serde(rename = "_shufflePeriod", default = "default_shuffle_period")]
    pub shuffle_period: f64,
    #[serde(rename = "_notes", default)]
    pub notes: Vec<v2::Note>,
    #[serde(rename = "_obstacles", default)]
    pub obstacles: Vec<v2::Obstacle>,
    #[serde(rename = "_events", default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    #[serde(rename = "_time")]
    pub time: f64,
    #[serde(rename = "_type")]
    pub kind: i32,
    #[serde(rename = "_value")]
    pub value: i32,
}

fn default_beats_per_bar() -> i32 {
    16
}

fn default_shuffle_period() -> f64 {
    0.5
}

pub fn parse(document: Value) -> Result<Entities> {
    let difficulty: Difficulty = serde_json::from_value(document)?;
    Ok(Entities {
        notes: difficulty
            .notes
            .iter()
            .enumerate()
            .map(|(index, note)| v2::note_from_legacy(index, note))
            .collect::<Result<_>>()?,
        obstacles: difficulty
            .obstacles
            .iter()
            .enumerate()
            .map(|(index, obstacle)| v2::obstacle_from_legacy(index, obstacle))
            .collect::<Result<_>>()?,
        events: collect_events(difficulty.events.iter().enumerate().map(|(index, event)| {
            let is_light = TrackId::from_event_type(event.kind).is_some_and(|track| track.is_light());
            // Lights are either off or at full brightness
            let float_value = if is_light && event.value == 0 { 0.0 } else { 1.0 };
            RawEvent {
                index,
                time: event.time,
                event_type: event.kind,
                value: event.value,
                float_value,
            }
        }))?,
    })
}

/// Brightness is lost: lights with a brightness of zero are written as off.
pub fn write(entities: &Entities, bpm: Bpm, note_jump_speed: f64) -> Result<Value> {
    let difficulty = Difficulty {
        version: FormatVersion::V1.marker().to_owned(),
        beats_per_minute: bpm,
        beats_per_bar: default_beats_per_bar(),
        note_jump_speed,
        shuffle: 0.0,
        shuffle_period: default_shuffle_period(),
        notes: entities.notes.iter().map(v2::note_to_legacy).collect(),
        obstacles: entities.obstacles.iter().map(v2::obstacle_to_legacy).collect(),
        events: entities
            .events
            .iter()
            .enumerate()
            .map(|(index, event)| {
                let raw = RawEvent::from_event(index, event)?;
                let value = if event.track_id.is_light() && event.float_value <= 0.0 {
                    0
                } else {
                    raw.value
                };
                Ok(Event {
                    time: raw.time,
                    kind: raw.event_type,
                    value,
                })
            })
            .collect::<Result<_>>()?,
    };
    Ok(serde_json::to_value(difficulty)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn events_default_to_full_brightness() {
        let document = json!({
            "_version": "1.5.0",
            "_beatsPerMinute": 128.0,
            "_events": [
                { "_time": 1.0, "_type": 0, "_value": 1 },
                { "_time": 2.0, "_type": 0, "_value": 0 }
            ]
        });
        let entities = parse(document).unwrap();
        assert_eq!(entities.events.len(), 2);
        assert!(entities.events[0].is_on());
        assert_eq!(entities.events[0].color_type, Some(EventColor::Secondary));
        assert_eq!(entities.events[1].effect, EventEffect::Off);
        assert_eq!(entities.events[1].float_value, 0.0);
    }

    #[test]
    fn dark_lights_are_written_off() {
        let entities = Entities {
            events: vec![BasicEvent::light(
                1.0,
                TrackId::LaserBack,
                EventEffect::On,
                EventColor::Primary,
            )
            .with_brightness(0.0)],
            ..Entities::default()
        };
        let document = write(&entities, 100.0, 10.0).unwrap();
        assert_eq!(document["_events"][0]["_value"], json!(0));
        assert_eq!(document["_beatsPerMinute"], json!(100.0));
        assert!(document["_events"][0].get("_floatValue").is_none());
    }
}

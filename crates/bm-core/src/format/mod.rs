//! Versioned on-disk beatmap documents.
//!
//! Documents store offset-inclusive beat numbers while the rest of the editor
//! works with grid-relative ones, so loading unshifts by the song offset and
//! saving shifts it back in.

/// First release, with per-difficulty timing fields.
pub mod v1;
/// Underscore-prefixed flat fields.
pub mod v2;
/// Short keyed objects, bombs split from notes.
pub mod v3;
/// Index-compressed objects with shared data pools, lightshow in a separate file.
pub mod v4;

mod info;

pub use self::info::*;

use crate::prelude::*;

use serde_json::Value;

pub type Result<T, E = FormatError> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum FormatError {
    #[error("Malformed document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid {field} value {value} on {entity} #{index}")]
    InvalidValue {
        entity: &'static str,
        index: usize,
        field: &'static str,
        value: String,
    },
}

impl FormatError {
    pub(crate) fn invalid(
        entity: &'static str,
        index: usize,
        field: &'static str,
        value: impl Display,
    ) -> Self {
        Self::InvalidValue {
            entity,
            index,
            field,
            value: value.to_string(),
        }
    }
}

/// Note jump speed written into v1 documents, which keep it per difficulty.
pub const DEFAULT_NOTE_JUMP_SPEED: f64 = 10.0;

/// A parsed difficulty and the version it was stored in.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedBeatmap {
    pub beatmap: Beatmap,
    pub version: FormatVersion,
}

/// An event as stored in every version: a type, a packed value and a brightness.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawEvent {
    pub index: usize,
    pub time: Beats,
    pub event_type: i32,
    pub value: i32,
    pub float_value: f64,
}

impl RawEvent {
    /// Returns `None` for event types the editor does not handle.
    fn into_event(self) -> Result<Option<BasicEvent>> {
        let Some(track_id) = TrackId::from_event_type(self.event_type) else {
            return Ok(None);
        };
        let mut event = BasicEvent {
            id: EntityId::new(),
            time: self.time,
            track_id,
            effect: EventEffect::Trigger,
            color_type: None,
            float_value: self.float_value,
            value: self.value,
        };
        match track_id.kind() {
            TrackKind::Light => {
                let (effect, color) = decode_light_value(self.value).ok_or_else(|| {
                    FormatError::invalid("event", self.index, "value", self.value)
                })?;
                event.effect = effect;
                event.color_type = color;
                event.value = 0;
            }
            TrackKind::Trigger => event.effect = EventEffect::Trigger,
            TrackKind::Value => event.effect = EventEffect::Value,
        }
        Ok(Some(event))
    }

    fn from_event(index: usize, event: &BasicEvent) -> Result<Self> {
        let value = match event.track_id.kind() {
            TrackKind::Light => encode_light_value(event.effect, event.color_type).ok_or_else(
                || FormatError::invalid("event", index, "effect", format!("{:?}", event.effect)),
            )?,
            TrackKind::Trigger | TrackKind::Value => event.value,
        };
        Ok(Self {
            index,
            time: event.time,
            event_type: event.track_id.event_type(),
            value,
            float_value: event.float_value,
        })
    }
}

fn collect_events(raw: impl IntoIterator<Item = RawEvent>) -> Result<Vec<BasicEvent>> {
    let mut events = Vec::new();
    for raw in raw {
        events.extend(raw.into_event()?);
    }
    Ok(events)
}

/// Reads the schema version marker of a document, if there is a recognizable one.
pub fn detect_version(document: &Value) -> Option<FormatVersion> {
    let marker = document
        .get("version")
        .or_else(|| document.get("_version"))?
        .as_str()?;
    marker.parse().ok()
}

/// Parses a difficulty document, falling back to `fallback` when it has no recognizable version.
/// Entity times are returned relative to the beat grid.
pub fn deserialize_beatmap(
    document: &str,
    timing: SongTiming,
    fallback: FormatVersion,
) -> Result<LoadedBeatmap> {
    let document: Value = serde_json::from_str(document)?;
    deserialize_beatmap_value(document, timing, fallback)
}

pub fn deserialize_beatmap_value(
    document: Value,
    timing: SongTiming,
    fallback: FormatVersion,
) -> Result<LoadedBeatmap> {
    let version = detect_version(&document).unwrap_or(fallback);
    let entities = match version {
        FormatVersion::V1 => v1::parse(document)?,
        FormatVersion::V2 => v2::parse(document)?,
        FormatVersion::V3 => v3::parse(document)?,
        FormatVersion::V4 => v4::parse(document)?,
    };
    Ok(LoadedBeatmap {
        beatmap: Beatmap::new(entities.unshifted(timing.offset_ms, timing.bpm)),
        version,
    })
}

/// Writes a difficulty document. For v4 the events end up in the same document,
/// callers that store the lightshow separately can split them with [`split_lightshow`].
pub fn serialize_beatmap(
    beatmap: &Beatmap,
    timing: SongTiming,
    version: FormatVersion,
) -> Result<Value> {
    serialize_difficulty(beatmap, timing, version, DEFAULT_NOTE_JUMP_SPEED)
}

/// Same as [`serialize_beatmap`], with the difficulty's note jump speed
/// for v1 documents, which store it per difficulty.
pub fn serialize_difficulty(
    beatmap: &Beatmap,
    timing: SongTiming,
    version: FormatVersion,
    note_jump_speed: f64,
) -> Result<Value> {
    let mut entities = beatmap.entities.shifted(timing.offset_ms, timing.bpm);
    entities.sort();
    match version {
        FormatVersion::V1 => v1::write(&entities, timing.bpm, note_jump_speed),
        FormatVersion::V2 => v2::write(&entities),
        FormatVersion::V3 => v3::write(&entities),
        FormatVersion::V4 => v4::write(&entities),
    }
}

/// Moves the event arrays of a v4 document into a lightshow document of their own.
pub fn split_lightshow(document: &mut Value) -> Value {
    let mut lightshow = serde_json::Map::new();
    lightshow.insert(
        "version".to_owned(),
        Value::from(FormatVersion::V4.marker()),
    );
    if let Some(object) = document.as_object_mut() {
        for key in ["basicEvents", "basicEventsData"] {
            if let Some(value) = object.remove(key) {
                lightshow.insert(key.to_owned(), value);
            }
        }
    }
    Value::Object(lightshow)
}

/// Merges a v4 lightshow document back into its difficulty document.
pub fn merge_lightshow(document: &mut Value, lightshow: Value) {
    if let (Some(object), Value::Object(lightshow)) = (document.as_object_mut(), lightshow) {
        for key in ["basicEvents", "basicEventsData"] {
            if let Some(value) = lightshow.get(key) {
                object.insert(key.to_owned(), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(json!({ "_version": "2.0.0" }), Some(FormatVersion::V2))]
    #[test_case(json!({ "_version": "1.5.0" }), Some(FormatVersion::V1))]
    #[test_case(json!({ "version": "3.3.0" }), Some(FormatVersion::V3))]
    #[test_case(json!({ "version": "4.0.0" }), Some(FormatVersion::V4))]
    #[test_case(json!({ "version": "9.0.0" }), None; "unknown major")]
    #[test_case(json!({ "version": 3 }), None; "not a string")]
    #[test_case(json!({}), None; "missing")]
    fn version_marker(document: Value, expected: Option<FormatVersion>) {
        assert_eq!(detect_version(&document), expected);
    }

    fn sample() -> Beatmap {
        Beatmap::new(Entities {
            notes: vec![
                Note::new(0.0, 0, 0, NoteKind::Red, CutDirection::Down),
                Note::new(2.5, 3, 2, NoteKind::Bomb, CutDirection::Any),
            ],
            obstacles: vec![Obstacle::ceiling(1.0, 1, 2.0, 2)],
            events: vec![
                BasicEvent::light(0.0, TrackId::PrimaryLight, EventEffect::On, EventColor::Primary),
                BasicEvent::off(1.5, TrackId::PrimaryLight),
                BasicEvent::trigger(2.0, TrackId::LargeRing),
                BasicEvent::value(2.0, TrackId::LaserSpeedLeft, 5),
            ],
        })
    }

    /// Ignores ids, which are regenerated on every load.
    fn summary(beatmap: &Beatmap) -> Value {
        let mut value = serde_json::to_value(&beatmap.entities).unwrap();
        for list in ["notes", "obstacles", "events"] {
            for entity in value[list].as_array_mut().unwrap() {
                entity.as_object_mut().unwrap().remove("id");
            }
        }
        value
    }

    #[test_case(FormatVersion::V1)]
    #[test_case(FormatVersion::V2)]
    #[test_case(FormatVersion::V3)]
    #[test_case(FormatVersion::V4)]
    fn document_round_trip(version: FormatVersion) {
        let timing = SongTiming::new(120.0, 250.0);
        let document = serialize_beatmap(&sample(), timing, version).unwrap();
        let json = serde_json::to_string(&document).unwrap();
        let loaded = deserialize_beatmap(&json, timing, FormatVersion::V2).unwrap();
        assert_eq!(loaded.version, version);
        assert_eq!(summary(&loaded.beatmap), summary(&sample()));
    }

    #[test]
    fn offset_is_embedded_on_save() {
        let timing = SongTiming::new(120.0, 250.0);
        let document = serialize_beatmap(&sample(), timing, FormatVersion::V2).unwrap();
        assert_eq!(document["_notes"][0]["_time"], json!(0.5));
        assert_eq!(document["_notes"][1]["_time"], json!(3.0));
    }

    #[test]
    fn offset_is_removed_on_load() {
        let document = r#"{
            "_version": "2.0.0",
            "_notes": [{ "_time": 1.0, "_lineIndex": 0, "_lineLayer": 0, "_type": 1, "_cutDirection": 0 }]
        }"#;
        let loaded =
            deserialize_beatmap(document, SongTiming::new(60.0, 500.0), FormatVersion::V3).unwrap();
        assert_eq!(loaded.beatmap.entities.notes[0].time, 0.5);
    }

    #[test]
    fn missing_version_uses_fallback() {
        let document = r#"{ "colorNotes": [{ "b": 1.0, "x": 0, "y": 0, "c": 0, "d": 0 }] }"#;
        let loaded =
            deserialize_beatmap(document, SongTiming::new(120.0, 0.0), FormatVersion::V3).unwrap();
        assert_eq!(loaded.version, FormatVersion::V3);
        assert_eq!(loaded.beatmap.entities.notes.len(), 1);
    }

    #[test]
    fn malformed_document_fails() {
        let result = deserialize_beatmap("[1, 2", SongTiming::new(120.0, 0.0), FormatVersion::V2);
        assert!(matches!(result, Err(FormatError::Json(_))));
    }

    #[test]
    fn invalid_light_value_fails() {
        let document = r#"{ "_version": "2.0.0", "_events": [{ "_time": 1.0, "_type": 2, "_value": 42 }] }"#;
        let result = deserialize_beatmap(document, SongTiming::new(120.0, 0.0), FormatVersion::V2);
        assert!(matches!(
            result,
            Err(FormatError::InvalidValue { entity: "event", field: "value", .. })
        ));
    }

    #[test]
    fn lit_event_without_color_cannot_be_written() {
        let mut event = BasicEvent::light(0.0, TrackId::LaserLeft, EventEffect::On, EventColor::White);
        event.color_type = None;
        let beatmap = Beatmap::new(Entities {
            events: vec![event],
            ..Entities::default()
        });
        let result = serialize_beatmap(&beatmap, SongTiming::new(120.0, 0.0), FormatVersion::V3);
        assert!(matches!(result, Err(FormatError::InvalidValue { .. })));
    }

    #[test]
    fn invalid_event_is_reported_by_position() {
        let mut event = BasicEvent::light(2.0, TrackId::LaserRight, EventEffect::On, EventColor::White);
        event.color_type = None;
        let beatmap = Beatmap::new(Entities {
            events: vec![BasicEvent::trigger(1.0, TrackId::LargeRing), event],
            ..Entities::default()
        });
        for version in enum_iterator::all::<FormatVersion>() {
            let result = serialize_beatmap(&beatmap, SongTiming::new(120.0, 0.0), version);
            assert!(
                matches!(
                    result,
                    Err(FormatError::InvalidValue { entity: "event", index: 1, field: "effect", .. })
                ),
                "{version}"
            );
        }
    }

    #[test]
    fn v1_keeps_note_jump_speed() {
        let timing = SongTiming::new(120.0, 0.0);
        let document = serialize_difficulty(&sample(), timing, FormatVersion::V1, 16.0).unwrap();
        assert_eq!(document["_noteJumpSpeed"], json!(16.0));
        let document = serialize_beatmap(&sample(), timing, FormatVersion::V1).unwrap();
        assert_eq!(document["_noteJumpSpeed"], json!(DEFAULT_NOTE_JUMP_SPEED));
    }

    #[test]
    fn lightshow_split_and_merge() {
        let timing = SongTiming::new(120.0, 0.0);
        let mut document = serialize_beatmap(&sample(), timing, FormatVersion::V4).unwrap();
        let lightshow = split_lightshow(&mut document);
        assert!(document.get("basicEvents").is_none());
        assert_eq!(lightshow["basicEvents"].as_array().map(Vec::len), Some(4));

        merge_lightshow(&mut document, lightshow);
        let loaded = deserialize_beatmap_value(document, timing, FormatVersion::V4).unwrap();
        assert_eq!(loaded.beatmap.entities.events.len(), 4);
    }
}

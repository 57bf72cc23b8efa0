use super::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Difficulty {
    #[serde(rename = "_version", default)]
    pub version: String,
    #[serde(rename = "_notes", default)]
    pub notes: Vec<Note>,
    #[serde(rename = "_obstacles", default)]
    pub obstacles: Vec<Obstacle>,
    #[serde(rename = "_events", default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    #[serde(rename = "_time")]
    pub time: f64,
    #[serde(rename = "_lineIndex")]
    pub line_index: i32,
    #[serde(rename = "_lineLayer")]
    pub line_layer: i32,
    /// `0` red, `1` blue, `3` bomb.
    #[serde(rename = "_type")]
    pub kind: i32,
    #[serde(rename = "_cutDirection")]
    pub cut_direction: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Obstacle {
    #[serde(rename = "_time")]
    pub time: f64,
    #[serde(rename = "_lineIndex")]
    pub line_index: i32,
    /// `0` full height wall, `1` ceiling wall.
    #[serde(rename = "_type")]
    pub kind: i32,
    #[serde(rename = "_duration")]
    pub duration: f64,
    #[serde(rename = "_width")]
    pub width: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    #[serde(rename = "_time")]
    pub time: f64,
    #[serde(rename = "_type")]
    pub kind: i32,
    #[serde(rename = "_value")]
    pub value: i32,
    /// Missing before `2.5.0`.
    #[serde(rename = "_floatValue", default = "default_float_value")]
    pub float_value: f64,
}

fn default_float_value() -> f64 {
    1.0
}

const BOMB_TYPE: i32 = 3;

pub(super) fn note_from_legacy(index: usize, note: &Note) -> Result<crate::model::Note> {
    let kind = match note.kind {
        0 => NoteKind::Red,
        1 => NoteKind::Blue,
        BOMB_TYPE => NoteKind::Bomb,
        other => return Err(FormatError::invalid("note", index, "_type", other)),
    };
    let direction = CutDirection::from_repr(note.cut_direction).ok_or_else(|| {
        FormatError::invalid("note", index, "_cutDirection", note.cut_direction)
    })?;
    Ok(crate::model::Note {
        id: EntityId::new(),
        time: note.time,
        column: note.line_index,
        row: note.line_layer,
        kind,
        direction,
        angle_offset: 0,
    })
}

pub(super) fn note_to_legacy(note: &crate::model::Note) -> Note {
    Note {
        time: note.time,
        line_index: note.column,
        line_layer: note.row,
        kind: note.kind.color_index().unwrap_or(BOMB_TYPE),
        cut_direction: note.direction.repr(),
    }
}

pub(super) fn obstacle_from_legacy(
    index: usize,
    obstacle: &Obstacle,
) -> Result<crate::model::Obstacle> {
    let build = match obstacle.kind {
        0 => crate::model::Obstacle::full,
        1 => crate::model::Obstacle::ceiling,
        other => return Err(FormatError::invalid("obstacle", index, "_type", other)),
    };
    Ok(build(
        obstacle.time,
        obstacle.line_index,
        obstacle.duration,
        obstacle.width,
    ))
}

pub(super) fn obstacle_to_legacy(obstacle: &crate::model::Obstacle) -> Obstacle {
    Obstacle {
        time: obstacle.time,
        line_index: obstacle.column,
        kind: i32::from(obstacle.is_ceiling()),
        duration: obstacle.duration,
        width: obstacle.width,
    }
}

pub fn parse(document: Value) -> Result<Entities> {
    let difficulty: Difficulty = serde_json::from_value(document)?;
    Ok(Entities {
        notes: difficulty
            .notes
            .iter()
            .enumerate()
            .map(|(index, note)| note_from_legacy(index, note))
            .collect::<Result<_>>()?,
        obstacles: difficulty
            .obstacles
            .iter()
            .enumerate()
            .map(|(index, obstacle)| obstacle_from_legacy(index, obstacle))
            .collect::<Result<_>>()?,
        events: collect_events(difficulty.events.iter().enumerate().map(|(index, event)| {
            RawEvent {
                index,
                time: event.time,
                event_type: event.kind,
                value: event.value,
                float_value: event.float_value,
            }
        }))?,
    })
}

pub fn write(entities: &Entities) -> Result<Value> {
    let difficulty = Difficulty {
        version: FormatVersion::V2.marker().to_owned(),
        notes: entities.notes.iter().map(note_to_legacy).collect(),
        obstacles: entities.obstacles.iter().map(obstacle_to_legacy).collect(),
        events: entities
            .events
            .iter()
            .enumerate()
            .map(|(index, event)| {
                let raw = RawEvent::from_event(index, event)?;
                Ok(Event {
                    time: raw.time,
                    kind: raw.event_type,
                    value: raw.value,
                    float_value: raw.float_value,
                })
            })
            .collect::<Result<_>>()?,
    };
    Ok(serde_json::to_value(difficulty)?)
}

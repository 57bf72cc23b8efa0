use super::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Difficulty {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub color_notes: Vec<ColorNote>,
    #[serde(default)]
    pub bomb_notes: Vec<BombNote>,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    #[serde(default)]
    pub basic_beatmap_events: Vec<BasicBeatmapEvent>,
    #[serde(default = "default_compatible_events")]
    pub use_normal_events_as_compatible_events: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColorNote {
    pub b: f64,
    pub x: i32,
    pub y: i32,
    /// `0` red, `1` blue.
    pub c: i32,
    pub d: i32,
    /// Angle offset in degrees.
    #[serde(default)]
    pub a: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BombNote {
    pub b: f64,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Obstacle {
    pub b: f64,
    pub x: i32,
    pub y: i32,
    /// Duration in beats.
    pub d: f64,
    pub w: i32,
    pub h: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BasicBeatmapEvent {
    pub b: f64,
    /// Event type, i.e. the track.
    pub et: i32,
    /// Packed value.
    pub i: i32,
    /// Brightness.
    pub f: f64,
}

fn default_compatible_events() -> bool {
    true
}

pub(super) fn color_note_kind(index: usize, color: i32) -> Result<NoteKind> {
    match color {
        0 => Ok(NoteKind::Red),
        1 => Ok(NoteKind::Blue),
        other => Err(FormatError::invalid("color note", index, "c", other)),
    }
}

pub(super) fn cut_direction(index: usize, direction: i32) -> Result<CutDirection> {
    CutDirection::from_repr(direction)
        .ok_or_else(|| FormatError::invalid("color note", index, "d", direction))
}

pub(super) fn bomb(time: Beats, x: i32, y: i32) -> Note {
    Note::new(time, x, y, NoteKind::Bomb, CutDirection::Any)
}

pub fn parse(document: Value) -> Result<Entities> {
    let difficulty: Difficulty = serde_json::from_value(document)?;

    let mut notes = difficulty
        .color_notes
        .iter()
        .enumerate()
        .map(|(index, note)| {
            Ok(Note {
                angle_offset: note.a,
                ..Note::new(
                    note.b,
                    note.x,
                    note.y,
                    color_note_kind(index, note.c)?,
                    cut_direction(index, note.d)?,
                )
            })
        })
        .collect::<Result<Vec<_>>>()?;
    notes.extend(
        difficulty
            .bomb_notes
            .iter()
            .map(|note| bomb(note.b, note.x, note.y)),
    );

    let obstacles = difficulty
        .obstacles
        .iter()
        .map(|obstacle| crate::model::Obstacle {
            id: EntityId::new(),
            time: obstacle.b,
            column: obstacle.x,
            row: obstacle.y,
            duration: obstacle.d,
            width: obstacle.w,
            height: obstacle.h,
        })
        .collect();

    let events = collect_events(difficulty.basic_beatmap_events.iter().enumerate().map(
        |(index, event)| RawEvent {
            index,
            time: event.b,
            event_type: event.et,
            value: event.i,
            float_value: event.f,
        },
    ))?;

    let mut entities = Entities {
        notes,
        obstacles,
        events,
    };
    entities.sort();
    Ok(entities)
}

pub fn write(entities: &Entities) -> Result<Value> {
    let (bombs, colored): (Vec<&Note>, Vec<&Note>) = entities
        .notes
        .iter()
        .partition(|note| note.kind == NoteKind::Bomb);

    let difficulty = Difficulty {
        version: FormatVersion::V3.marker().to_owned(),
        color_notes: colored
            .into_iter()
            .map(|note| ColorNote {
                b: note.time,
                x: note.column,
                y: note.row,
                c: note.kind.color_index().unwrap_or_default(),
                d: note.direction.repr(),
                a: note.angle_offset,
            })
            .collect(),
        bomb_notes: bombs
            .into_iter()
            .map(|note| BombNote {
                b: note.time,
                x: note.column,
                y: note.row,
            })
            .collect(),
        obstacles: entities
            .obstacles
            .iter()
            .map(|obstacle| Obstacle {
                b: obstacle.time,
                x: obstacle.column,
                y: obstacle.row,
                d: obstacle.duration,
                w: obstacle.width,
                h: obstacle.height,
            })
            .collect(),
        basic_beatmap_events: entities
            .events
            .iter()
            .enumerate()
            .map(|(index, event)| {
                let raw = RawEvent::from_event(index, event)?;
                Ok(BasicBeatmapEvent {
                    b: raw.time,
                    et: raw.event_type,
                    i: raw.value,
                    f: raw.float_value,
                })
            })
            .collect::<Result<_>>()?,
        use_normal_events_as_compatible_events: true,
    };
    Ok(serde_json::to_value(difficulty)?)
}

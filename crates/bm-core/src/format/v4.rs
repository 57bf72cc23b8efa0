use super::*;

use std::hash::Hash;

/// Objects only hold their beat and an index into a pool of shared data.
/// Lightshow documents carry only the event arrays and parse through the same structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Difficulty {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub color_notes: Vec<Object>,
    #[serde(default)]
    pub color_notes_data: Vec<ColorNoteData>,
    #[serde(default)]
    pub bomb_notes: Vec<Object>,
    #[serde(default)]
    pub bomb_notes_data: Vec<BombNoteData>,
    #[serde(default)]
    pub obstacles: Vec<Object>,
    #[serde(default)]
    pub obstacles_data: Vec<ObstacleData>,
    #[serde(default)]
    pub basic_events: Vec<EventObject>,
    #[serde(default)]
    pub basic_events_data: Vec<BasicEventData>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Object {
    pub b: f64,
    /// Rotation lane.
    #[serde(default)]
    pub r: i32,
    pub i: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventObject {
    pub b: f64,
    pub i: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ColorNoteData {
    pub x: i32,
    pub y: i32,
    pub c: i32,
    pub d: i32,
    #[serde(default)]
    pub a: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct BombNoteData {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObstacleData {
    pub d: f64,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BasicEventData {
    /// Event type, i.e. the track.
    pub t: i32,
    /// Packed value.
    pub i: i32,
    /// Brightness.
    pub f: f64,
}

/// Collects unique data entries, handing out their indices.
struct Pool<K, T> {
    indices: HashMap<K, usize>,
    data: Vec<T>,
}

impl<K: Hash + Eq, T> Pool<K, T> {
    fn new() -> Self {
        Self {
            indices: HashMap::new(),
            data: Vec::new(),
        }
    }

    fn insert(&mut self, key: K, value: T) -> usize {
        let data = &mut self.data;
        *self.indices.entry(key).or_insert_with(|| {
            data.push(value);
            data.len() - 1
        })
    }
}

fn lookup<'a, T>(data: &'a [T], entity: &'static str, index: usize, i: usize) -> Result<&'a T> {
    data.get(i)
        .ok_or_else(|| FormatError::invalid(entity, index, "i", i))
}

pub fn parse(document: Value) -> Result<Entities> {
    let difficulty: Difficulty = serde_json::from_value(document)?;

    let mut notes = Vec::with_capacity(difficulty.color_notes.len() + difficulty.bomb_notes.len());
    for (index, object) in difficulty.color_notes.iter().enumerate() {
        let data = lookup(&difficulty.color_notes_data, "color note", index, object.i)?;
        notes.push(Note {
            angle_offset: data.a,
            ..Note::new(
                object.b,
                data.x,
                data.y,
                v3::color_note_kind(index, data.c)?,
                v3::cut_direction(index, data.d)?,
            )
        });
    }
    for (index, object) in difficulty.bomb_notes.iter().enumerate() {
        let data = lookup(&difficulty.bomb_notes_data, "bomb note", index, object.i)?;
        notes.push(v3::bomb(object.b, data.x, data.y));
    }

    let obstacles = difficulty
        .obstacles
        .iter()
        .enumerate()
        .map(|(index, object)| {
            let data = lookup(&difficulty.obstacles_data, "obstacle", index, object.i)?;
            Ok(crate::model::Obstacle {
                id: EntityId::new(),
                time: object.b,
                column: data.x,
                row: data.y,
                duration: data.d,
                width: data.w,
                height: data.h,
            })
        })
        .collect::<Result<_>>()?;

    let raw_events = difficulty
        .basic_events
        .iter()
        .enumerate()
        .map(|(index, object)| {
            let data = lookup(&difficulty.basic_events_data, "event", index, object.i)?;
            Ok(RawEvent {
                index,
                time: object.b,
                event_type: data.t,
                value: data.i,
                float_value: data.f,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let events = collect_events(raw_events)?;

    let mut entities = Entities {
        notes,
        obstacles,
        events,
    };
    entities.sort();
    Ok(entities)
}

pub fn write(entities: &Entities) -> Result<Value> {
    let mut color_notes = Vec::new();
    let mut color_pool = Pool::new();
    let mut bomb_notes = Vec::new();
    let mut bomb_pool = Pool::new();
    for note in &entities.notes {
        match note.kind.color_index() {
            Some(c) => {
                let data = ColorNoteData {
                    x: note.column,
                    y: note.row,
                    c,
                    d: note.direction.repr(),
                    a: note.angle_offset,
                };
                color_notes.push(Object {
                    b: note.time,
                    r: 0,
                    i: color_pool.insert(data.clone(), data),
                });
            }
            None => {
                let data = BombNoteData {
                    x: note.column,
                    y: note.row,
                };
                bomb_notes.push(Object {
                    b: note.time,
                    r: 0,
                    i: bomb_pool.insert(data.clone(), data),
                });
            }
        }
    }

    let mut obstacle_pool = Pool::new();
    let obstacles = entities
        .obstacles
        .iter()
        .map(|obstacle| {
            let key = (
                obstacle.duration.to_bits(),
                obstacle.column,
                obstacle.row,
                obstacle.width,
                obstacle.height,
            );
            let data = ObstacleData {
                d: obstacle.duration,
                x: obstacle.column,
                y: obstacle.row,
                w: obstacle.width,
                h: obstacle.height,
            };
            Object {
                b: obstacle.time,
                r: 0,
                i: obstacle_pool.insert(key, data),
            }
        })
        .collect();

    let mut event_pool = Pool::new();
    let basic_events = entities
        .events
        .iter()
        .enumerate()
        .map(|(index, event)| {
            let raw = RawEvent::from_event(index, event)?;
            let key = (raw.event_type, raw.value, raw.float_value.to_bits());
            let data = BasicEventData {
                t: raw.event_type,
                i: raw.value,
                f: raw.float_value,
            };
            Ok(EventObject {
                b: raw.time,
                i: event_pool.insert(key, data),
            })
        })
        .collect::<Result<_>>()?;

    let difficulty = Difficulty {
        version: FormatVersion::V4.marker().to_owned(),
        color_notes,
        color_notes_data: color_pool.data,
        bomb_notes,
        bomb_notes_data: bomb_pool.data,
        obstacles,
        obstacles_data: obstacle_pool.data,
        basic_events,
        basic_events_data: event_pool.data,
    };
    Ok(serde_json::to_value(difficulty)?)
}

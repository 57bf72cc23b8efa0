use super::*;

/// A wall the player has to dodge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Obstacle {
    pub id: EntityId,
    pub time: Beats,
    pub column: i32,
    pub row: i32,
    /// Length in beats.
    pub duration: Beats,
    pub width: i32,
    pub height: i32,
}

/// Height of a wall spanning the whole play area.
pub const FULL_WALL_HEIGHT: i32 = 5;
/// Row and height of a wall the player has to crouch under.
pub const CEILING_WALL_ROW: i32 = 2;
pub const CEILING_WALL_HEIGHT: i32 = 3;

impl Obstacle {
    /// A wall reaching from the floor to the ceiling.
    pub fn full(time: Beats, column: i32, duration: Beats, width: i32) -> Self {
        Self {
            id: EntityId::new(),
            time,
            column,
            row: 0,
            duration,
            width,
            height: FULL_WALL_HEIGHT,
        }
    }

    /// A wall hanging from the ceiling.
    pub fn ceiling(time: Beats, column: i32, duration: Beats, width: i32) -> Self {
        Self {
            row: CEILING_WALL_ROW,
            height: CEILING_WALL_HEIGHT,
            ..Self::full(time, column, duration, width)
        }
    }

    /// The beat on which the wall ends.
    pub fn end(&self) -> Beats {
        self.time + self.duration
    }

    pub fn is_ceiling(&self) -> bool {
        self.row >= CEILING_WALL_ROW
    }
}

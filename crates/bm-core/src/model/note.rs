use super::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Note {
    pub id: EntityId,
    /// The beat on which the note should be hit.
    pub time: Beats,
    /// Horizontal lane, `0..4` unless mapping extensions are enabled.
    pub column: i32,
    /// Vertical layer, `0..3` unless mapping extensions are enabled.
    pub row: i32,
    pub kind: NoteKind,
    pub direction: CutDirection,
    /// Counter-clockwise rotation in degrees on top of the cut direction.
    #[serde(default)]
    pub angle_offset: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NoteKind {
    /// Left saber.
    Red,
    /// Right saber.
    Blue,
    Bomb,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CutDirection {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
    Any,
    /// Mapping extensions precision direction, `1000..=1360`.
    Precise(i32),
}

impl Note {
    pub fn new(time: Beats, column: i32, row: i32, kind: NoteKind, direction: CutDirection) -> Self {
        Self {
            id: EntityId::new(),
            time,
            column,
            row,
            kind,
            direction,
            angle_offset: 0,
        }
    }
}

impl NoteKind {
    /// Saber color index used by v3+ documents, bombs have none.
    pub fn color_index(&self) -> Option<i32> {
        match self {
            NoteKind::Red => Some(0),
            NoteKind::Blue => Some(1),
            NoteKind::Bomb => None,
        }
    }
}

impl CutDirection {
    pub const PRECISE_RANGE: std::ops::RangeInclusive<i32> = 1000..=1360;

    pub fn from_repr(value: i32) -> Option<Self> {
        let direction = match value {
            0 => CutDirection::Up,
            1 => CutDirection::Down,
            2 => CutDirection::Left,
            3 => CutDirection::Right,
            4 => CutDirection::UpLeft,
            5 => CutDirection::UpRight,
            6 => CutDirection::DownLeft,
            7 => CutDirection::DownRight,
            8 => CutDirection::Any,
            value if Self::PRECISE_RANGE.contains(&value) => CutDirection::Precise(value),
            _ => return None,
        };
        Some(direction)
    }

    pub fn repr(&self) -> i32 {
        match *self {
            CutDirection::Up => 0,
            CutDirection::Down => 1,
            CutDirection::Left => 2,
            CutDirection::Right => 3,
            CutDirection::UpLeft => 4,
            CutDirection::UpRight => 5,
            CutDirection::DownLeft => 6,
            CutDirection::DownRight => 7,
            CutDirection::Any => 8,
            CutDirection::Precise(value) => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_case::test_case;

    #[test_case(0, Some(CutDirection::Up))]
    #[test_case(8, Some(CutDirection::Any))]
    #[test_case(1180, Some(CutDirection::Precise(1180)))]
    #[test_case(9, None)]
    #[test_case(-1, None)]
    #[test_case(1361, None)]
    fn cut_direction_repr(value: i32, expected: Option<CutDirection>) {
        let direction = CutDirection::from_repr(value);
        assert_eq!(direction, expected);
        if let Some(direction) = direction {
            assert_eq!(direction.repr(), value);
        }
    }
}

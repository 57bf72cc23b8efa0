use crate::prelude::*;

/// A position in beats since the song's beat-zero.
pub type Beats = f64;
/// Wall-clock time in milliseconds.
pub type Millis = f64;
/// Beats per minute.
pub type Bpm = f64;

/// Stable identity of an entity, only used for selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct EntityId(Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The on-disk schema revision of a beatmap document.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
    enum_iterator::Sequence,
)]
#[serde(rename_all = "lowercase")]
pub enum FormatVersion {
    V1,
    V2,
    V3,
    V4,
}

impl FormatVersion {
    pub fn major(&self) -> u32 {
        match self {
            FormatVersion::V1 => 1,
            FormatVersion::V2 => 2,
            FormatVersion::V3 => 3,
            FormatVersion::V4 => 4,
        }
    }

    pub fn from_major(major: u32) -> Option<Self> {
        match major {
            1 => Some(FormatVersion::V1),
            2 => Some(FormatVersion::V2),
            3 => Some(FormatVersion::V3),
            4 => Some(FormatVersion::V4),
            _ => None,
        }
    }

    /// The full version string written into documents.
    pub fn marker(&self) -> &'static str {
        match self {
            FormatVersion::V1 => "1.5.0",
            FormatVersion::V2 => "2.6.0",
            FormatVersion::V3 => "3.3.0",
            FormatVersion::V4 => "4.0.0",
        }
    }

    /// Whether the version uses underscore-prefixed flat fields.
    pub fn is_legacy(&self) -> bool {
        matches!(self, FormatVersion::V1 | FormatVersion::V2)
    }
}

impl Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.major())
    }
}

impl std::str::FromStr for FormatVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches(['v', 'V']);
        let major = digits.split('.').next().unwrap_or(digits);
        major
            .parse()
            .ok()
            .and_then(FormatVersion::from_major)
            .ok_or_else(|| format!("unknown format version {s:?}"))
    }
}

use super::*;

/// Song-wide metadata, shared by every difficulty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Song {
    pub name: String,
    pub sub_name: String,
    pub artist: String,
    pub mapper: String,
    pub bpm: Bpm,
    /// Audio-to-grid skew in milliseconds.
    pub offset_ms: Millis,
    /// Seconds into the song where the preview starts.
    pub preview_start: f64,
    /// Length of the preview in seconds.
    pub preview_duration: f64,
    pub song_filename: String,
    pub cover_filename: String,
    pub environment: String,
    pub difficulties: Vec<DifficultyInfo>,
    pub mod_settings: ModSettings,
    /// Custom data of other tools, written back untouched.
    #[serde(default)]
    pub custom_data: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DifficultyInfo {
    pub difficulty: Difficulty,
    /// Name of the beatmap file inside the map directory.
    pub filename: String,
    /// Name of the lightshow file, only used by v4 maps.
    pub lightshow_filename: Option<String>,
    pub note_jump_speed: f64,
    pub start_beat_offset: f64,
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
    enum_iterator::Sequence,
)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
    Expert,
    ExpertPlus,
}

/// Settings of the supported mods, in the shape the editor works with.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ModSettings {
    pub mapping_extensions: MappingExtensions,
    pub custom_colors: CustomColors,
}

/// Grid size customization provided by the Mapping Extensions mod.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MappingExtensions {
    pub is_enabled: bool,
    pub num_rows: i32,
    pub num_cols: i32,
    pub col_width: f64,
    pub row_height: f64,
}

/// Color overrides, colors are stored as `#rrggbb` strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomColors {
    pub is_enabled: bool,
    pub color_left: String,
    pub color_left_overdrive: f64,
    pub color_right: String,
    pub color_right_overdrive: f64,
    pub env_color_left: String,
    pub env_color_left_overdrive: f64,
    pub env_color_right: String,
    pub env_color_right_overdrive: f64,
    pub obstacle_color: String,
    pub obstacle_color_overdrive: f64,
}

impl Song {
    pub fn new(name: impl Into<String>, bpm: Bpm) -> Self {
        Self {
            name: name.into(),
            sub_name: String::new(),
            artist: String::new(),
            mapper: String::new(),
            bpm,
            offset_ms: 0.0,
            preview_start: 12.0,
            preview_duration: 10.0,
            song_filename: "song.ogg".into(),
            cover_filename: "cover.jpg".into(),
            environment: "DefaultEnvironment".into(),
            difficulties: Vec::new(),
            mod_settings: ModSettings::default(),
            custom_data: serde_json::Map::new(),
        }
    }

    pub fn timing(&self) -> SongTiming {
        SongTiming::new(self.bpm, self.offset_ms)
    }

    pub fn difficulty(&self, difficulty: Difficulty) -> Option<&DifficultyInfo> {
        self.difficulties
            .iter()
            .find(|info| info.difficulty == difficulty)
    }
}

impl DifficultyInfo {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            filename: format!("{difficulty}.dat"),
            lightshow_filename: None,
            note_jump_speed: difficulty.default_note_jump_speed(),
            start_beat_offset: 0.0,
        }
    }
}

impl Difficulty {
    /// Rank used by the info file, ordering difficulties.
    pub fn rank(&self) -> i32 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Normal => 3,
            Difficulty::Hard => 5,
            Difficulty::Expert => 7,
            Difficulty::ExpertPlus => 9,
        }
    }

    pub fn default_note_jump_speed(&self) -> f64 {
        match self {
            Difficulty::Easy | Difficulty::Normal => 10.0,
            Difficulty::Hard => 12.0,
            Difficulty::Expert => 16.0,
            Difficulty::ExpertPlus => 18.0,
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Normal => write!(f, "Normal"),
            Difficulty::Hard => write!(f, "Hard"),
            Difficulty::Expert => write!(f, "Expert"),
            Difficulty::ExpertPlus => write!(f, "ExpertPlus"),
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        enum_iterator::all::<Difficulty>()
            .find(|difficulty| difficulty.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown difficulty {s:?}"))
    }
}

impl Default for MappingExtensions {
    fn default() -> Self {
        Self {
            is_enabled: false,
            num_rows: 3,
            num_cols: 4,
            col_width: 1.0,
            row_height: 1.0,
        }
    }
}

impl Default for CustomColors {
    fn default() -> Self {
        Self {
            is_enabled: false,
            color_left: "#c03030".into(),
            color_left_overdrive: 0.0,
            color_right: "#2064a8".into(),
            color_right_overdrive: 0.0,
            env_color_left: "#c03030".into(),
            env_color_left_overdrive: 0.0,
            env_color_right: "#3098ff".into(),
            env_color_right_overdrive: 0.0,
            obstacle_color: "#ff3030".into(),
            obstacle_color_overdrive: 0.0,
        }
    }
}

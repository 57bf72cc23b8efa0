use super::*;

use serde_json::Map;

/// The only beatmap characteristic the editor works with.
pub const STANDARD_CHARACTERISTIC: &str = "Standard";

/// Name under which the Mapping Extensions mod is listed in requirements.
const MAPPING_EXTENSIONS_REQUIREMENT: &str = "Mapping Extensions";

/// Song info and the version its document was stored in.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSong {
    pub song: Song,
    pub version: FormatVersion,
}

/// `info.dat` as used by v1 to v3 maps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InfoV2 {
    #[serde(rename = "_version", default)]
    pub version: String,
    #[serde(rename = "_songName", default)]
    pub song_name: String,
    #[serde(rename = "_songSubName", default)]
    pub song_sub_name: String,
    #[serde(rename = "_songAuthorName", default)]
    pub song_author_name: String,
    #[serde(rename = "_levelAuthorName", default)]
    pub level_author_name: String,
    #[serde(rename = "_beatsPerMinute")]
    pub beats_per_minute: f64,
    #[serde(rename = "_songTimeOffset", default)]
    pub song_time_offset: f64,
    #[serde(rename = "_shuffle", default)]
    pub shuffle: f64,
    #[serde(rename = "_shufflePeriod", default)]
    pub shuffle_period: f64,
    #[serde(rename = "_previewStartTime", default)]
    pub preview_start_time: f64,
    #[serde(rename = "_previewDuration", default)]
    pub preview_duration: f64,
    #[serde(rename = "_songFilename", default)]
    pub song_filename: String,
    #[serde(rename = "_coverImageFilename", default)]
    pub cover_image_filename: String,
    #[serde(rename = "_environmentName", default)]
    pub environment_name: String,
    #[serde(rename = "_customData", default)]
    pub custom_data: InfoCustomDataV2,
    #[serde(rename = "_difficultyBeatmapSets", default)]
    pub difficulty_beatmap_sets: Vec<BeatmapSetV2>,
}

#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InfoCustomDataV2 {
    /// Offset in milliseconds.
    #[serde(rename = "_editorOffset", default)]
    pub editor_offset: f64,
    #[serde(rename = "_editorOldOffset", default)]
    pub editor_old_offset: f64,
    #[serde(rename = "_editorSettings", default, skip_serializing_if = "Option::is_none")]
    pub editor_settings: Option<EditorSettings>,
    /// Fields of other tools, kept as is.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditorSettings {
    #[serde(default)]
    pub mod_settings: Option<ModSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BeatmapSetV2 {
    #[serde(rename = "_beatmapCharacteristicName")]
    pub characteristic: String,
    #[serde(rename = "_difficultyBeatmaps", default)]
    pub difficulty_beatmaps: Vec<DifficultyBeatmapV2>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DifficultyBeatmapV2 {
    #[serde(rename = "_difficulty")]
    pub difficulty: String,
    #[serde(rename = "_difficultyRank", default)]
    pub difficulty_rank: i32,
    #[serde(rename = "_beatmapFilename")]
    pub beatmap_filename: String,
    #[serde(rename = "_noteJumpMovementSpeed", default)]
    pub note_jump_movement_speed: f64,
    #[serde(rename = "_noteJumpStartBeatOffset", default)]
    pub note_jump_start_beat_offset: f64,
    #[serde(rename = "_customData", default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<DifficultyCustomData>,
}

/// Per-difficulty custom data where mods used to keep their settings.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DifficultyCustomData {
    #[serde(rename = "_requirements")]
    pub requirements: Vec<String>,
    #[serde(rename = "_suggestions")]
    pub suggestions: Vec<String>,
    #[serde(rename = "_colorLeft", skip_serializing_if = "Option::is_none")]
    pub color_left: Option<ColorRgb>,
    #[serde(rename = "_colorRight", skip_serializing_if = "Option::is_none")]
    pub color_right: Option<ColorRgb>,
    #[serde(rename = "_envColorLeft", skip_serializing_if = "Option::is_none")]
    pub env_color_left: Option<ColorRgb>,
    #[serde(rename = "_envColorRight", skip_serializing_if = "Option::is_none")]
    pub env_color_right: Option<ColorRgb>,
    #[serde(rename = "_obstacleColor", skip_serializing_if = "Option::is_none")]
    pub obstacle_color: Option<ColorRgb>,
}

/// Color with channels in `0..=1`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ColorRgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// `Info.dat` of v4 maps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InfoV4 {
    #[serde(default)]
    pub version: String,
    pub song: SongV4,
    pub audio: AudioV4,
    #[serde(default)]
    pub song_preview_filename: String,
    #[serde(default)]
    pub cover_image_filename: String,
    #[serde(default)]
    pub environment_names: Vec<String>,
    #[serde(default)]
    pub difficulty_beatmaps: Vec<DifficultyBeatmapV4>,
    #[serde(default)]
    pub custom_data: InfoCustomDataV4,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SongV4 {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sub_title: String,
    #[serde(default)]
    pub author: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AudioV4 {
    #[serde(default)]
    pub song_filename: String,
    #[serde(default)]
    pub song_duration: f64,
    #[serde(default)]
    pub audio_data_filename: String,
    pub bpm: f64,
    #[serde(default)]
    pub lufs: f64,
    #[serde(default)]
    pub preview_start_time: f64,
    #[serde(default)]
    pub preview_duration: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyBeatmapV4 {
    pub characteristic: String,
    pub difficulty: String,
    #[serde(default)]
    pub beatmap_authors: BeatmapAuthors,
    #[serde(default)]
    pub environment_name_idx: usize,
    #[serde(default)]
    pub beatmap_color_scheme_idx: usize,
    #[serde(default)]
    pub note_jump_movement_speed: f64,
    #[serde(default)]
    pub note_jump_start_beat_offset: f64,
    #[serde(default)]
    pub lightshow_data_filename: Option<String>,
    pub beatmap_data_filename: String,
}

#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BeatmapAuthors {
    #[serde(default)]
    pub mappers: Vec<String>,
    #[serde(default)]
    pub lighters: Vec<String>,
}

#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InfoCustomDataV4 {
    /// Offset in milliseconds.
    #[serde(default)]
    pub editor_offset: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_settings: Option<EditorSettings>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl ColorRgb {
    /// Formats as `#rrggbb`.
    pub fn to_hex(&self) -> String {
        let channel = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}

fn parse_difficulty(index: usize, name: &str) -> Result<Difficulty> {
    name.parse()
        .map_err(|_| FormatError::invalid("difficulty", index, "difficulty", name))
}

/// Derives the unified mod settings from the custom data blocks of individual difficulties.
/// Colors are taken from the first difficulty that defines them.
pub fn migrate_mod_settings<'a>(
    blocks: impl IntoIterator<Item = &'a DifficultyCustomData>,
) -> ModSettings {
    let mut settings = ModSettings::default();
    let mut colors_found = false;
    for block in blocks {
        if block
            .requirements
            .iter()
            .chain(&block.suggestions)
            .any(|name| name == MAPPING_EXTENSIONS_REQUIREMENT)
        {
            settings.mapping_extensions.is_enabled = true;
        }

        if colors_found {
            continue;
        }
        let colors = &mut settings.custom_colors;
        let targets = [
            (block.color_left, &mut colors.color_left),
            (block.color_right, &mut colors.color_right),
            (block.env_color_left, &mut colors.env_color_left),
            (block.env_color_right, &mut colors.env_color_right),
            (block.obstacle_color, &mut colors.obstacle_color),
        ];
        for (color, target) in targets {
            if let Some(color) = color {
                *target = color.to_hex();
                colors_found = true;
            }
        }
        if colors_found {
            settings.custom_colors.is_enabled = true;
        }
    }
    settings
}

fn song_from_v2(info: InfoV2) -> Result<Song> {
    let mut difficulties = Vec::new();
    let mut legacy_blocks = Vec::new();
    let standard = info
        .difficulty_beatmap_sets
        .iter()
        .filter(|set| set.characteristic == STANDARD_CHARACTERISTIC);
    for set in standard {
        for (index, beatmap) in set.difficulty_beatmaps.iter().enumerate() {
            difficulties.push(DifficultyInfo {
                difficulty: parse_difficulty(index, &beatmap.difficulty)?,
                filename: beatmap.beatmap_filename.clone(),
                lightshow_filename: None,
                note_jump_speed: beatmap.note_jump_movement_speed,
                start_beat_offset: beatmap.note_jump_start_beat_offset,
            });
            legacy_blocks.extend(beatmap.custom_data.as_ref());
        }
    }

    let mod_settings = match info
        .custom_data
        .editor_settings
        .and_then(|settings| settings.mod_settings)
    {
        Some(settings) => settings,
        None => migrate_mod_settings(legacy_blocks),
    };

    Ok(Song {
        name: info.song_name,
        sub_name: info.song_sub_name,
        artist: info.song_author_name,
        mapper: info.level_author_name,
        bpm: info.beats_per_minute,
        offset_ms: info.custom_data.editor_offset,
        preview_start: info.preview_start_time,
        preview_duration: info.preview_duration,
        song_filename: info.song_filename,
        cover_filename: info.cover_image_filename,
        environment: info.environment_name,
        difficulties,
        mod_settings,
        custom_data: info.custom_data.other,
    })
}

fn song_to_v2(song: &Song, version: FormatVersion) -> InfoV2 {
    let mut difficulties: Vec<&DifficultyInfo> = song.difficulties.iter().collect();
    difficulties.sort_by_key(|info| info.difficulty);
    InfoV2 {
        // v3 maps still use the v2 info layout
        version: match version {
            FormatVersion::V1 => FormatVersion::V1.marker().to_owned(),
            _ => FormatVersion::V2.marker().to_owned(),
        },
        song_name: song.name.clone(),
        song_sub_name: song.sub_name.clone(),
        song_author_name: song.artist.clone(),
        level_author_name: song.mapper.clone(),
        beats_per_minute: song.bpm,
        song_time_offset: 0.0,
        shuffle: 0.0,
        shuffle_period: 0.5,
        preview_start_time: song.preview_start,
        preview_duration: song.preview_duration,
        song_filename: song.song_filename.clone(),
        cover_image_filename: song.cover_filename.clone(),
        environment_name: song.environment.clone(),
        custom_data: InfoCustomDataV2 {
            editor_offset: song.offset_ms,
            editor_old_offset: song.offset_ms,
            editor_settings: Some(EditorSettings {
                mod_settings: Some(song.mod_settings.clone()),
            }),
            other: song.custom_data.clone(),
        },
        difficulty_beatmap_sets: vec![BeatmapSetV2 {
            characteristic: STANDARD_CHARACTERISTIC.to_owned(),
            difficulty_beatmaps: difficulties
                .into_iter()
                .map(|info| DifficultyBeatmapV2 {
                    difficulty: info.difficulty.to_string(),
                    difficulty_rank: info.difficulty.rank(),
                    beatmap_filename: info.filename.clone(),
                    note_jump_movement_speed: info.note_jump_speed,
                    note_jump_start_beat_offset: info.start_beat_offset,
                    custom_data: None,
                })
                .collect(),
        }],
    }
}

fn song_from_v4(info: InfoV4) -> Result<Song> {
    let difficulties = info
        .difficulty_beatmaps
        .iter()
        .enumerate()
        .filter(|(_, beatmap)| beatmap.characteristic == STANDARD_CHARACTERISTIC)
        .map(|(index, beatmap)| {
            Ok(DifficultyInfo {
                difficulty: parse_difficulty(index, &beatmap.difficulty)?,
                filename: beatmap.beatmap_data_filename.clone(),
                lightshow_filename: beatmap.lightshow_data_filename.clone(),
                note_jump_speed: beatmap.note_jump_movement_speed,
                start_beat_offset: beatmap.note_jump_start_beat_offset,
            })
        })
        .collect::<Result<_>>()?;

    let mapper = info
        .difficulty_beatmaps
        .iter()
        .flat_map(|beatmap| beatmap.beatmap_authors.mappers.first())
        .next()
        .cloned()
        .unwrap_or_default();

    Ok(Song {
        name: info.song.title,
        sub_name: info.song.sub_title,
        artist: info.song.author,
        mapper,
        bpm: info.audio.bpm,
        offset_ms: info.custom_data.editor_offset,
        preview_start: info.audio.preview_start_time,
        preview_duration: info.audio.preview_duration,
        song_filename: info.audio.song_filename,
        cover_filename: info.cover_image_filename,
        environment: info.environment_names.into_iter().next().unwrap_or_default(),
        difficulties,
        mod_settings: info
            .custom_data
            .editor_settings
            .and_then(|settings| settings.mod_settings)
            .unwrap_or_default(),
        custom_data: info.custom_data.other,
    })
}

fn song_to_v4(song: &Song) -> InfoV4 {
    let mut difficulties: Vec<&DifficultyInfo> = song.difficulties.iter().collect();
    difficulties.sort_by_key(|info| info.difficulty);
    InfoV4 {
        version: FormatVersion::V4.marker().to_owned(),
        song: SongV4 {
            title: song.name.clone(),
            sub_title: song.sub_name.clone(),
            author: song.artist.clone(),
        },
        audio: AudioV4 {
            song_filename: song.song_filename.clone(),
            song_duration: 0.0,
            audio_data_filename: "BPMInfo.dat".to_owned(),
            bpm: song.bpm,
            lufs: 0.0,
            preview_start_time: song.preview_start,
            preview_duration: song.preview_duration,
        },
        song_preview_filename: song.song_filename.clone(),
        cover_image_filename: song.cover_filename.clone(),
        environment_names: vec![song.environment.clone()],
        difficulty_beatmaps: difficulties
            .into_iter()
            .map(|info| DifficultyBeatmapV4 {
                characteristic: STANDARD_CHARACTERISTIC.to_owned(),
                difficulty: info.difficulty.to_string(),
                beatmap_authors: BeatmapAuthors {
                    mappers: vec![song.mapper.clone()],
                    lighters: vec![song.mapper.clone()],
                },
                environment_name_idx: 0,
                beatmap_color_scheme_idx: 0,
                note_jump_movement_speed: info.note_jump_speed,
                note_jump_start_beat_offset: info.start_beat_offset,
                lightshow_data_filename: info.lightshow_filename.clone(),
                beatmap_data_filename: info.filename.clone(),
            })
            .collect(),
        custom_data: InfoCustomDataV4 {
            editor_offset: song.offset_ms,
            editor_settings: Some(EditorSettings {
                mod_settings: Some(song.mod_settings.clone()),
            }),
            other: song.custom_data.clone(),
        },
    }
}

/// Parses a song info document. Mod settings found in legacy per-difficulty blocks
/// are migrated into [`ModSettings`].
pub fn deserialize_info(document: &str, fallback: FormatVersion) -> Result<LoadedSong> {
    let document: Value = serde_json::from_str(document)?;
    let version = detect_version(&document).unwrap_or(fallback);
    let song = match version {
        FormatVersion::V4 => song_from_v4(serde_json::from_value(document)?)?,
        _ => song_from_v2(serde_json::from_value(document)?)?,
    };
    Ok(LoadedSong { song, version })
}

/// Writes a song info document for maps of the given version.
/// Mod settings are only ever written in their unified form.
pub fn serialize_info(song: &Song, version: FormatVersion) -> Result<Value> {
    let value = match version {
        FormatVersion::V4 => serde_json::to_value(song_to_v4(song))?,
        _ => serde_json::to_value(song_to_v2(song, version))?,
    };
    Ok(value)
}

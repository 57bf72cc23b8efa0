use super::*;

use crate::fs::{FileStore, SavedFile};

use bm_core::format::{LoadedBeatmap, LoadedSong};
use serde_json::Value;

/// Names the info file may have, checked in order.
const INFO_FILENAMES: [&str; 2] = ["Info.dat", "info.dat"];

/// A map loaded from a store, with every difficulty parsed.
#[derive(Debug, Clone)]
pub struct LocalMap {
    /// Directory of the map inside the store.
    pub path: PathBuf,
    pub song: Song,
    /// Version of the difficulty documents. v1 to v3 share the info file layout,
    /// so the info file alone only tells v4 apart.
    pub version: FormatVersion,
    pub beatmaps: BTreeMap<Difficulty, Beatmap>,
}

/// Glue between map files in a [`FileStore`] and the serializers.
pub struct MapController<S> {
    store: S,
    /// Used for documents without a recognizable version marker.
    pub fallback_version: FormatVersion,
}

pub fn info_filename(version: FormatVersion) -> &'static str {
    match version {
        FormatVersion::V4 => "Info.dat",
        _ => "info.dat",
    }
}

impl<S: FileStore> MapController<S> {
    pub fn new(store: S, fallback_version: FormatVersion) -> Self {
        Self {
            store,
            fallback_version,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn load_info_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        let mut last_error = None;
        for name in INFO_FILENAMES {
            match self.store.load(&path.join(name)).await {
                Ok(bytes) => return Ok(bytes),
                Err(err) => last_error = Some(err),
            }
        }
        Err(last_error.unwrap_or_else(|| anyhow!("no info file in {path:?}")))
    }

    /// Loads the song info and every difficulty of the map in `path`.
    /// Entity times come out relative to the beat grid.
    pub async fn load_map(&self, path: impl AsRef<Path>) -> Result<LocalMap> {
        let path = path.as_ref();
        log::debug!("Loading map {path:?}");

        let bytes = self.load_info_bytes(path).await?;
        let text = std::str::from_utf8(&bytes).context("info file is not valid utf-8")?;
        let LoadedSong {
            song,
            version: info_version,
        } = format::deserialize_info(text, self.fallback_version)
            .with_context(|| format!("when parsing info of {path:?}"))?;

        let mut version = None;
        let mut beatmaps = BTreeMap::new();
        for info in &song.difficulties {
            let loaded = self
                .load_difficulty(path, &song, info_version, info)
                .await
                .with_context(|| format!("when loading {}", info.filename))?;
            match version {
                None => version = Some(loaded.version),
                Some(version) if version != loaded.version => log::warn!(
                    "{} is stored as {} while other difficulties are {version}",
                    info.filename,
                    loaded.version
                ),
                Some(_) => {}
            }
            beatmaps.insert(info.difficulty, loaded.beatmap);
        }
        let version = version.unwrap_or(info_version);

        log::debug!(
            "Loaded map {path:?} ({version}) with {} difficulties",
            beatmaps.len()
        );
        Ok(LocalMap {
            path: path.to_path_buf(),
            song,
            version,
            beatmaps,
        })
    }

    /// Difficulties without a version marker are read as `fallback`.
    async fn load_difficulty(
        &self,
        path: &Path,
        song: &Song,
        fallback: FormatVersion,
        info: &DifficultyInfo,
    ) -> Result<LoadedBeatmap> {
        let bytes = self.store.load(&path.join(&info.filename)).await?;
        let mut document: Value = serde_json::from_slice(&bytes)?;
        if let Some(lightshow) = &info.lightshow_filename {
            let bytes = self.store.load(&path.join(lightshow)).await?;
            format::merge_lightshow(&mut document, serde_json::from_slice(&bytes)?);
        }

        let loaded = format::deserialize_beatmap_value(document, song.timing(), fallback)?;
        // the info file only tells v4 apart from older layouts
        if (loaded.version == FormatVersion::V4) != (fallback == FormatVersion::V4) {
            log::warn!(
                "{} is stored as {} next to a {fallback} info file",
                info.filename,
                loaded.version
            );
        }
        Ok(loaded)
    }

    async fn save_json(&self, path: &Path, value: &Value) -> Result<SavedFile> {
        let bytes = serde_json::to_vec(value)?;
        self.store.save(path, bytes).await
    }

    /// Writes a single difficulty, embedding the song offset into entity times.
    /// v4 difficulties with a lightshow file get their events written there.
    pub async fn save_difficulty(
        &self,
        path: impl AsRef<Path>,
        song: &Song,
        version: FormatVersion,
        difficulty: Difficulty,
        beatmap: &Beatmap,
    ) -> Result<Vec<SavedFile>> {
        let path = path.as_ref();
        log::debug!("Saving {difficulty} of {path:?} as {version}");
        let info = song
            .difficulty(difficulty)
            .ok_or_else(|| anyhow!("song has no {difficulty} difficulty"))?;

        let mut document =
            format::serialize_difficulty(beatmap, song.timing(), version, info.note_jump_speed)?;
        let mut saved = Vec::new();
        if version == FormatVersion::V4 {
            if let Some(lightshow_filename) = &info.lightshow_filename {
                let lightshow = format::split_lightshow(&mut document);
                saved.push(
                    self.save_json(&path.join(lightshow_filename), &lightshow)
                        .await?,
                );
            }
        }
        saved.push(self.save_json(&path.join(&info.filename), &document).await?);
        Ok(saved)
    }

    pub async fn save_info(
        &self,
        path: impl AsRef<Path>,
        song: &Song,
        version: FormatVersion,
    ) -> Result<SavedFile> {
        let path = path.as_ref();
        let document = format::serialize_info(song, version)?;
        self.save_json(&path.join(info_filename(version)), &document)
            .await
    }

    /// Writes the info file and every difficulty of the map.
    pub async fn save_map(&self, map: &LocalMap, version: FormatVersion) -> Result<Vec<SavedFile>> {
        let mut saved = vec![self.save_info(&map.path, &map.song, version).await?];
        for (&difficulty, beatmap) in &map.beatmaps {
            saved.extend(
                self.save_difficulty(&map.path, &map.song, version, difficulty, beatmap)
                    .await?,
            );
        }
        log::debug!("Saved map {:?} ({} files)", map.path, saved.len());
        Ok(saved)
    }
}

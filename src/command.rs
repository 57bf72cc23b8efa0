use crate::{config::AppConfig, prelude::*};

use bm_core::format;
use bm_local::{
    fs::{FileStore, NativeStore},
    MapController,
};

#[derive(clap::Subcommand)]
pub enum Command {
    /// Print the song info and a summary of every difficulty of a map.
    Info {
        /// Map directory, or a map name inside the maps directory.
        map: PathBuf,
    },
    /// Convert a difficulty file to another format version.
    Convert {
        path: PathBuf,
        #[clap(long)]
        to: FormatVersion,
        #[clap(long, default_value_t = 120.0)]
        bpm: f64,
        /// Song offset in milliseconds.
        #[clap(long, default_value_t = 0.0)]
        offset: f64,
        /// Where to write the result, prints to stdout if omitted.
        #[clap(long)]
        output: Option<PathBuf>,
    },
    /// Print the lit intervals of a light track.
    Lights {
        map: PathBuf,
        difficulty: Difficulty,
        #[clap(long)]
        track: TrackId,
        #[clap(long, default_value_t = 0.0)]
        start: f64,
        #[clap(long, default_value_t = 16.0)]
        beats: f64,
    },
    /// Convert a song position to beats.
    Beat {
        ms: f64,
        #[clap(long)]
        bpm: f64,
        #[clap(long, default_value_t = 0.0)]
        offset: f64,
        /// Snap the beat to this many subdivisions per beat.
        #[clap(long)]
        snap: Option<u32>,
    },
}

impl Command {
    pub async fn execute(self, config: &AppConfig) -> Result<()> {
        let open_map = |map: &Path| {
            let path = config.map_path(map);
            info!("Opening map {path:?}");
            MapController::new(NativeStore::new(path), config.fallback_version)
        };

        match self {
            Command::Info { map } => {
                let controller = open_map(&map);
                let map = controller.load_map("").await?;
                let song = &map.song;
                println!("{} - {} ({})", song.artist, song.name, map.version);
                if !song.sub_name.is_empty() {
                    println!("  {}", song.sub_name);
                }
                println!("Mapped by {}", song.mapper);
                println!("BPM: {}, offset: {}ms", song.bpm, song.offset_ms);
                if song.mod_settings.mapping_extensions.is_enabled {
                    println!("Requires Mapping Extensions");
                }
                for (difficulty, beatmap) in &map.beatmaps {
                    let entities = &beatmap.entities;
                    println!(
                        "{difficulty}: {} notes, {} obstacles, {} events, last beat {}",
                        entities.notes.len(),
                        entities.obstacles.len(),
                        entities.events.len(),
                        beatmap.last_beat()
                    );
                }
            }
            Command::Convert {
                path,
                to,
                bpm,
                offset,
                output,
            } => {
                let timing = SongTiming::new(bpm, offset);
                let store = NativeStore::new("");
                let bytes = store.load(&path).await?;
                let text = std::str::from_utf8(&bytes).context("file is not valid utf-8")?;
                let loaded = format::deserialize_beatmap(text, timing, config.fallback_version)
                    .with_context(|| format!("when parsing {path:?}"))?;
                info!("Converting {path:?} from {} to {to}", loaded.version);

                let document = format::serialize_beatmap(&loaded.beatmap, timing, to)?;
                let text = serde_json::to_string_pretty(&document)?;
                match output {
                    Some(output) => {
                        store.save(&output, text.into_bytes()).await?;
                        info!("Saved to {output:?}");
                    }
                    None => println!("{text}"),
                }
            }
            Command::Lights {
                map,
                difficulty,
                track,
                start,
                beats,
            } => {
                if !track.is_light() {
                    anyhow::bail!("Track {track} is not a light track");
                }
                let controller = open_map(&map);
                let map = controller.load_map("").await?;
                let beatmap = map
                    .beatmaps
                    .get(&difficulty)
                    .ok_or_else(|| anyhow!("Map has no {difficulty} difficulty"))?;

                let window = BeatWindow::new(start, beats);
                let boxes = visible_background_boxes(beatmap, track, window);
                if boxes.is_empty() {
                    println!("{track} is dark from {start} to {}", window.end_beat());
                }
                for light in boxes {
                    println!(
                        "{:>8.3} .. {:<8.3} {:?} at {}",
                        light.time,
                        light.end(),
                        light.start_color,
                        light.start_brightness
                    );
                }
            }
            Command::Beat {
                ms,
                bpm,
                offset,
                snap,
            } => {
                let timing = SongTiming::new(bpm, offset);
                let beat = timing.position_to_beats(ms);
                println!("Beat: {beat}");
                if let Some(snap) = snap {
                    let snap = BeatSnap::per_beat(snap)
                        .ok_or_else(|| anyhow!("Snap must be at least one per beat"))?;
                    let snapped = snap_beats(beat, snap);
                    println!(
                        "Snapped to {snap}: {snapped} ({}ms)",
                        timing.beats_to_position(snapped)
                    );
                }
                println!(
                    "Nearest whole beat at {}ms",
                    timing.snap_to_nearest_beat(ms)
                );
            }
        }

        Ok(())
    }
}

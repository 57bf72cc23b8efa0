use crate::prelude::*;

const DEFAULT_CONFIG: &str = "beatmapper.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Directory that map names are looked up in.
    pub maps_path: PathBuf,
    /// Version assumed for documents without a version marker.
    pub fallback_version: FormatVersion,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            maps_path: bm_local::fs::all_maps_path(),
            fallback_version: FormatVersion::V2,
        }
    }
}

impl AppConfig {
    /// Reads the config file named by `BEATMAPPER_CONFIG`,
    /// with `BEATMAPPER_MAPS_PATH` taking precedence over the file.
    pub fn load() -> Result<Self> {
        let path: PathBuf = dotenv::var("BEATMAPPER_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG.to_owned())
            .into();
        let mut config = Self::load_from(&path)?;
        if let Ok(maps_path) = dotenv::var("BEATMAPPER_MAPS_PATH") {
            config.maps_path = maps_path.into();
        }
        debug!("Maps: {:?}", config.maps_path);
        debug!("Fallback version: {}", config.fallback_version);
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("Config {path:?} not found, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).with_context(|| format!("when reading {path:?}"))?;
        Self::parse(&text).with_context(|| format!("when parsing {path:?}"))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Resolves a map argument: an existing directory as is, otherwise a name inside `maps_path`.
    pub fn map_path(&self, map: &Path) -> PathBuf {
        if map.is_dir() {
            map.to_path_buf()
        } else {
            self.maps_path.join(map)
        }
    }
}

mod memory;
mod native;

pub use self::{memory::*, native::*};

use super::*;

/// A file that has been written by a [`FileStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub filename: PathBuf,
}

/// Storage of map files, addressed by paths relative to the store root.
#[allow(async_fn_in_trait)]
pub trait FileStore {
    async fn load(&self, path: &Path) -> Result<Vec<u8>>;
    async fn save(&self, path: &Path, bytes: Vec<u8>) -> Result<SavedFile>;
}

const APP_NAME: &str = "beatmapper";

/// Path to the directory that holds locally saved maps.
pub fn base_path() -> PathBuf {
    if let Some(dirs) = directories::ProjectDirs::from("", "", APP_NAME) {
        return dirs.data_dir().to_path_buf();
    }
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        return dir;
    }
    PathBuf::from(".")
}

pub fn all_maps_path() -> PathBuf {
    base_path().join("maps")
}

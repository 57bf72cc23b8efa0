use super::*;

/// Stores files in a directory of the local filesystem.
#[derive(Debug, Clone)]
pub struct NativeStore {
    root: PathBuf,
}

impl NativeStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store rooted at [`all_maps_path`].
    pub async fn open_default() -> Result<Self> {
        let root = all_maps_path();
        tokio::fs::create_dir_all(&root)
            .await
            .with_context(|| format!("when creating {root:?}"))?;
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileStore for NativeStore {
    async fn load(&self, path: &Path) -> Result<Vec<u8>> {
        let full_path = self.root.join(path);
        log::debug!("Reading {full_path:?}");
        tokio::fs::read(&full_path)
            .await
            .with_context(|| format!("when reading {full_path:?}"))
    }

    async fn save(&self, path: &Path, bytes: Vec<u8>) -> Result<SavedFile> {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full_path, bytes)
            .await
            .with_context(|| format!("when writing {full_path:?}"))?;
        log::debug!("Saved {full_path:?}");
        Ok(SavedFile {
            filename: path.to_path_buf(),
        })
    }
}

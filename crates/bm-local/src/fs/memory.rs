use super::*;

/// Keeps files in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RefCell<HashMap<PathBuf, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) {
        self.files.borrow_mut().insert(path.into(), bytes.into());
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.files.borrow().get(path.as_ref()).cloned()
    }

    pub fn len(&self) -> usize {
        self.files.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.borrow().is_empty()
    }
}

impl FileStore for MemoryStore {
    async fn load(&self, path: &Path) -> Result<Vec<u8>> {
        self.get(path)
            .ok_or_else(|| anyhow!("file {path:?} does not exist"))
    }

    async fn save(&self, path: &Path, bytes: Vec<u8>) -> Result<SavedFile> {
        self.insert(path, bytes);
        Ok(SavedFile {
            filename: path.to_path_buf(),
        })
    }
}

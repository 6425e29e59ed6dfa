use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("{path} is not valid UTF-8")]
    InvalidUtf8 { path: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type FsResult<T> = std::result::Result<T, FsError>;

/// Reads shader sources by path. Paths are taken verbatim, never normalised.
pub trait SourceLoader: Send + Sync {
    fn load(&self, path: &str) -> FsResult<String>;

    fn exists(&self, path: &str) -> bool {
        self.load(path).is_ok()
    }
}

impl<T: SourceLoader + ?Sized> SourceLoader for Arc<T> {
    fn load(&self, path: &str) -> FsResult<String> {
        (**self).load(path)
    }

    fn exists(&self, path: &str) -> bool {
        (**self).exists(path)
    }
}

// -----------------------------------------------------------------------------
// In-memory filesystem
// -----------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct InMemoryFileSystem {
    files: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<String>, contents: impl Into<String>) {
        let mut guard = match self.files.lock() {
            Ok(g) => g,
            Err(poison) => poison.into_inner(),
        };
        guard.insert(path.into(), contents.into());
    }

    pub fn remove(&self, path: &str) -> FsResult<()> {
        let mut guard = match self.files.lock() {
            Ok(g) => g,
            Err(poison) => poison.into_inner(),
        };
        guard
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| FsError::NotFound(path.to_string()))
    }
}

impl SourceLoader for InMemoryFileSystem {
    fn load(&self, path: &str) -> FsResult<String> {
        let guard = match self.files.lock() {
            Ok(g) => g,
            Err(poison) => poison.into_inner(),
        };
        guard
            .get(path)
            .cloned()
            .ok_or_else(|| FsError::NotFound(path.to_string()))
    }

    fn exists(&self, path: &str) -> bool {
        let guard = match self.files.lock() {
            Ok(g) => g,
            Err(poison) => poison.into_inner(),
        };
        guard.contains_key(path)
    }
}

// -----------------------------------------------------------------------------
// Native filesystem
// -----------------------------------------------------------------------------

/// Loads from the host filesystem. Relative paths resolve against `root` when
/// one is set, otherwise against the process working directory.
#[derive(Clone, Debug, Default)]
pub struct NativeFileSystem {
    root: Option<PathBuf>,
}

impl NativeFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn to_native_path(&self, path: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(path),
            None => PathBuf::from(path),
        }
    }
}

impl SourceLoader for NativeFileSystem {
    fn load(&self, path: &str) -> FsResult<String> {
        let native = self.to_native_path(path);
        let bytes = std::fs::read(&native).map_err(|e| match e.kind() {
            ErrorKind::NotFound => FsError::NotFound(path.to_string()),
            _ => FsError::Io(e),
        })?;
        String::from_utf8(bytes).map_err(|_| FsError::InvalidUtf8 {
            path: path.to_string(),
        })
    }

    fn exists(&self, path: &str) -> bool {
        self.to_native_path(path).is_file()
    }
}

mod document;

pub use document::{Document, HouseholdRecord};

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::StoreError;

/// Returns `~/.config/streakhold[-dev]/` based on STREAKHOLD_ENV.
///
/// Set STREAKHOLD_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("STREAKHOLD_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("streakhold-dev")
    } else {
        base_dir.join("streakhold")
    };

    std::fs::create_dir_all(&dir).map_err(|e| StoreError::DataDir(e.to_string()))?;
    Ok(dir)
}

/// File-backed store for the whole application [`Document`].
///
/// Every operation is a full read or a full overwrite; there is no
/// locking, so concurrent writers race with last-writer-wins semantics.
#[derive(Debug, Clone)]
pub struct DataStore {
    path: PathBuf,
}

impl DataStore {
    /// Store at the default location, `<data_dir>/data.json`.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn open() -> Result<Self, StoreError> {
        Ok(Self {
            path: data_dir()?.join("data.json"),
        })
    }

    /// Store at an explicit path. This is the injection point for tests
    /// and embedding callers.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document, falling back to the empty skeleton when the
    /// file is absent, empty, or unparseable. Never fails.
    pub fn load(&self) -> Document {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return Document::default(),
        };
        if content.trim().is_empty() {
            return Document::default();
        }
        match serde_json::from_str(&content) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable data file, starting from empty skeleton");
                Document::default()
            }
        }
    }

    /// Overwrite the file with the whole document, pretty-printed.
    ///
    /// # Errors
    /// Serialization and write failures propagate; there is no retry.
    pub fn save(&self, doc: &Document) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(doc)?;
        std::fs::write(&self.path, content).map_err(|source| StoreError::WriteFailed {
            path: self.path.clone(),
            source,
        })
    }
}

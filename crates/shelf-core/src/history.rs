//! Recent-search history
//!
//! A short ordered list of distinct query strings, most recent first,
//! kept in a client-local [`HistoryStore`]. Writes are plain
//! read-modify-write (last writer wins).

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::error::{Error, Result};

/// Maximum number of queries kept
pub const MAX_RECENT_SEARCHES: usize = 10;

/// Persisted ordered list of strings scoped to the current client
///
/// An unreadable store must behave as empty rather than fail.
pub trait HistoryStore: Send + Sync {
    fn get(&self) -> Vec<String>;
    fn set(&self, entries: &[String]) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Put `query` at the front, dropping its earlier occurrence, capped at the maximum
pub fn push_recent(entries: Vec<String>, query: &str) -> Vec<String> {
    std::iter::once(query.to_string())
        .chain(entries.into_iter().filter(|q| q != query))
        .take(MAX_RECENT_SEARCHES)
        .collect()
}

/// Record a query in a store. Blank queries are ignored.
pub fn record_search(store: &dyn HistoryStore, query: &str) -> Result<()> {
    if query.trim().is_empty() {
        return Ok(());
    }
    let updated = push_recent(store.get(), query);
    store.set(&updated)
}

/// JSON file in the data directory
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.local/share/shelf/recent_searches.json` (platform equivalent)
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|d| d.join("shelf").join("recent_searches.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for FileHistoryStore {
    fn get(&self) -> Vec<String> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    debug!(path = %self.path.display(), error = %e, "History unreadable, using empty");
                }
                return vec![];
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            debug!(path = %self.path.display(), error = %e, "History corrupt, using empty");
            vec![]
        })
    }

    fn set(&self, entries: &[String]) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&dir)?;

        // Write to a temp file in the same directory, then rename into place
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(serde_json::to_string(entries)?.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local store (tests, server sessions without a history file)
#[derive(Default)]
pub struct MemoryHistoryStore {
    entries: Mutex<Vec<String>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn get(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    fn set(&self, entries: &[String]) -> Result<()> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| Error::InvalidData("history lock poisoned".to_string()))?;
        *guard = entries.to_vec();
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.set(&[])
    }
}

/// Store for environments without client-local storage: always empty
#[derive(Default)]
pub struct NoHistory;

impl HistoryStore for NoHistory {
    fn get(&self) -> Vec<String> {
        vec![]
    }

    fn set(&self, _entries: &[String]) -> Result<()> {
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        Ok(())
    }
}

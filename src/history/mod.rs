//! Issue history storage.
//!
//! The recurrence counter is a flat signature → count mapping persisted as
//! one JSON object. Backends sit behind [`HistoryStore`] so the handler can
//! run against an in-memory map in tests and the real file in production.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Mapping from issue signature to occurrence count.
///
/// Counts are monotonically non-decreasing across sequential invocations;
/// concurrent invocations can lose an update (see [`FilesystemHistoryStore`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueHistory {
    counts: HashMap<String, u64>,
}

impl IssueHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one occurrence of a signature and returns the new count.
    ///
    /// Absent signatures start at zero, so the first occurrence returns 1.
    pub fn record(&mut self, signature: &str) -> u64 {
        let count = self.counts.entry(signature.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    /// Returns the current count for a signature (0 if never seen).
    #[must_use]
    pub fn count_for(&self, signature: &str) -> u64 {
        self.counts.get(signature).copied().unwrap_or(0)
    }

    /// Returns the number of distinct signatures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if no signature has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Returns signatures with their counts, highest count first.
    #[must_use]
    pub fn ranked(&self) -> Vec<(String, u64)> {
        let mut entries: Vec<(String, u64)> = self
            .counts
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }
}

impl From<HashMap<String, u64>> for IssueHistory {
    fn from(counts: HashMap<String, u64>) -> Self {
        Self { counts }
    }
}

/// Trait for issue history backends.
///
/// `load` is strict and used by tests and the `status` command; the hook
/// path uses `load_or_default`, which maps every failure to an empty
/// history so persisted-state problems can never fail a prompt submission.
pub trait HistoryStore: Send + Sync {
    /// Loads the history.
    ///
    /// A backend with no stored history yet returns an empty mapping, not
    /// an error.
    fn load(&self) -> Result<IssueHistory>;

    /// Saves the full history, overwriting prior contents.
    fn save(&self, history: &IssueHistory) -> Result<()>;

    /// Loads the history, degrading to empty on any failure.
    fn load_or_default(&self) -> IssueHistory {
        self.load().unwrap_or_else(|e| {
            warn!(error = %e, "failed to load issue history, starting empty");
            IssueHistory::new()
        })
    }
}

/// Filesystem-backed history store.
///
/// Stores the mapping as one JSON object at a fixed path. The whole file is
/// rewritten on save. No locking is taken across the load-record-save
/// sequence: near-simultaneous hook invocations can race and one increment
/// may be lost. That is an accepted gap for a best-effort heuristic counter.
#[derive(Debug, Clone)]
pub struct FilesystemHistoryStore {
    path: PathBuf,
}

impl FilesystemHistoryStore {
    /// Creates a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for FilesystemHistoryStore {
    fn load(&self) -> Result<IssueHistory> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no issue history file yet");
            return Ok(IssueHistory::new());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| Error::OperationFailed {
            operation: "read_issue_history".to_string(),
            cause: format!("{}: {}", self.path.display(), e),
        })?;

        serde_json::from_str(&contents).map_err(|e| Error::OperationFailed {
            operation: "parse_issue_history".to_string(),
            cause: format!("{}: {}", self.path.display(), e),
        })
    }

    fn save(&self, history: &IssueHistory) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::OperationFailed {
                operation: "create_state_dir".to_string(),
                cause: e.to_string(),
            })?;
        }

        let contents = serde_json::to_string(history).map_err(|e| Error::OperationFailed {
            operation: "serialize_issue_history".to_string(),
            cause: e.to_string(),
        })?;

        fs::write(&self.path, contents).map_err(|e| Error::OperationFailed {
            operation: "write_issue_history".to_string(),
            cause: format!("{}: {}", self.path.display(), e),
        })
    }
}

/// In-memory history store for deterministic tests.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    history: Mutex<IssueHistory>,
}

impl MemoryHistoryStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> Result<IssueHistory> {
        self.history
            .lock()
            .map(|h| h.clone())
            .map_err(|e| Error::OperationFailed {
                operation: "load_issue_history".to_string(),
                cause: e.to_string(),
            })
    }

    fn save(&self, history: &IssueHistory) -> Result<()> {
        self.history
            .lock()
            .map(|mut h| *h = history.clone())
            .map_err(|e| Error::OperationFailed {
                operation: "save_issue_history".to_string(),
                cause: e.to_string(),
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_record_counts_from_one() {
        let mut history = IssueHistory::new();
        assert_eq!(history.record("null|type"), 1);
        assert_eq!(history.record("null|type"), 2);
        assert_eq!(history.record("general"), 1);
        assert_eq!(history.count_for("null|type"), 2);
        assert_eq!(history.count_for("never-seen"), 0);
    }

    #[test]
    fn test_ranked_orders_by_count_then_name() {
        let mut history = IssueHistory::new();
        history.record("b");
        history.record("a");
        history.record("a");
        history.record("c");
        let ranked = history.ranked();
        assert_eq!(ranked[0], ("a".to_string(), 2));
        assert_eq!(ranked[1], ("b".to_string(), 1));
        assert_eq!(ranked[2], ("c".to_string(), 1));
    }

    #[test]
    fn test_filesystem_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemHistoryStore::new(dir.path().join("issues.json"));
        let history = store.load().unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_filesystem_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemHistoryStore::new(dir.path().join("issues.json"));

        let mut history = IssueHistory::new();
        history.record("exception|null");
        history.record("exception|null");
        history.record("general");
        store.save(&history).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, history);

        // A no-op save-then-load in between is idempotent
        store.save(&loaded).unwrap();
        assert_eq!(store.load().unwrap(), history);
    }

    #[test]
    fn test_filesystem_corrupt_file_degrades_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("issues.json");
        fs::write(&path, "not json at all {{{").unwrap();

        let store = FilesystemHistoryStore::new(&path);
        assert!(store.load().is_err());
        assert!(store.load_or_default().is_empty());

        // Saving afterwards produces a fresh valid file
        let mut history = IssueHistory::new();
        history.record("general");
        store.save(&history).unwrap();
        assert_eq!(store.load().unwrap().count_for("general"), 1);
    }

    #[test]
    fn test_filesystem_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let store = FilesystemHistoryStore::new(dir.path().join("nested").join("issues.json"));
        store.save(&IssueHistory::new()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryHistoryStore::new();
        let mut history = store.load_or_default();
        assert_eq!(history.record("general"), 1);
        store.save(&history).unwrap();
        assert_eq!(store.load().unwrap().count_for("general"), 1);
    }
}

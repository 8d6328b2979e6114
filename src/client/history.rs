// src/client/history.rs
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Only the most recent entries are kept, matching the widget's cap.
pub const HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub user: String,
    pub bot: String,
    /// Unix millis at the time the exchange completed.
    pub timestamp: u64,
    pub conversation_id: Option<String>,
}

impl HistoryEntry {
    pub fn new(user: impl Into<String>, bot: impl Into<String>, conversation_id: Option<String>) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Self {
            user: user.into(),
            bot: bot.into(),
            timestamp,
            conversation_id,
        }
    }
}

/// Where the log lives between runs. Implementations are best-effort: a
/// store that cannot be read behaves as empty, a failed write is logged and
/// dropped, the way the widget treats its local storage.
pub trait HistoryStore: Send + Sync {
    fn load(&self) -> Vec<HistoryEntry>;
    fn save(&self, entries: &[HistoryEntry]);
}

/// JSON file on disk, the headless stand-in for browser local storage.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HistoryStore for JsonFileStore {
    fn load(&self) -> Vec<HistoryEntry> {
        let Ok(content) = std::fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    fn save(&self, entries: &[HistoryEntry]) {
        let json = match serde_json::to_string(entries) {
            Ok(json) => json,
            Err(err) => {
                warn!(error = %err, "could not serialize chat history");
                return;
            }
        };
        if let Err(err) = std::fs::write(&self.path, json) {
            warn!(error = %err, path = %self.path.display(), "could not persist chat history");
        }
    }
}

/// Volatile store for tests and single-run embedding.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Vec<HistoryEntry>>,
}

impl HistoryStore for MemoryStore {
    fn load(&self) -> Vec<HistoryEntry> {
        self.inner.lock().map(|g| g.clone()).unwrap_or_default()
    }

    fn save(&self, entries: &[HistoryEntry]) {
        if let Ok(mut guard) = self.inner.lock() {
            *guard = entries.to_vec();
        }
    }
}

/// Bounded in-memory log mirrored to a [`HistoryStore`] on every change.
pub struct HistoryLog {
    store: Arc<dyn HistoryStore>,
    entries: Mutex<Vec<HistoryEntry>>,
}

impl HistoryLog {
    /// Load whatever the store has, trimming oversized persisted logs.
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        let mut entries = store.load();
        if entries.len() > HISTORY_LIMIT {
            entries.drain(..entries.len() - HISTORY_LIMIT);
        }
        Self {
            store,
            entries: Mutex::new(entries),
        }
    }

    pub fn append(&self, entry: HistoryEntry) {
        let Ok(mut guard) = self.entries.lock() else {
            return;
        };
        guard.push(entry);
        if guard.len() > HISTORY_LIMIT {
            let overflow = guard.len() - HISTORY_LIMIT;
            guard.drain(..overflow);
        }
        self.store.save(&guard);
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Conversation id of the newest persisted exchange, if any.
    pub fn last_conversation_id(&self) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|g| g.last().and_then(|e| e.conversation_id.clone()))
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.clear();
            self.store.save(&guard);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_is_bounded() {
        let log = HistoryLog::new(Arc::new(MemoryStore::default()));
        for i in 0..(HISTORY_LIMIT + 5) {
            log.append(HistoryEntry::new(format!("u{i}"), "b", None));
        }
        let entries = log.entries();
        assert_eq!(entries.len(), HISTORY_LIMIT);
        assert_eq!(entries[0].user, "u5");
    }

    #[test]
    fn json_file_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let store = JsonFileStore::new(&path);
        store.save(&[HistoryEntry::new("hi", "hello", Some("conv_1_a".to_string()))]);

        let loaded = store.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].user, "hi");
        assert_eq!(loaded[0].conversation_id.as_deref(), Some("conv_1_a"));
    }

    #[test]
    fn unreadable_store_behaves_as_empty() {
        let store = JsonFileStore::new("/nonexistent/path/history.json");
        assert!(store.load().is_empty());
    }
}

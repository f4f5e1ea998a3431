//! Multi-document history storage and persistence.

use super::cross_update::Snapshot;
use super::error::HistoryError;
use super::state::DocumentHistory;
use crate::persist::StateStore;
use crate::position::Position;
use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Store key for the serialized document-to-history mapping.
pub const RECORDS_KEY: &str = "scorenav.history.records";

/// Store key for the cross-update side-channel snapshot.
pub const SNAPSHOT_KEY: &str = "scorenav.history.snapshot";

/// Persisted shape of one document's history.
///
/// Stack entries deserialize as options so that null entries from corrupted
/// prior data surface as `None` instead of failing the whole load.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RawDocument {
    #[serde(default)]
    back_stack: Vec<Option<Position>>,
    #[serde(default)]
    forward_stack: Vec<Option<Position>>,
    #[serde(default)]
    current: Option<Position>,
}

impl RawDocument {
    fn from_history(history: &DocumentHistory) -> Self {
        Self {
            back_stack: history.back_records().iter().cloned().map(Some).collect(),
            forward_stack: history.forward_records().iter().cloned().map(Some).collect(),
            current: history.current().cloned(),
        }
    }

    /// Converts to in-memory state, dropping null entries. Returns the
    /// history and how many entries were dropped.
    fn into_history(self) -> (DocumentHistory, usize) {
        let raw_len = self.back_stack.len() + self.forward_stack.len();
        let back: Vec<Position> = self.back_stack.into_iter().flatten().collect();
        let forward: Vec<Position> = self.forward_stack.into_iter().flatten().collect();
        let dropped = raw_len - back.len() - forward.len();
        (DocumentHistory::from_parts(back, forward, self.current), dropped)
    }
}

/// Owns the history of every open document and the persisted blob.
///
/// Exactly one document is active at a time; its state is held out of the
/// mapping and flushed back in when the active document switches or the
/// store saves. Histories are created lazily and empty on first reference
/// to a document key.
pub struct HistoryStore {
    documents: IndexMap<String, DocumentHistory>,
    active_key: Option<String>,
    active: DocumentHistory,
    backend: Box<dyn StateStore>,
    read_only: bool,
    /// Raw blob of the last snapshot this store consumed. In observer mode
    /// the persisted blob cannot be cleared, so consumption is tracked here
    /// instead.
    consumed_snapshot: Option<String>,
}

impl HistoryStore {
    /// Creates an empty store over the given persistence backend.
    pub fn new(backend: Box<dyn StateStore>) -> Self {
        Self {
            documents: IndexMap::new(),
            active_key: None,
            active: DocumentHistory::new(),
            backend,
            read_only: false,
            consumed_snapshot: None,
        }
    }

    /// Makes `key` the active document.
    ///
    /// No-op when `key` is already active. Otherwise the old active state is
    /// flushed back into the mapping and the state for `key` is looked up,
    /// or lazily created empty. Histories never leak across documents.
    pub fn switch_active(&mut self, key: &str) {
        if self.active_key.as_deref() == Some(key) {
            return;
        }
        if let Some(old_key) = self.active_key.take() {
            self.documents
                .insert(old_key, std::mem::take(&mut self.active));
        }
        self.active = self.documents.shift_remove(key).unwrap_or_default();
        self.active_key = Some(key.to_string());
    }

    /// The active document's history.
    pub fn active(&self) -> &DocumentHistory {
        &self.active
    }

    /// Mutable access to the active document's history.
    pub fn active_mut(&mut self) -> &mut DocumentHistory {
        &mut self.active
    }

    /// The active document key, once one has been switched to.
    pub fn active_key(&self) -> Option<&str> {
        self.active_key.as_deref()
    }

    /// A non-active document's stored history.
    pub fn document(&self, key: &str) -> Option<&DocumentHistory> {
        if self.active_key.as_deref() == Some(key) {
            Some(&self.active)
        } else {
            self.documents.get(key)
        }
    }

    /// Puts the store into (or out of) observer mode. Read-only stores
    /// never write to the backend.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Returns true if the store is in observer mode.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Flushes the active state and serializes the whole mapping to the
    /// backend. No-op in observer mode.
    pub fn save(&mut self) -> Result<()> {
        if self.read_only {
            return Ok(());
        }
        if let Some(key) = &self.active_key {
            self.documents.insert(key.clone(), self.active.clone());
        }
        let raw: IndexMap<&String, RawDocument> = self
            .documents
            .iter()
            .map(|(key, history)| (key, RawDocument::from_history(history)))
            .collect();
        let blob = serde_json::to_string(&raw)?;
        tracing::debug!(documents = raw.len(), "saving history records");
        self.backend.save_value(RECORDS_KEY, &blob)
    }

    /// Replaces the in-memory mapping with the persisted one.
    ///
    /// Absent or malformed data yields an empty mapping, never a fatal
    /// failure: the returned error is purely for reporting, the store is
    /// always left structurally valid. Null stack entries are dropped; with
    /// `repair` off that counts as malformed data, with it on it is a
    /// silent repair pass.
    pub fn load(&mut self, repair: bool) -> Result<(), HistoryError> {
        self.documents.clear();
        self.active_key = None;
        self.active = DocumentHistory::new();

        let blob = match self.backend.load_value(RECORDS_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => return Ok(()),
            Err(err) => {
                return Err(HistoryError::MalformedPersistedState {
                    reason: err.to_string(),
                })
            }
        };

        let raw: IndexMap<String, RawDocument> = match serde_json::from_str(&blob) {
            Ok(raw) => raw,
            Err(err) => {
                return Err(HistoryError::MalformedPersistedState {
                    reason: err.to_string(),
                })
            }
        };

        let mut dropped = 0;
        for (key, raw_doc) in raw {
            let (history, doc_dropped) = raw_doc.into_history();
            dropped += doc_dropped;
            self.documents.insert(key, history);
        }
        tracing::debug!(documents = self.documents.len(), "loaded history records");

        if dropped > 0 {
            if repair {
                tracing::debug!(dropped, "repaired null entries in persisted stacks");
            } else {
                return Err(HistoryError::MalformedPersistedState {
                    reason: format!("{} null stack entries dropped", dropped),
                });
            }
        }
        Ok(())
    }

    /// Persists a side-channel snapshot of the active document's history,
    /// for other actors' cross-update detection. No-op in observer mode or
    /// before any document is active.
    pub fn write_snapshot(&mut self) -> Result<()> {
        if self.read_only {
            return Ok(());
        }
        let key = match &self.active_key {
            Some(key) => key,
            None => return Ok(()),
        };
        let snapshot = Snapshot {
            document: key.clone(),
            back_stack: self.active.back_records().to_vec(),
            forward_stack: self.active.forward_records().to_vec(),
            current: self.active.current().cloned(),
        };
        let blob = serde_json::to_string(&snapshot)?;
        self.backend.save_value(SNAPSHOT_KEY, &blob)
    }

    /// Reads and consumes the side-channel snapshot, if one exists for the
    /// active document.
    ///
    /// Snapshots for other documents are left in place so a later switch
    /// can still interpret them. Consumption clears the store key except in
    /// observer mode, where clearing would be a write; there the consumed
    /// blob is remembered in memory and skipped on later reads, so a
    /// snapshot is never interpreted twice even after the observer's own
    /// navigation reshapes its stacks. A snapshot that fails to parse is
    /// cleared and reported.
    pub fn take_snapshot(&mut self) -> Result<Option<Snapshot>, HistoryError> {
        let blob = match self.backend.load_value(SNAPSHOT_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => return Ok(None),
            Err(err) => {
                return Err(HistoryError::MalformedPersistedState {
                    reason: err.to_string(),
                })
            }
        };

        if self.consumed_snapshot.as_deref() == Some(blob.as_str()) {
            return Ok(None);
        }

        let snapshot: Snapshot = match serde_json::from_str(&blob) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                if !self.read_only {
                    let _ = self.backend.remove_value(SNAPSHOT_KEY);
                }
                return Err(HistoryError::MalformedPersistedState {
                    reason: err.to_string(),
                });
            }
        };

        if Some(snapshot.document.as_str()) != self.active_key.as_deref() {
            return Ok(None);
        }

        self.consumed_snapshot = Some(blob);
        if !self.read_only {
            if let Err(err) = self.backend.remove_value(SNAPSHOT_KEY) {
                tracing::warn!("could not clear consumed snapshot: {err}");
            }
        }
        Ok(Some(snapshot))
    }
}

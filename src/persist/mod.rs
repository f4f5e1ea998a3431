//! Key-value blob persistence boundary.
//!
//! The history engine persists its state as opaque text blobs under string
//! keys. The boundary stays deliberately narrow: whole values are read and
//! written in full, never patched field by field, so independent actors
//! sharing a store only ever race on complete blobs.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use anyhow::Result;

/// Storage for persisted engine state.
///
/// Implementations may be backed by anything that round-trips text under a
/// key. Failures are surfaced to the caller; the engine treats a failed read
/// as absent data and reports (but survives) a failed write.
pub trait StateStore {
    /// Reads the blob stored under `key`, or `None` if absent.
    fn load_value(&self, key: &str) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous blob.
    fn save_value(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes the blob under `key`, if any.
    fn remove_value(&mut self, key: &str) -> Result<()>;
}

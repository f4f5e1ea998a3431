//! File-backed blob storage.

use super::StateStore;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Blob store keeping one file per key inside a directory.
///
/// Writes are atomic: the value is written to a temporary file in the same
/// directory and then renamed over the target, so a crash never leaves a
/// half-written blob behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("could not create state directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    /// Default location under the user's config directory
    /// (`~/.config/scorenav/state`).
    pub fn default_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("scorenav");
            path.push("state");
            path
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are dotted identifiers; any other byte is percent-encoded,
        // so distinct keys never share a file and a key can never escape
        // the store directory.
        let mut name = String::with_capacity(key.len());
        for c in key.chars() {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                name.push(c);
            } else {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    name.push_str(&format!("%{:02X}", byte));
                }
            }
        }
        if name.is_empty() {
            name.push('%');
        } else if name.chars().all(|c| c == '.') {
            name = "%2E".repeat(name.len());
        }
        self.dir.join(name)
    }
}

impl StateStore for FileStore {
    fn load_value(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("could not read state file {}", path.display()))?;
        Ok(Some(contents))
    }

    fn save_value(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        let tmp = tmp_path(&path);
        fs::write(&tmp, value)
            .with_context(|| format!("could not write state file {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("could not replace state file {}", path.display()))?;
        Ok(())
    }

    fn remove_value(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("could not remove state file {}", path.display()))?;
        }
        Ok(())
    }
}

/// Sibling temporary path so the final rename stays on one filesystem.
fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

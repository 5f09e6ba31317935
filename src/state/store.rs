//! Durable storage for the session bearer token.
//!
//! SYSTEM CONTEXT
//! ==============
//! The dashboard keeps one opaque token under a well-known key. The HTTP
//! client reads it before every request; only `AuthSession` writes or clears
//! it. `FileTokenStore` keeps a small JSON key/value document on disk so the
//! token survives restarts the same way browser local storage does.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Key the bearer token is stored under.
pub const TOKEN_STORAGE_KEY: &str = "token";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session storage io failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("session storage encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Persistence for a single bearer token.
pub trait TokenStore: Send + Sync {
    /// Return the stored token, if any. Unreadable storage reads as empty.
    fn load(&self) -> Option<String>;

    /// Replace the stored token.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the token cannot be written.
    fn save(&self, token: &str) -> Result<(), StoreError>;

    /// Remove the stored token. Never fails; I/O problems are logged.
    fn clear(&self);
}

// =============================================================================
// MEMORY
// =============================================================================

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `token` already stored.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self { token: Mutex::new(Some(token.into())) }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        *self
            .token
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) {
        *self
            .token
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = None;
    }
}

// =============================================================================
// FILE
// =============================================================================

/// JSON key/value file holding the token under [`TOKEN_STORAGE_KEY`].
///
/// Other keys in the document are preserved across writes.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    guard: Mutex<()>,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), guard: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> BTreeMap<String, String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "session storage unreadable");
                return BTreeMap::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "session storage corrupt; treating as empty");
            BTreeMap::new()
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io { path: self.path.clone(), source };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let raw = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        // An existing file keeps its mode on open; remove leftovers first.
        match fs::remove_file(&tmp) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(io_err(e)),
            _ => {}
        }
        let mut file = private_file_options().open(&tmp).map_err(io_err)?;
        file.write_all(raw.as_bytes()).map_err(io_err)?;
        drop(file);
        fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

/// Options for the token temp file: owner-only (`0600`) on unix.
fn private_file_options() -> fs::OpenOptions {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        let _guard = self.guard.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        self.read_entries()
            .remove(TOKEN_STORAGE_KEY)
            .filter(|token| !token.is_empty())
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        let _guard = self.guard.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut entries = self.read_entries();
        entries.insert(TOKEN_STORAGE_KEY.to_owned(), token.to_owned());
        self.write_entries(&entries)
    }

    fn clear(&self) {
        let _guard = self.guard.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut entries = self.read_entries();
        if entries.remove(TOKEN_STORAGE_KEY).is_none() {
            return;
        }
        if let Err(e) = self.write_entries(&entries) {
            tracing::warn!(error = %e, "failed to clear stored session token");
        }
    }
}

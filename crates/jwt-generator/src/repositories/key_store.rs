//! Byte-blob storage for key files, keyed by path.
//!
//! The provisioner only needs three operations: an existence check that
//! drives the generate-or-load fork, a full read, and a write. Production
//! uses [`FsKeyStore`]; tests substitute in-memory or failing stores.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

/// Who may read a stored key file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyVisibility {
    /// Owner read/write only (`0600`)
    Private,
    /// Owner read/write, world readable (`0644`)
    Public,
}

impl KeyVisibility {
    /// Unix permission bits for files written with this visibility
    pub fn mode(self) -> u32 {
        match self {
            KeyVisibility::Private => 0o600,
            KeyVisibility::Public => 0o644,
        }
    }
}

#[derive(Debug, Error)]
pub enum KeyStoreError {
    #[error("{operation} {path} failed: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl KeyStoreError {
    pub fn io(operation: &'static str, path: &Path, source: io::Error) -> Self {
        KeyStoreError::Io {
            operation,
            path: path.to_path_buf(),
            source,
        }
    }
}

pub trait KeyStore {
    /// Whether a blob is stored at `path`
    fn exists(&self, path: &Path) -> Result<bool, KeyStoreError>;

    /// Full contents of the blob at `path`
    fn read(&self, path: &Path) -> Result<Vec<u8>, KeyStoreError>;

    /// Create or replace the blob at `path`
    fn write(
        &self,
        path: &Path,
        contents: &[u8],
        visibility: KeyVisibility,
    ) -> Result<(), KeyStoreError>;
}

/// Key store backed by the local filesystem.
///
/// Writes go to a temporary file in the destination directory which is
/// renamed over the target, so a reader never observes a half-written key.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsKeyStore;

impl FsKeyStore {
    pub fn new() -> Self {
        Self
    }
}

impl KeyStore for FsKeyStore {
    fn exists(&self, path: &Path) -> Result<bool, KeyStoreError> {
        path.try_exists()
            .map_err(|e| KeyStoreError::io("stat", path, e))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, KeyStoreError> {
        fs::read(path).map_err(|e| KeyStoreError::io("read", path, e))
    }

    fn write(
        &self,
        path: &Path,
        contents: &[u8],
        visibility: KeyVisibility,
    ) -> Result<(), KeyStoreError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        fs::create_dir_all(dir).map_err(|e| KeyStoreError::io("create directory for", path, e))?;

        let mut staged =
            NamedTempFile::new_in(dir).map_err(|e| KeyStoreError::io("stage", path, e))?;

        staged
            .write_all(contents)
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|e| KeyStoreError::io("write", path, e))?;

        set_mode(staged.as_file(), visibility).map_err(|e| KeyStoreError::io("chmod", path, e))?;

        staged
            .persist(path)
            .map_err(|e| KeyStoreError::io("rename into", path, e.error))?;

        debug!(path = %path.display(), bytes = contents.len(), "Key file written");

        Ok(())
    }
}

#[cfg(unix)]
fn set_mode(file: &fs::File, visibility: KeyVisibility) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(visibility.mode()))
}

#[cfg(not(unix))]
fn set_mode(_file: &fs::File, _visibility: KeyVisibility) -> io::Result<()> {
    Ok(())
}

//! Key store doubles
//!
//! - [`MemoryKeyStore`] keeps blobs in a map and records every write
//! - [`FailingKeyStore`] wraps another store and fails one chosen operation
//! - [`TestKeyDir`] is a throwaway directory with conventional key paths

use jwt_generator::repositories::{KeyStore, KeyStoreError, KeyVisibility};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// A blob recorded by [`MemoryKeyStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub contents: Vec<u8>,
    pub visibility: KeyVisibility,
}

/// In-memory [`KeyStore`] that remembers the order of writes.
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    blobs: Mutex<HashMap<PathBuf, StoredBlob>>,
    writes: Mutex<Vec<PathBuf>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `contents` at `path`
    pub fn with_blob(path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        let store = Self::new();
        store.blobs.lock().unwrap().insert(
            path.into(),
            StoredBlob {
                contents: contents.into(),
                visibility: KeyVisibility::Private,
            },
        );
        store
    }

    pub fn get(&self, path: &Path) -> Option<StoredBlob> {
        self.blobs.lock().unwrap().get(path).cloned()
    }

    /// Paths passed to `write`, in call order
    pub fn writes(&self) -> Vec<PathBuf> {
        self.writes.lock().unwrap().clone()
    }
}

impl KeyStore for MemoryKeyStore {
    fn exists(&self, path: &Path) -> Result<bool, KeyStoreError> {
        Ok(self.blobs.lock().unwrap().contains_key(path))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, KeyStoreError> {
        self.get(path).map(|blob| blob.contents).ok_or_else(|| {
            KeyStoreError::io("read", path, io::Error::from(io::ErrorKind::NotFound))
        })
    }

    fn write(
        &self,
        path: &Path,
        contents: &[u8],
        visibility: KeyVisibility,
    ) -> Result<(), KeyStoreError> {
        self.writes.lock().unwrap().push(path.to_path_buf());
        self.blobs.lock().unwrap().insert(
            path.to_path_buf(),
            StoredBlob {
                contents: contents.to_vec(),
                visibility,
            },
        );
        Ok(())
    }
}

/// Which call a [`FailingKeyStore`] should fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailOn {
    Exists,
    Read,
    /// Writes to this path fail; other writes go through
    WriteTo(PathBuf),
}

/// Store that delegates to `inner` except for one injected failure.
#[derive(Debug)]
pub struct FailingKeyStore<S> {
    pub inner: S,
    fail_on: FailOn,
}

impl<S: KeyStore> FailingKeyStore<S> {
    pub fn new(inner: S, fail_on: FailOn) -> Self {
        Self { inner, fail_on }
    }

    fn injected(operation: &'static str, path: &Path) -> KeyStoreError {
        KeyStoreError::io(
            operation,
            path,
            io::Error::new(io::ErrorKind::PermissionDenied, "injected failure"),
        )
    }
}

impl<S: KeyStore> KeyStore for FailingKeyStore<S> {
    fn exists(&self, path: &Path) -> Result<bool, KeyStoreError> {
        if self.fail_on == FailOn::Exists {
            return Err(Self::injected("stat", path));
        }
        self.inner.exists(path)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, KeyStoreError> {
        if self.fail_on == FailOn::Read {
            return Err(Self::injected("read", path));
        }
        self.inner.read(path)
    }

    fn write(
        &self,
        path: &Path,
        contents: &[u8],
        visibility: KeyVisibility,
    ) -> Result<(), KeyStoreError> {
        if matches!(&self.fail_on, FailOn::WriteTo(target) if target == path) {
            return Err(Self::injected("write", path));
        }
        self.inner.write(path, contents, visibility)
    }
}

/// Temporary directory holding `private.pem` / `public.pem` paths.
///
/// The directory and everything in it is removed on drop.
#[derive(Debug)]
pub struct TestKeyDir {
    dir: TempDir,
    pub private_key_path: PathBuf,
    pub public_key_path: PathBuf,
}

impl TestKeyDir {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp key dir");
        let private_key_path = dir.path().join("private.pem");
        let public_key_path = dir.path().join("public.pem");
        Self {
            dir,
            private_key_path,
            public_key_path,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Place `pem` at the private key path
    pub fn with_private_key(self, pem: &str) -> Self {
        std::fs::write(&self.private_key_path, pem).expect("write private key fixture");
        self
    }

    pub fn read_private_key(&self) -> String {
        std::fs::read_to_string(&self.private_key_path).expect("read private key")
    }

    pub fn read_public_key(&self) -> String {
        std::fs::read_to_string(&self.public_key_path).expect("read public key")
    }
}

impl Default for TestKeyDir {
    fn default() -> Self {
        Self::new()
    }
}

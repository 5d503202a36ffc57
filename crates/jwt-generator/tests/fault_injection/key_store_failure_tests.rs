//! Fault injection tests for key storage failures
//!
//! Each test injects one failure into the key store and checks that:
//! - The error is reported at the right stage
//! - A failed public key write leaves no private key behind
//! - No token is produced

use jwt_generator::repositories::FsKeyStore;
use jwt_generator::services::{self, keypair_service};
use jwt_test_utils::*;

#[test]
fn test_public_key_write_failure_leaves_no_private_key() {
    let keys = TestKeyDir::new();
    let store = FailingKeyStore::new(FsKeyStore::new(), FailOn::WriteTo(keys.public_key_path.clone()));

    let err = keypair_service::provision(&store, &keys.private_key_path, &keys.public_key_path)
        .unwrap_err();

    assert_eq!(err.stage(), "key_persistence");
    assert!(err.to_string().contains("public key"));
    assert!(!keys.private_key_path.exists());
    assert!(!keys.public_key_path.exists());
}

/// Next run retries generation because no private key exists yet
#[test]
fn test_recovery_after_failed_public_write() -> Result<(), anyhow::Error> {
    let keys = TestKeyDir::new();
    let failing =
        FailingKeyStore::new(FsKeyStore::new(), FailOn::WriteTo(keys.public_key_path.clone()));
    assert!(
        keypair_service::provision(&failing, &keys.private_key_path, &keys.public_key_path)
            .is_err()
    );

    keypair_service::provision(&FsKeyStore::new(), &keys.private_key_path, &keys.public_key_path)?;

    assert!(keys.private_key_path.exists());
    assert!(keys.public_key_path.exists());

    Ok(())
}

#[test]
fn test_private_key_write_failure() {
    let keys = TestKeyDir::new();
    let store = FailingKeyStore::new(FsKeyStore::new(), FailOn::WriteTo(keys.private_key_path.clone()));

    let err = keypair_service::provision(&store, &keys.private_key_path, &keys.public_key_path)
        .unwrap_err();

    assert_eq!(err.stage(), "key_persistence");
    assert!(err.to_string().contains("private key"));
    assert!(!keys.private_key_path.exists());
}

#[test]
fn test_existence_check_failure_is_key_load_error() {
    let keys = TestKeyDir::new();
    let store = FailingKeyStore::new(MemoryKeyStore::new(), FailOn::Exists);

    let err = keypair_service::provision(&store, &keys.private_key_path, &keys.public_key_path)
        .unwrap_err();

    assert_eq!(err.stage(), "key_load");
    assert!(store.inner.writes().is_empty());
}

#[test]
fn test_read_failure_produces_no_token() {
    let keys = TestKeyDir::new();
    let store = FailingKeyStore::new(
        MemoryKeyStore::with_blob(&keys.private_key_path, TEST_PRIVATE_KEY_PEM),
        FailOn::Read,
    );
    let config = TestConfigBuilder::new(&keys).claim("role:admin").build();

    let err = services::generate_token(&config, &store).unwrap_err();

    assert_eq!(err.stage(), "key_load");
    assert!(err.to_string().contains("injected failure"));
}

#[test]
fn test_persistence_error_does_not_contain_key_material() {
    let keys = TestKeyDir::new();
    let store = FailingKeyStore::new(MemoryKeyStore::new(), FailOn::WriteTo(keys.private_key_path.clone()));

    let err = keypair_service::provision(&store, &keys.private_key_path, &keys.public_key_path)
        .unwrap_err();

    assert!(!err.to_string().contains("BEGIN RSA PRIVATE KEY"));
    // Public key was written before the private write failed
    assert!(store.inner.get(&keys.public_key_path).is_some());
    assert!(store.inner.get(&keys.private_key_path).is_none());
}

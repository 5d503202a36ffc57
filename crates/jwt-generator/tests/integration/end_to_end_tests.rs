//! End-to-end tests: YAML file on disk through to a verified token
//!
//! These drive the same entry point as the binary (`cli::run`).

use jwt_generator::cli::{self, Cli};
use jwt_generator::errors::JwtGenError;
use jwt_generator::repositories::FsKeyStore;
use jwt_generator::services;
use jwt_test_utils::*;

fn cli_for(config: std::path::PathBuf) -> Cli {
    Cli {
        config,
        json_logs: false,
    }
}

/// First run generates keys, second run reuses them
#[test]
fn test_two_runs_share_one_keypair() -> Result<(), anyhow::Error> {
    let keys = TestKeyDir::new();
    let config_path = TestConfigBuilder::new(&keys)
        .expires(5)
        .claims(&["role:admin", "team:infra"])
        .write_to(&keys.path().join("config.yaml"));

    let first = cli::run(&cli_for(config_path.clone()))?;

    let private_after_first = keys.read_private_key();
    let public_key = keys.read_public_key();

    first
        .assert_valid_jwt()
        .assert_claim_names(&["role", "team", "iat", "exp"])
        .assert_claim("role", "admin")
        .assert_claim("team", "infra")
        .assert_lifetime(300)
        .assert_verifies_with(&public_key);

    let second = cli::run(&cli_for(config_path))?;

    assert_eq!(keys.read_private_key(), private_after_first);
    assert_eq!(keys.read_public_key(), public_key);
    second
        .assert_valid_jwt()
        .assert_lifetime(300)
        .assert_verifies_with(&public_key);

    Ok(())
}

/// A bad claim fails before signing; the key is still provisioned
#[test]
fn test_bad_claim_produces_no_token() -> Result<(), anyhow::Error> {
    let keys = TestKeyDir::new().with_private_key(TEST_PRIVATE_KEY_PEM);
    let config_path = TestConfigBuilder::new(&keys)
        .claim("badclaim")
        .write_to(&keys.path().join("config.yaml"));

    let err = cli::run(&cli_for(config_path)).unwrap_err();

    assert!(matches!(&err, JwtGenError::ClaimSyntax(literal) if literal == "badclaim"));
    assert_eq!(err.to_string(), "Invalid claim: badclaim");

    Ok(())
}

#[test]
fn test_existing_fixture_key_signs_token() -> Result<(), anyhow::Error> {
    let keys = TestKeyDir::new().with_private_key(TEST_PRIVATE_KEY_PEM);
    let config = TestConfigBuilder::new(&keys).claim("env:staging").build();

    let token = services::generate_token(&config, &FsKeyStore::new())?;

    token
        .assert_claim("env", "staging")
        .assert_verifies_with(TEST_PUBLIC_KEY_PEM);
    assert!(!keys.public_key_path.exists());

    Ok(())
}

/// Garbage at the private key path is loaded, then rejected at parse time
#[test]
fn test_corrupt_existing_key_fails_at_parse() {
    let keys = TestKeyDir::new().with_private_key("definitely not a key\n");
    let config = TestConfigBuilder::new(&keys).build();

    let err = services::generate_token(&config, &FsKeyStore::new()).unwrap_err();

    assert_eq!(err.stage(), "key_parse");
    assert_eq!(keys.read_private_key(), "definitely not a key\n");
}

#[test]
fn test_unknown_config_field_is_rejected() -> Result<(), anyhow::Error> {
    let keys = TestKeyDir::new();
    let config_path = keys.path().join("config.yaml");
    std::fs::write(
        &config_path,
        "expires: 5\nexpiry: 10\nkeys:\n  private: a.pem\n  public: b.pem\n",
    )?;

    let err = cli::run(&cli_for(config_path)).unwrap_err();

    assert!(matches!(err, JwtGenError::Config(_)));
    assert!(!keys.private_key_path.exists());

    Ok(())
}

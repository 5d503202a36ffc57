//! Tests that run the compiled `jwt-generator` binary
//!
//! These check the process contract: stdout carries only the token line,
//! failures are reported once on stderr, and the exit status reflects the
//! outcome.

use jwt_test_utils::*;
use std::path::Path;
use std::process::{Command, Output};

fn run_binary(config: &Path) -> Result<Output, anyhow::Error> {
    let output = Command::new(env!("CARGO_BIN_EXE_jwt-generator"))
        .arg("--config")
        .arg(config)
        .env_remove("RUST_LOG")
        .env_remove("JWT_GENERATOR_CONFIG")
        .output()?;
    Ok(output)
}

#[test]
fn test_success_prints_only_token_line() -> Result<(), anyhow::Error> {
    let keys = TestKeyDir::new().with_private_key(TEST_PRIVATE_KEY_PEM);
    let config = TestConfigBuilder::new(&keys)
        .claim("role:admin")
        .write_to(&keys.path().join("config.yaml"));

    let output = run_binary(&config)?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    let token = stdout
        .strip_prefix("Token: ")
        .and_then(|rest| rest.strip_suffix('\n'))
        .ok_or_else(|| anyhow::anyhow!("unexpected stdout: {stdout:?}"))?
        .to_string();

    token
        .assert_claim("role", "admin")
        .assert_verifies_with(TEST_PUBLIC_KEY_PEM);

    Ok(())
}

/// The failure is logged once and nothing else is printed for it
#[test]
fn test_failure_is_reported_once_with_nonzero_exit() -> Result<(), anyhow::Error> {
    let keys = TestKeyDir::new().with_private_key(TEST_PRIVATE_KEY_PEM);
    let config = TestConfigBuilder::new(&keys)
        .claim("badclaim")
        .write_to(&keys.path().join("config.yaml"));

    let output = run_binary(&config)?;

    assert!(!output.status.success());
    assert!(output.stdout.is_empty(), "No token may be printed on failure");

    let stderr = String::from_utf8(output.stderr)?;
    assert_eq!(stderr.matches("Invalid claim: badclaim").count(), 1, "stderr: {stderr}");
    assert!(!stderr.contains("Error: "), "stderr: {stderr}");

    Ok(())
}

use crate::config::ConfigError;
use thiserror::Error;

/// Every failure the generator can hit. All of them are terminal.
///
/// Messages name the stage that failed and the cause. None of them carry
/// private key material.
#[derive(Debug, Error)]
pub enum JwtGenError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("Failed to save key: {0}")]
    KeyPersistence(String),

    #[error("Failed to load private key: {0}")]
    KeyLoad(String),

    #[error("Invalid claim: {0}")]
    ClaimSyntax(String),

    #[error("Claim {0} is reserved and cannot be set from configuration")]
    ReservedClaim(String),

    #[error("Invalid expiry: {0} minutes does not yield a representable timestamp")]
    InvalidExpiry(i64),

    #[error("Invalid private key: {0}")]
    KeyParse(String),

    #[error("JWT signing failed: {0}")]
    Signing(String),
}

impl JwtGenError {
    /// Pipeline stage label for log fields
    pub fn stage(&self) -> &'static str {
        match self {
            JwtGenError::Config(_) => "config",
            JwtGenError::KeyGeneration(_) => "key_generation",
            JwtGenError::KeyPersistence(_) => "key_persistence",
            JwtGenError::KeyLoad(_) => "key_load",
            JwtGenError::ClaimSyntax(_) | JwtGenError::ReservedClaim(_) => "claims",
            JwtGenError::InvalidExpiry(_) => "expiry",
            JwtGenError::KeyParse(_) => "key_parse",
            JwtGenError::Signing(_) => "signing",
        }
    }
}

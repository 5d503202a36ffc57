//! jwt-generator library
//!
//! Mints RS256 JSON Web Tokens from a declarative YAML configuration,
//! generating the RSA signing keypair on first use.
//!
//! # Modules
//!
//! - `cli` - Command-line driver (flags, config loading, pipeline)
//! - `config` - YAML configuration
//! - `crypto` - RSA key generation, PEM codecs, RS256 signing
//! - `errors` - Error types
//! - `repositories` - Key storage (filesystem byte-blob store)
//! - `services` - Keypair provisioning and token issuance

pub mod cli;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod repositories;
pub mod services;

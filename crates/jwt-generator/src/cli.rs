use crate::config::{Config, DEFAULT_CONFIG_PATH};
use crate::errors::JwtGenError;
use crate::repositories::FsKeyStore;
use crate::services;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Default `EnvFilter` directives when `RUST_LOG` is unset.
pub const DEFAULT_LOG_DIRECTIVES: &str = "jwt_generator=info";

/// Mint an RS256 JWT from a YAML configuration, generating the signing
/// keypair on first run.
#[derive(Debug, Parser)]
#[command(name = "jwt-generator", version, about)]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, env = "JWT_GENERATOR_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Emit log lines as JSON objects
    #[arg(long)]
    pub json_logs: bool,
}

/// Load the configuration named by `cli` and issue one token.
pub fn run(cli: &Cli) -> Result<String, JwtGenError> {
    let config = Config::from_file(&cli.config)?;

    info!(path = %cli.config.display(), config = ?config, "Configuration loaded");

    services::generate_token(&config, &FsKeyStore::new())
}

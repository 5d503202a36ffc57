use common::jwt::{DEFAULT_RSA_KEY_BITS, MIN_RSA_KEY_BITS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Token specification and key locations, loaded from YAML.
///
/// ```yaml
/// expires: 5
/// claims:
///   - "role:admin"
///   - "team:infra"
/// keys:
///   private: keys/private.pem
///   public: keys/public.pem
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Token lifetime in whole minutes
    pub expires: i64,
    /// Custom claims as `"name:value"` strings, applied in order
    #[serde(default)]
    pub claims: Vec<String>,
    pub keys: KeyPaths,
    /// What to do with user claims named `iat` or `exp`
    #[serde(default)]
    pub reserved_claims: ReservedClaimPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyPaths {
    pub private: PathBuf,
    pub public: PathBuf,
    /// Modulus size used when a new keypair has to be generated
    #[serde(default = "default_key_bits")]
    pub bits: usize,
}

/// Handling of user claims that collide with `iat`/`exp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservedClaimPolicy {
    /// Later entries win, so a user claim replaces the computed timestamp.
    #[default]
    Overwrite,
    /// A user claim named `iat` or `exp` fails issuance.
    Reject,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

fn default_key_bits() -> usize {
    DEFAULT_RSA_KEY_BITS
}

impl Config {
    /// Load and validate configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml_str(&contents)
    }

    /// Load and validate configuration from YAML text
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config =
            serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keys.private.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "keys.private must not be empty".to_string(),
            ));
        }

        if self.keys.public.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "keys.public must not be empty".to_string(),
            ));
        }

        if self.keys.private == self.keys.public {
            return Err(ConfigError::Invalid(format!(
                "keys.private and keys.public both point to {}",
                self.keys.private.display()
            )));
        }

        if self.keys.bits < MIN_RSA_KEY_BITS {
            return Err(ConfigError::Invalid(format!(
                "keys.bits must be at least {MIN_RSA_KEY_BITS}, got {}",
                self.keys.bits
            )));
        }

        Ok(())
    }
}

//! Builder for [`Config`] values and on-disk config files

use common::jwt::DEFAULT_RSA_KEY_BITS;
use jwt_generator::config::{Config, KeyPaths, ReservedClaimPolicy};
use std::path::{Path, PathBuf};

/// Builder for test configurations
///
/// # Example
/// ```rust,ignore
/// let config = TestConfigBuilder::new(&keys)
///     .expires(5)
///     .claim("role:admin")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct TestConfigBuilder {
    expires: i64,
    claims: Vec<String>,
    private_key_path: PathBuf,
    public_key_path: PathBuf,
    bits: usize,
    reserved_claims: ReservedClaimPolicy,
}

impl TestConfigBuilder {
    /// Defaults: 5 minute lifetime, no claims, keys inside `keys`
    pub fn new(keys: &crate::TestKeyDir) -> Self {
        Self::with_paths(&keys.private_key_path, &keys.public_key_path)
    }

    pub fn with_paths(private_key_path: &Path, public_key_path: &Path) -> Self {
        Self {
            expires: 5,
            claims: Vec::new(),
            private_key_path: private_key_path.to_path_buf(),
            public_key_path: public_key_path.to_path_buf(),
            bits: DEFAULT_RSA_KEY_BITS,
            reserved_claims: ReservedClaimPolicy::Overwrite,
        }
    }

    pub fn expires(mut self, minutes: i64) -> Self {
        self.expires = minutes;
        self
    }

    pub fn claim(mut self, raw: &str) -> Self {
        self.claims.push(raw.to_string());
        self
    }

    pub fn claims(mut self, raw: &[&str]) -> Self {
        self.claims.extend(raw.iter().map(|s| (*s).to_string()));
        self
    }

    pub fn reject_reserved_claims(mut self) -> Self {
        self.reserved_claims = ReservedClaimPolicy::Reject;
        self
    }

    pub fn build(self) -> Config {
        Config {
            expires: self.expires,
            claims: self.claims,
            keys: KeyPaths {
                private: self.private_key_path,
                public: self.public_key_path,
                bits: self.bits,
            },
            reserved_claims: self.reserved_claims,
        }
    }

    /// Serialize to YAML and write it to `path`
    pub fn write_to(self, path: &Path) -> PathBuf {
        let yaml = serde_yaml::to_string(&self.build()).expect("serialize config");
        std::fs::write(path, yaml).expect("write config file");
        path.to_path_buf()
    }
}

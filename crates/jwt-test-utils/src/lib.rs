//! # jwt-generator Test Utilities
//!
//! Shared test utilities for the jwt-generator crate.
//!
//! This crate provides:
//! - Fixed RSA key fixtures (PKCS#1, PKCS#8, an unrelated pair, a weak key)
//! - Key store doubles (in-memory, failure-injecting, temp directories)
//! - Config builders (TestConfigBuilder)
//! - Custom assertions (TokenAssertions trait)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jwt_test_utils::*;
//!
//! #[test]
//! fn test_example() {
//!     let keys = TestKeyDir::new().with_private_key(TEST_PRIVATE_KEY_PEM);
//!     let config = TestConfigBuilder::new(&keys).claim("role:admin").build();
//!
//!     let token = generate_token(&config, &FsKeyStore::new()).unwrap();
//!
//!     token.assert_valid_jwt()
//!          .assert_claim("role", "admin")
//!          .assert_verifies_with(TEST_PUBLIC_KEY_PEM);
//! }
//! ```

pub mod assertions;
pub mod config_builders;
pub mod crypto_fixtures;
pub mod key_stores;

// Re-export commonly used items
pub use assertions::*;
pub use config_builders::*;
pub use crypto_fixtures::*;
pub use key_stores::*;

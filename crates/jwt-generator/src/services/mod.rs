pub mod keypair_service;
pub mod token_service;

use crate::config::Config;
use crate::errors::JwtGenError;
use crate::repositories::KeyStore;
use token_service::ClaimsSpec;

/// Provision the signing key, then issue a token for `config`.
pub fn generate_token<S: KeyStore + ?Sized>(
    config: &Config,
    store: &S,
) -> Result<String, JwtGenError> {
    let private_key_pem = keypair_service::provision_with_bits(
        store,
        &config.keys.private,
        &config.keys.public,
        config.keys.bits,
    )?;

    token_service::issue(ClaimsSpec::from(config), &private_key_pem)
}

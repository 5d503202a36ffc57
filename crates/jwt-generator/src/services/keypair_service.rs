use crate::crypto::{self, GeneratedKeypair};
use crate::errors::JwtGenError;
use crate::repositories::{KeyStore, KeyVisibility};
use common::jwt::DEFAULT_RSA_KEY_BITS;
use common::secret::{ExposeSecret, SecretString};
use std::path::Path;
use tracing::{info, instrument};

/// Return the private key PEM stored at `private_key_path`, generating and
/// persisting a new RSA-2048 keypair first if there is none.
pub fn provision<S: KeyStore + ?Sized>(
    store: &S,
    private_key_path: &Path,
    public_key_path: &Path,
) -> Result<SecretString, JwtGenError> {
    provision_with_bits(store, private_key_path, public_key_path, DEFAULT_RSA_KEY_BITS)
}

/// [`provision`] with an explicit modulus size for the generation path.
///
/// An existing private key is returned byte-for-byte without being parsed;
/// malformed content surfaces later as a key-parse error at issuance.
#[instrument(skip_all, fields(private_key_path = %private_key_path.display()))]
pub fn provision_with_bits<S: KeyStore + ?Sized>(
    store: &S,
    private_key_path: &Path,
    public_key_path: &Path,
    bits: usize,
) -> Result<SecretString, JwtGenError> {
    let exists = store.exists(private_key_path).map_err(|e| {
        JwtGenError::KeyLoad(format!("could not check for existing key: {e}"))
    })?;

    if exists {
        info!(path = %private_key_path.display(), "Loading private key");
        return load_private_key(store, private_key_path);
    }

    info!("No keys found, will generate new keys");

    let keypair = crypto::generate_rsa_keypair(bits)?;
    persist_keypair(store, &keypair, private_key_path, public_key_path)?;

    info!(
        private_key_path = %private_key_path.display(),
        public_key_path = %public_key_path.display(),
        bits,
        "Generated new RSA keypair"
    );

    Ok(keypair.private_key_pem)
}

fn load_private_key<S: KeyStore + ?Sized>(
    store: &S,
    private_key_path: &Path,
) -> Result<SecretString, JwtGenError> {
    let bytes = store
        .read(private_key_path)
        .map_err(|e| JwtGenError::KeyLoad(e.to_string()))?;

    let text = String::from_utf8(bytes).map_err(|_| {
        JwtGenError::KeyLoad(format!(
            "{} is not a text PEM file",
            private_key_path.display()
        ))
    })?;

    Ok(SecretString::from(text))
}

/// Public key first, private key last.
///
/// The private key's existence is what selects the load path on the next
/// run, so it must only appear once its public half is already on disk.
fn persist_keypair<S: KeyStore + ?Sized>(
    store: &S,
    keypair: &GeneratedKeypair,
    private_key_path: &Path,
    public_key_path: &Path,
) -> Result<(), JwtGenError> {
    store
        .write(
            public_key_path,
            keypair.public_key_pem.as_bytes(),
            KeyVisibility::Public,
        )
        .map_err(|e| JwtGenError::KeyPersistence(format!("public key: {e}")))?;

    store
        .write(
            private_key_path,
            keypair.private_key_pem.expose_secret().as_bytes(),
            KeyVisibility::Private,
        )
        .map_err(|e| JwtGenError::KeyPersistence(format!("private key: {e}")))?;

    Ok(())
}

use crate::errors::JwtGenError;
use common::jwt::TOKEN_TYPE;
use common::secret::{ExposeSecret, SecretString};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey};
use rsa::pkcs8::{DecodePrivateKey, EncodePublicKey, LineEnding};
use rsa::rand_core::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

/// A freshly generated keypair in its on-disk encodings.
///
/// `Debug` shows the public key and redacts the private key.
#[derive(Debug)]
pub struct GeneratedKeypair {
    /// PKCS#1 DER in `RSA PRIVATE KEY` PEM armor
    pub private_key_pem: SecretString,
    /// SPKI DER in `PUBLIC KEY` PEM armor
    pub public_key_pem: String,
}

/// Generate an RSA keypair using the operating system CSPRNG
#[instrument(skip_all, fields(bits = bits))]
pub fn generate_rsa_keypair(bits: usize) -> Result<GeneratedKeypair, JwtGenError> {
    let private_key = RsaPrivateKey::new(&mut OsRng, bits).map_err(|e| {
        JwtGenError::KeyGeneration(format!("RSA-{bits} keypair generation failed: {e}"))
    })?;

    let private_key_pem = private_key.to_pkcs1_pem(LineEnding::LF).map_err(|e| {
        JwtGenError::KeyGeneration(format!("Private key PEM encoding failed: {e}"))
    })?;

    let public_key_pem = encode_public_key_pem(&private_key).map_err(|e| {
        JwtGenError::KeyGeneration(format!("Public key PEM encoding failed: {e}"))
    })?;

    Ok(GeneratedKeypair {
        private_key_pem: SecretString::from(private_key_pem.as_str()),
        public_key_pem,
    })
}

/// SPKI `PUBLIC KEY` PEM for the public half of `private_key`
pub fn encode_public_key_pem(
    private_key: &RsaPrivateKey,
) -> Result<String, rsa::pkcs8::spki::Error> {
    RsaPublicKey::from(private_key).to_public_key_pem(LineEnding::LF)
}

/// Parse a PEM private key.
///
/// PKCS#1 (`RSA PRIVATE KEY`) is the format this tool writes; PKCS#8
/// (`PRIVATE KEY`) is accepted as well. The error never echoes the input.
#[instrument(skip_all)]
pub fn parse_rsa_private_key(pem: &SecretString) -> Result<RsaPrivateKey, JwtGenError> {
    let text = pem.expose_secret();

    match RsaPrivateKey::from_pkcs1_pem(text) {
        Ok(key) => Ok(key),
        Err(pkcs1_err) => RsaPrivateKey::from_pkcs8_pem(text).map_err(|pkcs8_err| {
            debug!(
                target: "crypto",
                pem_bytes = text.len(),
                "Private key is neither PKCS#1 nor PKCS#8 PEM"
            );
            JwtGenError::KeyParse(format!(
                "expected a PEM-encoded RSA private key (PKCS#1: {pkcs1_err}; PKCS#8: {pkcs8_err})"
            ))
        }),
    }
}

/// Sign a claim set as a compact RS256 JWT.
///
/// The header is `{"typ":"JWT","alg":"RS256"}`; header and payload are
/// compact JSON, base64url without padding.
#[instrument(skip_all, fields(modulus_bits = private_key.size() * 8))]
pub fn sign_rs256(
    claims: &Map<String, Value>,
    private_key: &RsaPrivateKey,
) -> Result<String, JwtGenError> {
    // jsonwebtoken only takes raw key bytes; the key was parsed earlier so
    // that malformed keys fail at the key-parse stage, not here
    let der = private_key
        .to_pkcs1_der()
        .map_err(|e| JwtGenError::Signing(format!("Private key DER encoding failed: {e}")))?;

    let encoding_key = EncodingKey::from_rsa_der(der.as_bytes());

    let mut header = Header::new(Algorithm::RS256);
    header.typ = Some(TOKEN_TYPE.to_string());

    encode(&header, claims, &encoding_key)
        .map_err(|e| JwtGenError::Signing(format!("RS256 signing operation failed: {e}")))
}

//! JWT constants and compact-serialization helpers.
//!
//! This module provides:
//! - The algorithm, type and reserved claim names the generator emits
//! - RSA key size limits
//! - Decoding of the header and payload segments of a compact JWT
//!
//! # Security
//!
//! The decoders here do NOT check the signature. They exist so callers can
//! inspect a token they just minted; anything that must trust a token has
//! to verify it with the matching public key first.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde_json::{Map, Value};
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// JOSE algorithm name for RSASSA-PKCS1-v1_5 with SHA-256.
pub const SIGNING_ALGORITHM: &str = "RS256";

/// Value of the `typ` header.
pub const TOKEN_TYPE: &str = "JWT";

/// Issued-at claim name (Unix epoch seconds).
pub const CLAIM_ISSUED_AT: &str = "iat";

/// Expiration claim name (Unix epoch seconds).
pub const CLAIM_EXPIRES_AT: &str = "exp";

/// Claims the issuer always sets itself.
pub const RESERVED_CLAIMS: [&str; 2] = [CLAIM_ISSUED_AT, CLAIM_EXPIRES_AT];

/// Separator between claim name and value in `"name:value"` entries.
pub const CLAIM_SEPARATOR: char = ':';

/// Configured token lifetimes are whole minutes.
pub const SECONDS_PER_MINUTE: i64 = 60;

/// Modulus size used when generating a fresh keypair.
pub const DEFAULT_RSA_KEY_BITS: usize = 2048;

/// Smallest modulus accepted for RS256 signing.
pub const MIN_RSA_KEY_BITS: usize = 2048;

/// Returns true if `name` is one of [`RESERVED_CLAIMS`].
#[must_use]
pub fn is_reserved_claim(name: &str) -> bool {
    RESERVED_CLAIMS.contains(&name)
}

// =============================================================================
// Error Types
// =============================================================================

/// Errors from splitting or decoding a compact JWT.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtSegmentError {
    /// Token is not three dot-separated segments.
    #[error("Token must have 3 segments, found {0}")]
    WrongSegmentCount(usize),

    /// A segment is not unpadded base64url.
    #[error("Token {segment} is not valid base64url")]
    InvalidBase64 { segment: &'static str },

    /// A segment does not hold a JSON object.
    #[error("Token {segment} is not a JSON object")]
    InvalidJson { segment: &'static str },
}

// =============================================================================
// Decoding
// =============================================================================

/// The three raw segments of a compact JWT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSegments<'a> {
    pub header: &'a str,
    pub payload: &'a str,
    pub signature: &'a str,
}

/// Split a compact JWT into its three segments.
///
/// # Errors
///
/// Returns `JwtSegmentError::WrongSegmentCount` unless the token has exactly
/// two `.` separators.
pub fn split_token(token: &str) -> Result<TokenSegments<'_>, JwtSegmentError> {
    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(payload), Some(signature), None) => Ok(TokenSegments {
            header,
            payload,
            signature,
        }),
        _ => Err(JwtSegmentError::WrongSegmentCount(token.split('.').count())),
    }
}

fn decode_object(
    segment: &str,
    segment_name: &'static str,
) -> Result<Map<String, Value>, JwtSegmentError> {
    let bytes = URL_SAFE_NO_PAD.decode(segment).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, segment = segment_name, "Failed to decode JWT segment base64");
        JwtSegmentError::InvalidBase64 {
            segment: segment_name,
        }
    })?;

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(JwtSegmentError::InvalidJson {
            segment: segment_name,
        }),
        Err(e) => {
            tracing::debug!(target: "common.jwt", error = %e, segment = segment_name, "Failed to parse JWT segment JSON");
            Err(JwtSegmentError::InvalidJson {
                segment: segment_name,
            })
        }
    }
}

/// Decode the JOSE header of a compact JWT without verifying it.
///
/// # Errors
///
/// Returns a `JwtSegmentError` if the token is not three segments or the
/// header is not base64url-encoded JSON.
pub fn decode_header(token: &str) -> Result<Map<String, Value>, JwtSegmentError> {
    let segments = split_token(token)?;
    decode_object(segments.header, "header")
}

/// Decode the claim set of a compact JWT without verifying it.
///
/// # Errors
///
/// Returns a `JwtSegmentError` if the token is not three segments or the
/// payload is not base64url-encoded JSON.
pub fn decode_payload(token: &str) -> Result<Map<String, Value>, JwtSegmentError> {
    let segments = split_token(token)?;
    decode_object(segments.payload, "payload")
}

use crate::config::{Config, ReservedClaimPolicy};
use crate::crypto;
use crate::errors::JwtGenError;
use chrono::Utc;
use common::jwt::{
    is_reserved_claim, CLAIM_EXPIRES_AT, CLAIM_ISSUED_AT, CLAIM_SEPARATOR, SECONDS_PER_MINUTE,
};
use common::secret::SecretString;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

/// The parts of the configuration that shape a token's payload.
#[derive(Debug, Clone, Copy)]
pub struct ClaimsSpec<'a> {
    /// Token lifetime in whole minutes
    pub expires_minutes: i64,
    /// `"name:value"` strings, applied in order
    pub claims: &'a [String],
    pub reserved_claims: ReservedClaimPolicy,
}

impl<'a> From<&'a Config> for ClaimsSpec<'a> {
    fn from(config: &'a Config) -> Self {
        Self {
            expires_minutes: config.expires,
            claims: &config.claims,
            reserved_claims: config.reserved_claims,
        }
    }
}

/// Issue a signed RS256 token, stamped with the current time
pub fn issue(spec: ClaimsSpec<'_>, private_key_pem: &SecretString) -> Result<String, JwtGenError> {
    issue_at(spec, private_key_pem, Utc::now().timestamp())
}

/// Issue a signed RS256 token as of `now` (Unix seconds).
///
/// Claims are validated before the key is parsed, so a bad claim list
/// fails without touching key material.
#[instrument(skip_all, fields(expires_minutes = spec.expires_minutes, claim_count = spec.claims.len()))]
pub fn issue_at(
    spec: ClaimsSpec<'_>,
    private_key_pem: &SecretString,
    now: i64,
) -> Result<String, JwtGenError> {
    let claims = build_claim_set(spec, now)?;
    let private_key = crypto::parse_rsa_private_key(private_key_pem)?;
    let token = crypto::sign_rs256(&claims, &private_key)?;

    debug!(claims = claims.len(), "Token signed");

    Ok(token)
}

/// Payload for a token issued at `now`: `iat`, `exp`, then each
/// configured claim as a JSON string.
pub fn build_claim_set(spec: ClaimsSpec<'_>, now: i64) -> Result<Map<String, Value>, JwtGenError> {
    let exp = spec
        .expires_minutes
        .checked_mul(SECONDS_PER_MINUTE)
        .and_then(|lifetime| now.checked_add(lifetime))
        .ok_or(JwtGenError::InvalidExpiry(spec.expires_minutes))?;

    let mut claims = Map::new();
    claims.insert(CLAIM_ISSUED_AT.to_string(), Value::from(now));
    claims.insert(CLAIM_EXPIRES_AT.to_string(), Value::from(exp));

    for raw in spec.claims {
        let (name, value) = parse_claim(raw)?;

        if spec.reserved_claims == ReservedClaimPolicy::Reject && is_reserved_claim(name) {
            return Err(JwtGenError::ReservedClaim(name.to_string()));
        }

        claims.insert(name.to_string(), Value::from(value));
    }

    Ok(claims)
}

/// Split `"name:value"` on the separator.
///
/// Exactly one separator is required. Either side may be empty.
pub fn parse_claim(raw: &str) -> Result<(&str, &str), JwtGenError> {
    let mut parts = raw.split(CLAIM_SEPARATOR);

    match (parts.next(), parts.next(), parts.next()) {
        (Some(name), Some(value), None) => Ok((name, value)),
        _ => Err(JwtGenError::ClaimSyntax(raw.to_string())),
    }
}

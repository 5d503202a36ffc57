//! Custom test assertions for issued tokens
//!
//! Provides trait-based assertions over compact JWT strings.

use common::jwt::{decode_header, decode_payload, SIGNING_ALGORITHM, TOKEN_TYPE};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};

/// Custom assertions for issued tokens
///
/// # Example
/// ```rust,ignore
/// token
///     .assert_valid_jwt()
///     .assert_claim("role", "admin")
///     .assert_lifetime(300)
///     .assert_verifies_with(TEST_PUBLIC_KEY_PEM);
/// ```
pub trait TokenAssertions {
    /// Assert three base64url segments with an RS256/JWT header
    fn assert_valid_jwt(&self) -> &Self;

    /// Assert that the payload carries `name` as the string `value`
    fn assert_claim(&self, name: &str, value: &str) -> &Self;

    /// Assert that the payload's claim names are exactly `names`
    fn assert_claim_names(&self, names: &[&str]) -> &Self;

    /// Assert that `exp - iat == seconds`
    fn assert_lifetime(&self, seconds: i64) -> &Self;

    /// Assert that the RS256 signature verifies against `public_key_pem`
    fn assert_verifies_with(&self, public_key_pem: &str) -> &Self;

    /// Assert that the RS256 signature does not verify against `public_key_pem`
    fn assert_not_verified_by(&self, public_key_pem: &str) -> &Self;

    /// Decoded payload, for assertions not covered above
    fn payload(&self) -> Map<String, Value>;
}

fn signature_check(token: &str, public_key_pem: &str) -> Result<(), jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())?;

    // Only the signature is under test; expired tokens still verify
    let mut validation = Validation::new(Algorithm::RS256);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    decode::<Map<String, Value>>(token, &key, &validation).map(|_| ())
}

impl TokenAssertions for String {
    fn assert_valid_jwt(&self) -> &Self {
        let header = decode_header(self)
            .unwrap_or_else(|e| panic!("Token {self:?} is not a well-formed JWT: {e}"));

        assert_eq!(
            header.get("alg"),
            Some(&Value::from(SIGNING_ALGORITHM)),
            "Expected RS256 algorithm"
        );
        assert_eq!(
            header.get("typ"),
            Some(&Value::from(TOKEN_TYPE)),
            "Expected JWT type"
        );

        decode_payload(self).unwrap_or_else(|e| panic!("Token payload is not JSON: {e}"));
        assert!(!self.contains('='), "JWT segments must be unpadded");

        self
    }

    fn assert_claim(&self, name: &str, value: &str) -> &Self {
        let payload = self.payload();
        assert_eq!(
            payload.get(name),
            Some(&Value::from(value)),
            "Claim {name:?} mismatch in payload {payload:?}"
        );
        self
    }

    fn assert_claim_names(&self, names: &[&str]) -> &Self {
        let payload = self.payload();
        let mut actual: Vec<&str> = payload.keys().map(String::as_str).collect();
        let mut expected = names.to_vec();
        actual.sort_unstable();
        expected.sort_unstable();
        assert_eq!(actual, expected, "Unexpected claim names");
        self
    }

    fn assert_lifetime(&self, seconds: i64) -> &Self {
        let payload = self.payload();
        let iat = payload
            .get("iat")
            .and_then(Value::as_i64)
            .expect("iat must be an integer");
        let exp = payload
            .get("exp")
            .and_then(Value::as_i64)
            .expect("exp must be an integer");

        assert_eq!(exp - iat, seconds, "Unexpected token lifetime");
        self
    }

    fn assert_verifies_with(&self, public_key_pem: &str) -> &Self {
        if let Err(e) = signature_check(self, public_key_pem) {
            panic!("Token failed RS256 verification: {e}");
        }
        self
    }

    fn assert_not_verified_by(&self, public_key_pem: &str) -> &Self {
        assert!(
            signature_check(self, public_key_pem).is_err(),
            "Token unexpectedly verified with an unrelated key"
        );
        self
    }

    fn payload(&self) -> Map<String, Value> {
        decode_payload(self).unwrap_or_else(|e| panic!("Failed to decode token payload: {e}"))
    }
}

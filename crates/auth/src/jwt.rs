//! Token codec: signature verification + claims (de)serialization.
//!
//! Temporal validity is checked separately by
//! [`crate::claims::validate_claims`], so the codec disables the JWT
//! library's own registered-claim validation and verifies signatures only.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::claims::AccessClaims;

#[derive(Debug, Error)]
pub enum TokenCodecError {
    #[error("failed to encode token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("failed to decode token: {0}")]
    Decode(#[source] jsonwebtoken::errors::Error),
}

/// Encode/decode boundary for access tokens.
pub trait TokenCodec: Send + Sync {
    fn encode(&self, claims: &AccessClaims) -> Result<String, TokenCodecError>;
    fn decode(&self, token: &str) -> Result<AccessClaims, TokenCodecError>;
}

/// HS256 (shared-secret) token codec.
pub struct Hs256TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl Hs256TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Claims carry RFC3339 timestamps, validated deterministically by
        // validate_claims; the numeric exp/iat checks do not apply.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl TokenCodec for Hs256TokenCodec {
    fn encode(&self, claims: &AccessClaims) -> Result<String, TokenCodecError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(TokenCodecError::Encode)
    }

    fn decode(&self, token: &str) -> Result<AccessClaims, TokenCodecError> {
        jsonwebtoken::decode::<AccessClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenCodecError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn claims() -> AccessClaims {
        let now = Utc::now();
        AccessClaims {
            sub: "U1".into(),
            role: Role::industry(),
            jti: Uuid::now_v7(),
            issued_at: now,
            expires_at: now + Duration::minutes(10),
        }
    }

    #[test]
    fn encode_decode_round_trips() {
        let codec = Hs256TokenCodec::new(b"test-secret");
        let original = claims();

        let token = codec.encode(&original).unwrap();
        let decoded = codec.decode(&token).unwrap();

        assert_eq!(decoded, original);
    }

    #[test]
    fn wrong_secret_fails_signature_check() {
        let codec = Hs256TokenCodec::new(b"test-secret");
        let other = Hs256TokenCodec::new(b"other-secret");

        let token = codec.encode(&claims()).unwrap();
        assert!(matches!(
            other.decode(&token),
            Err(TokenCodecError::Decode(_))
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        let codec = Hs256TokenCodec::new(b"test-secret");
        assert!(codec.decode("not.a.token").is_err());
    }
}

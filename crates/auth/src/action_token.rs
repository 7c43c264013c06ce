//! One-shot action tokens for out-of-band flows.
//!
//! The surrounding application emails these to users for account
//! verification and password reset. Tokens are purpose-bound: a password
//! reset token cannot be redeemed as an email verification and vice versa.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use carbonharvest_core::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    EmailVerification,
    PasswordReset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionClaims {
    pub sub: UserId,
    pub purpose: TokenPurpose,
    pub jti: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum ActionTokenError {
    #[error("action token has expired")]
    Expired,

    #[error("action token purpose mismatch")]
    PurposeMismatch,

    #[error("malformed or tampered action token: {0}")]
    Codec(#[source] jsonwebtoken::errors::Error),
}

/// Issues and redeems purpose-bound, short-lived tokens.
pub struct ActionTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl ActionTokenService {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn issue(
        &self,
        user: UserId,
        purpose: TokenPurpose,
        now: DateTime<Utc>,
    ) -> Result<String, ActionTokenError> {
        let claims = ActionClaims {
            sub: user,
            purpose,
            jti: Uuid::now_v7(),
            issued_at: now,
            expires_at: now + self.ttl,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(ActionTokenError::Codec)
    }

    /// Verify signature, purpose, and expiry; return the claims on success.
    pub fn redeem(
        &self,
        token: &str,
        expected: TokenPurpose,
        now: DateTime<Utc>,
    ) -> Result<ActionClaims, ActionTokenError> {
        let claims = jsonwebtoken::decode::<ActionClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(ActionTokenError::Codec)?;

        if claims.purpose != expected {
            return Err(ActionTokenError::PurposeMismatch);
        }
        if now >= claims.expires_at {
            return Err(ActionTokenError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> ActionTokenService {
        ActionTokenService::new(b"test-secret", Duration::minutes(30))
    }

    #[test]
    fn issue_then_redeem_round_trips() {
        let svc = service();
        let now = Utc::now();

        let token = svc
            .issue("U1".into(), TokenPurpose::EmailVerification, now)
            .unwrap();
        let claims = svc
            .redeem(&token, TokenPurpose::EmailVerification, now)
            .unwrap();

        assert_eq!(claims.sub, "U1".into());
    }

    #[test]
    fn purpose_mismatch_is_rejected() {
        let svc = service();
        let now = Utc::now();

        let token = svc
            .issue("U1".into(), TokenPurpose::PasswordReset, now)
            .unwrap();

        assert!(matches!(
            svc.redeem(&token, TokenPurpose::EmailVerification, now),
            Err(ActionTokenError::PurposeMismatch)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = service();
        let issued = Utc::now();

        let token = svc
            .issue("U1".into(), TokenPurpose::PasswordReset, issued)
            .unwrap();

        let later = issued + Duration::hours(2);
        assert!(matches!(
            svc.redeem(&token, TokenPurpose::PasswordReset, later),
            Err(ActionTokenError::Expired)
        ));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let svc = service();
        let other = ActionTokenService::new(b"other-secret", Duration::minutes(30));
        let now = Utc::now();

        let token = other
            .issue("U1".into(), TokenPurpose::PasswordReset, now)
            .unwrap();

        assert!(matches!(
            svc.redeem(&token, TokenPurpose::PasswordReset, now),
            Err(ActionTokenError::Codec(_))
        ));
    }
}

//! Ledger user record and its operation requests.
//!
//! A user here is a ledger identity (key material + role category), not an
//! authentication account; login, sessions, and email verification live in
//! the surrounding application.

use serde::{Deserialize, Serialize};

use carbonharvest_core::{LedgerError, LedgerResult, UserId};

/// A participant able to hold, trade, or retire credits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub public_key: String,
    /// Role category: "farmer", "industry", or "regulator". Opaque at this
    /// layer; the API maps it to permissions.
    pub role: String,
}

impl User {
    pub fn register(req: RegisterUser) -> LedgerResult<Self> {
        req.validate()?;
        Ok(Self {
            user_id: req.user_id,
            public_key: req.public_key,
            role: req.role,
        })
    }

    /// Overwrite the mutable fields from an update request. The stored
    /// `user_id` is not on the list.
    pub fn apply_update(&mut self, req: UpdateUser) {
        self.public_key = req.public_key;
        self.role = req.role;
    }
}

/// Request: register a ledger user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterUser {
    pub user_id: UserId,
    pub public_key: String,
    pub role: String,
}

impl RegisterUser {
    pub fn validate(&self) -> LedgerResult<()> {
        if self.user_id.is_blank() {
            return Err(LedgerError::validation("user_id is required"));
        }
        validate_user_fields(&self.public_key, &self.role)
    }
}

/// Request: full overwrite of a user's mutable fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUser {
    pub user_id: UserId,
    pub public_key: String,
    pub role: String,
}

impl UpdateUser {
    pub fn validate(&self) -> LedgerResult<()> {
        if self.user_id.is_blank() {
            return Err(LedgerError::validation("user_id is required"));
        }
        validate_user_fields(&self.public_key, &self.role)
    }
}

fn validate_user_fields(public_key: &str, role: &str) -> LedgerResult<()> {
    if public_key.trim().is_empty() {
        return Err(LedgerError::validation("public_key is required"));
    }
    if role.trim().is_empty() {
        return Err(LedgerError::validation("role is required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_requires_every_field() {
        let req = RegisterUser {
            user_id: "U1".into(),
            public_key: "mk-9f2c".to_string(),
            role: "farmer".to_string(),
        };
        assert!(User::register(req).is_ok());

        let req = RegisterUser {
            user_id: "U1".into(),
            public_key: String::new(),
            role: "farmer".to_string(),
        };
        assert!(matches!(
            User::register(req),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn update_keeps_the_stored_identity() {
        let mut user = User::register(RegisterUser {
            user_id: "U1".into(),
            public_key: "mk-9f2c".to_string(),
            role: "farmer".to_string(),
        })
        .unwrap();

        user.apply_update(UpdateUser {
            user_id: "U2".into(),
            public_key: "mk-0a11".to_string(),
            role: "industry".to_string(),
        });

        assert_eq!(user.user_id, "U1".into());
        assert_eq!(user.role, "industry");
    }
}

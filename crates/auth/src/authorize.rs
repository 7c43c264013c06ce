use thiserror::Error;

use carbonharvest_core::UserId;

use crate::{Permission, Role, role_permissions};

/// A fully resolved principal for authorization decisions.
///
/// Construction is decoupled from transport: the API middleware derives one
/// from verified token claims; tests build them directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub role: Role,
}

impl Principal {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Effective permissions derived from the principal's role.
    pub fn permissions(&self) -> Vec<Permission> {
        role_permissions(self.role.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Request-side authorization contract (checked at the API boundary).
///
/// Implement this on request wrappers that require permissions; the API
/// layer enforces the requirements before calling the ledger.
pub trait CommandAuthorization {
    fn required_permissions(&self) -> &[Permission];
}

/// Authorize a principal for a single permission.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
    let perms = principal.permissions();

    if perms
        .iter()
        .any(|p| p.is_wildcard() || p.as_str() == required.as_str())
    {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regulator_is_authorized_for_everything() {
        let p = Principal::new("R1".into(), Role::regulator());
        assert!(authorize(&p, &Permission::new("credits.issue")).is_ok());
        assert!(authorize(&p, &Permission::new("anything.at.all")).is_ok());
    }

    #[test]
    fn industry_cannot_issue_credits() {
        let p = Principal::new("I1".into(), Role::industry());
        let err = authorize(&p, &Permission::new("credits.issue")).unwrap_err();
        assert_eq!(err, AuthzError::Forbidden("credits.issue".to_string()));
    }

    #[test]
    fn farmer_can_issue_and_transfer() {
        let p = Principal::new("F1".into(), Role::farmer());
        assert!(authorize(&p, &Permission::new("credits.issue")).is_ok());
        assert!(authorize(&p, &Permission::new("credits.transfer")).is_ok());
    }
}

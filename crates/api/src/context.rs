use carbonharvest_auth::Role;
use carbonharvest_core::UserId;

/// Authenticated caller identity, derived from verified token claims by the
/// auth middleware and attached to the request as an extension.
#[derive(Debug, Clone)]
pub struct PrincipalContext {
    user_id: UserId,
    role: Role,
}

impl PrincipalContext {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn role(&self) -> &Role {
        &self.role
    }
}

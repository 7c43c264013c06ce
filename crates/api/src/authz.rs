use carbonharvest_auth::{AuthzError, CommandAuthorization, Principal, authorize};

use crate::context::PrincipalContext;

/// Enforce a request's permission requirements before it reaches the ledger.
///
/// This is route-level policy only; the ledger still applies its own
/// owner-of-record checks afterwards.
pub fn authorize_command(
    principal: &PrincipalContext,
    cmd: &impl CommandAuthorization,
) -> Result<(), AuthzError> {
    let resolved = Principal::new(principal.user_id().clone(), principal.role().clone());

    for required in cmd.required_permissions() {
        authorize(&resolved, required)?;
    }

    Ok(())
}

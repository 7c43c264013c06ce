use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are modeled as opaque strings (e.g. "credits.issue").
/// A special wildcard permission `"*"` can be used by policy layers to
/// indicate "allow all" without hardcoding domain permissions into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Permissions granted to a role.
///
/// Regulators hold the wildcard. Verification is deliberately granted to
/// every role: the ledger itself performs no ownership check on
/// verification, and this mapping is the place integrators tighten that.
pub fn role_permissions(role: &str) -> Vec<Permission> {
    match role {
        "regulator" => vec![Permission::new("*")],
        "farmer" => vec![
            Permission::new("credits.issue"),
            Permission::new("credits.transfer"),
            Permission::new("credits.retire"),
            Permission::new("credits.verify"),
            Permission::new("credits.read"),
            Permission::new("projects.create"),
            Permission::new("projects.update"),
            Permission::new("projects.read"),
            Permission::new("users.update"),
            Permission::new("users.read"),
        ],
        "industry" => vec![
            Permission::new("credits.transfer"),
            Permission::new("credits.retire"),
            Permission::new("credits.verify"),
            Permission::new("credits.read"),
            Permission::new("projects.read"),
            Permission::new("users.update"),
            Permission::new("users.read"),
        ],
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regulator_holds_the_wildcard() {
        let perms = role_permissions("regulator");
        assert!(perms.iter().any(|p| p.is_wildcard()));
    }

    #[test]
    fn unknown_roles_get_nothing() {
        assert!(role_permissions("intruder").is_empty());
    }

    #[test]
    fn farmers_can_issue_but_industries_cannot() {
        let has = |role: &str, perm: &str| {
            role_permissions(role).iter().any(|p| p.as_str() == perm)
        };

        assert!(has("farmer", "credits.issue"));
        assert!(!has("industry", "credits.issue"));
        assert!(has("industry", "credits.retire"));
    }
}

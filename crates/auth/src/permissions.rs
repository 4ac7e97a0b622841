use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::RoleName;

/// Permission identifier.
///
/// Permissions are opaque strings (e.g. `"roles.manage"`). The wildcard `"*"`
/// grants everything within the tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const WILDCARD: Permission = Permission(Cow::Borrowed("*"));
    pub const ROLES_MANAGE: Permission = Permission(Cow::Borrowed("roles.manage"));
    pub const MODULES_MANAGE: Permission = Permission(Cow::Borrowed("modules.manage"));
    pub const DEPARTMENTS_MANAGE: Permission = Permission(Cow::Borrowed("departments.manage"));
    pub const OCCUPANCY_RECORD: Permission = Permission(Cow::Borrowed("occupancy.record"));
    pub const OCCUPANCY_VIEW: Permission = Permission(Cow::Borrowed("occupancy.view"));
    pub const OCCUPANCY_CONFIGURE: Permission = Permission(Cow::Borrowed("occupancy.configure"));

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

/// Static role → permission policy.
///
/// - `admin`: everything
/// - `security`: record and view occupancy
/// - `operator`: view occupancy
pub fn permissions_for_roles(roles: &[RoleName]) -> Vec<Permission> {
    let mut out = Vec::new();
    for role in roles {
        let granted = match role.as_str() {
            "admin" => vec![Permission::WILDCARD],
            "security" => vec![Permission::OCCUPANCY_RECORD, Permission::OCCUPANCY_VIEW],
            "operator" => vec![Permission::OCCUPANCY_VIEW],
            _ => Vec::new(),
        };
        for perm in granted {
            if !out.contains(&perm) {
                out.push(perm);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_maps_to_wildcard() {
        let perms = permissions_for_roles(&[RoleName::ADMIN]);
        assert_eq!(perms, vec![Permission::WILDCARD]);
    }

    #[test]
    fn overlapping_roles_do_not_duplicate_permissions() {
        let perms = permissions_for_roles(&[RoleName::SECURITY, RoleName::new("operator")]);
        assert_eq!(perms, vec![Permission::OCCUPANCY_RECORD, Permission::OCCUPANCY_VIEW]);
    }

    #[test]
    fn unknown_roles_grant_nothing() {
        assert!(permissions_for_roles(&[RoleName::new("visitor")]).is_empty());
    }
}

//! Per-request caller identity, attached by [`crate::middleware::auth_middleware`].
//!
//! Every store call in a handler is keyed by [`TenantContext`]; the facility a
//! request reads or mutates is always the one named in the bearer token.

use facilityhub_auth::{JwtClaims, Permission, PrincipalId, RoleName, permissions_for_roles};
use facilityhub_core::TenantId;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TenantContext {
    tenant_id: TenantId,
}

impl TenantContext {
    pub fn new(tenant_id: TenantId) -> Self {
        Self { tenant_id }
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

/// Staff member behind the token. Permissions are resolved from the access
/// roles once per request, so guards never re-derive the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal_id: PrincipalId,
    roles: Vec<RoleName>,
    permissions: Vec<Permission>,
}

impl PrincipalContext {
    pub fn new(principal_id: PrincipalId, roles: Vec<RoleName>) -> Self {
        let permissions = permissions_for_roles(&roles);
        Self {
            principal_id,
            roles,
            permissions,
        }
    }

    pub fn from_claims(claims: &JwtClaims) -> (TenantContext, Self) {
        (
            TenantContext::new(claims.tenant_id),
            Self::new(claims.sub, claims.roles.clone()),
        )
    }

    pub fn principal_id(&self) -> PrincipalId {
        self.principal_id
    }

    pub fn roles(&self) -> &[RoleName] {
        &self.roles
    }

    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }
}

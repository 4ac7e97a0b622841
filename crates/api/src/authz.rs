//! Permission guard applied by handlers before touching any store.

use facilityhub_auth::{AuthzError, Permission, Principal, TenantMembership, authorize};

use crate::context::{PrincipalContext, TenantContext};

pub fn require_permission(
    tenant: &TenantContext,
    principal: &PrincipalContext,
    required: &Permission,
) -> Result<(), AuthzError> {
    let membership = TenantMembership {
        tenant_id: tenant.tenant_id(),
        roles: principal.roles().to_vec(),
        permissions: principal.permissions().to_vec(),
    };

    let principal = Principal {
        principal_id: principal.principal_id(),
        active_tenant_id: tenant.tenant_id(),
        membership,
    };

    authorize(&principal, required)
}

#[cfg(test)]
mod tests {
    use facilityhub_auth::{PrincipalId, RoleName};
    use facilityhub_core::TenantId;

    use super::*;

    fn ctx(roles: Vec<RoleName>) -> (TenantContext, PrincipalContext) {
        (
            TenantContext::new(TenantId::new()),
            PrincipalContext::new(PrincipalId::new(), roles),
        )
    }

    #[test]
    fn admin_passes_every_guard() {
        let (t, p) = ctx(vec![RoleName::ADMIN]);
        assert!(require_permission(&t, &p, &Permission::ROLES_MANAGE).is_ok());
        assert!(require_permission(&t, &p, &Permission::OCCUPANCY_CONFIGURE).is_ok());
    }

    #[test]
    fn security_cannot_manage_roles() {
        let (t, p) = ctx(vec![RoleName::SECURITY]);
        assert!(require_permission(&t, &p, &Permission::OCCUPANCY_RECORD).is_ok());
        assert_eq!(
            require_permission(&t, &p, &Permission::ROLES_MANAGE),
            Err(AuthzError::Forbidden("roles.manage".to_string()))
        );
    }
}

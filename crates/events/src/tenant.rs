use facilityhub_core::TenantId;

use crate::BroadcastMessage;

/// Messages that belong to exactly one tenant.
///
/// Stream handlers use this to drop messages for other tenants before they
/// reach a subscriber.
pub trait TenantScoped {
    fn tenant_id(&self) -> TenantId;
}

impl TenantScoped for BroadcastMessage {
    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

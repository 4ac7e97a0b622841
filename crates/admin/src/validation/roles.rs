use std::collections::BTreeSet;

use facilityhub_core::{RoleId, TenantId};

use super::{Rule, RuleSet, Validator};
use crate::repository::{ModuleRepository, RoleRepository};
use crate::role::{ROLE_DESCRIPTION_MAX, ROLE_NAME_MAX};

fn role_rules(ignore: Option<RoleId>, module_codes: BTreeSet<String>) -> RuleSet {
    RuleSet::new()
        .field(
            "name",
            vec![
                Rule::Required,
                Rule::String,
                Rule::Max(ROLE_NAME_MAX),
                Rule::Unique {
                    ignore: ignore.map(u64::from),
                },
            ],
        )
        .field(
            "description",
            vec![Rule::Nullable, Rule::String, Rule::Max(ROLE_DESCRIPTION_MAX)],
        )
        .field("module_codes", vec![Rule::Nullable, Rule::Array])
        .field("module_codes.*", vec![Rule::In(module_codes)])
}

fn role_name_holder(
    roles: &dyn RoleRepository,
    tenant_id: TenantId,
    field: &str,
    value: &str,
) -> Option<u64> {
    match field {
        "name" => roles.find_by_name(tenant_id, value).map(|r| r.id.get()),
        _ => None,
    }
}

/// Rules for creating a role.
pub struct StoreRole<'a> {
    tenant_id: TenantId,
    roles: &'a dyn RoleRepository,
    modules: &'a dyn ModuleRepository,
}

impl<'a> StoreRole<'a> {
    pub fn new(
        tenant_id: TenantId,
        roles: &'a dyn RoleRepository,
        modules: &'a dyn ModuleRepository,
    ) -> Self {
        Self {
            tenant_id,
            roles,
            modules,
        }
    }
}

impl Validator for StoreRole<'_> {
    fn rules(&self) -> RuleSet {
        let codes = self.modules.codes(self.tenant_id).into_iter().collect();
        role_rules(None, codes)
    }

    fn unique_holder(&self, field: &str, value: &str) -> Option<u64> {
        role_name_holder(self.roles, self.tenant_id, field, value)
    }
}

/// Rules for updating the role identified by the route.
///
/// The name stays unique across the tenant, except that the role being edited
/// may keep its own name.
pub struct UpdateRole<'a> {
    tenant_id: TenantId,
    role_id: RoleId,
    roles: &'a dyn RoleRepository,
    modules: &'a dyn ModuleRepository,
}

impl<'a> UpdateRole<'a> {
    pub fn new(
        tenant_id: TenantId,
        role_id: RoleId,
        roles: &'a dyn RoleRepository,
        modules: &'a dyn ModuleRepository,
    ) -> Self {
        Self {
            tenant_id,
            role_id,
            roles,
            modules,
        }
    }
}

impl Validator for UpdateRole<'_> {
    fn rules(&self) -> RuleSet {
        let codes = self.modules.codes(self.tenant_id).into_iter().collect();
        role_rules(Some(self.role_id), codes)
    }

    fn unique_holder(&self, field: &str, value: &str) -> Option<u64> {
        role_name_holder(self.roles, self.tenant_id, field, value)
    }
}

use facilityhub_core::TenantId;

use super::{Rule, RuleSet, Validator};
use crate::module::{MODULE_CODE_MAX, MODULE_NAME_MAX};
use crate::repository::ModuleRepository;

/// Rules for registering a module code.
pub struct StoreModule<'a> {
    tenant_id: TenantId,
    modules: &'a dyn ModuleRepository,
}

impl<'a> StoreModule<'a> {
    pub fn new(tenant_id: TenantId, modules: &'a dyn ModuleRepository) -> Self {
        Self { tenant_id, modules }
    }
}

impl Validator for StoreModule<'_> {
    fn rules(&self) -> RuleSet {
        RuleSet::new()
            .field(
                "code",
                vec![
                    Rule::Required,
                    Rule::String,
                    Rule::Max(MODULE_CODE_MAX),
                    Rule::Unique { ignore: None },
                ],
            )
            .field("name", vec![Rule::Required, Rule::String, Rule::Max(MODULE_NAME_MAX)])
    }

    // Modules are keyed by code, so any holder is a conflict.
    fn unique_holder(&self, field: &str, value: &str) -> Option<u64> {
        match field {
            "code" => self.modules.get(self.tenant_id, value).map(|_| 0),
            _ => None,
        }
    }
}

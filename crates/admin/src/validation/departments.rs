use facilityhub_core::{DepartmentId, TenantId};

use super::{Rule, RuleSet, Validator};
use crate::department::{DEPARTMENT_DESCRIPTION_MAX, DEPARTMENT_NAME_MAX};
use crate::repository::DepartmentRepository;

fn department_rules(ignore: Option<DepartmentId>) -> RuleSet {
    RuleSet::new()
        .field(
            "name",
            vec![
                Rule::Required,
                Rule::String,
                Rule::Max(DEPARTMENT_NAME_MAX),
                Rule::Unique {
                    ignore: ignore.map(u64::from),
                },
            ],
        )
        .field(
            "description",
            vec![Rule::Nullable, Rule::String, Rule::Max(DEPARTMENT_DESCRIPTION_MAX)],
        )
}

pub struct StoreDepartment<'a> {
    tenant_id: TenantId,
    departments: &'a dyn DepartmentRepository,
}

impl<'a> StoreDepartment<'a> {
    pub fn new(tenant_id: TenantId, departments: &'a dyn DepartmentRepository) -> Self {
        Self {
            tenant_id,
            departments,
        }
    }
}

impl Validator for StoreDepartment<'_> {
    fn rules(&self) -> RuleSet {
        department_rules(None)
    }

    fn unique_holder(&self, field: &str, value: &str) -> Option<u64> {
        (field == "name")
            .then(|| self.departments.find_by_name(self.tenant_id, value))
            .flatten()
            .map(|d| d.id.get())
    }
}

pub struct UpdateDepartment<'a> {
    tenant_id: TenantId,
    department_id: DepartmentId,
    departments: &'a dyn DepartmentRepository,
}

impl<'a> UpdateDepartment<'a> {
    pub fn new(
        tenant_id: TenantId,
        department_id: DepartmentId,
        departments: &'a dyn DepartmentRepository,
    ) -> Self {
        Self {
            tenant_id,
            department_id,
            departments,
        }
    }
}

impl Validator for UpdateDepartment<'_> {
    fn rules(&self) -> RuleSet {
        department_rules(Some(self.department_id))
    }

    fn unique_holder(&self, field: &str, value: &str) -> Option<u64> {
        (field == "name")
            .then(|| self.departments.find_by_name(self.tenant_id, value))
            .flatten()
            .map(|d| d.id.get())
    }
}

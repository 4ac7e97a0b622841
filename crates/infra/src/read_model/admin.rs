//! In-memory repositories for roles, modules and departments.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use facilityhub_admin::{
    Department, DepartmentRepository, Module, ModuleRepository, Role, RoleRepository,
};
use facilityhub_core::{DepartmentId, DomainError, RoleId, TenantId};

use super::tenant_store::{InMemoryTenantStore, TenantStore};

/// Ids are global across tenants, like an auto-increment column.
#[derive(Debug, Default)]
pub struct InMemoryRoleStore {
    rows: InMemoryTenantStore<RoleId, Role>,
    last_id: AtomicU64,
}

impl InMemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoleRepository for InMemoryRoleStore {
    fn next_id(&self) -> RoleId {
        RoleId::new(self.last_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn get(&self, tenant_id: TenantId, id: RoleId) -> Option<Role> {
        self.rows.get(tenant_id, &id)
    }

    fn find_by_name(&self, tenant_id: TenantId, name: &str) -> Option<Role> {
        self.rows
            .list(tenant_id)
            .into_iter()
            .find(|r| r.name == name)
    }

    fn list(&self, tenant_id: TenantId) -> Vec<Role> {
        self.rows.list(tenant_id)
    }

    fn save(&self, tenant_id: TenantId, role: Role) -> Result<(), DomainError> {
        let (id, name) = (role.id, role.name.clone());
        let taken = |other: &RoleId, r: &Role| *other != id && r.name == name;
        if self.rows.upsert_unless(tenant_id, id, role, &taken) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!("role name {name:?} is already taken")))
        }
    }

    fn delete(&self, tenant_id: TenantId, id: RoleId) -> Option<Role> {
        self.rows.remove(tenant_id, &id)
    }
}

/// Module registry. Each tenant starts with the configured seed codes.
#[derive(Debug, Default)]
pub struct InMemoryModuleStore {
    rows: InMemoryTenantStore<String, Module>,
    seed: Vec<String>,
    seeded: Mutex<HashSet<TenantId>>,
}

impl InMemoryModuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: Vec<String>) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    fn ensure_seeded(&self, tenant_id: TenantId) {
        if self.seed.is_empty() {
            return;
        }
        let Ok(mut seeded) = self.seeded.lock() else {
            return;
        };
        if !seeded.insert(tenant_id) {
            return;
        }
        let now = Utc::now();
        for code in &self.seed {
            self.rows.upsert(
                tenant_id,
                code.clone(),
                Module {
                    code: code.clone(),
                    name: code.clone(),
                    created_at: now,
                },
            );
        }
        tracing::debug!(tenant_id = %tenant_id, count = self.seed.len(), "seeded modules");
    }
}

impl ModuleRepository for InMemoryModuleStore {
    fn codes(&self, tenant_id: TenantId) -> Vec<String> {
        self.list(tenant_id).into_iter().map(|m| m.code).collect()
    }

    fn get(&self, tenant_id: TenantId, code: &str) -> Option<Module> {
        self.ensure_seeded(tenant_id);
        self.rows.get(tenant_id, &code.to_string())
    }

    fn list(&self, tenant_id: TenantId) -> Vec<Module> {
        self.ensure_seeded(tenant_id);
        self.rows.list(tenant_id)
    }

    fn save(&self, tenant_id: TenantId, module: Module) -> Result<(), DomainError> {
        self.ensure_seeded(tenant_id);
        let code = module.code.clone();
        let taken = |other: &String, _: &Module| *other == code;
        if self.rows.upsert_unless(tenant_id, code.clone(), module, &taken) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!("module code {code:?} is already registered")))
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryDepartmentStore {
    rows: InMemoryTenantStore<DepartmentId, Department>,
    last_id: AtomicU64,
}

impl InMemoryDepartmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DepartmentRepository for InMemoryDepartmentStore {
    fn next_id(&self) -> DepartmentId {
        DepartmentId::new(self.last_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn get(&self, tenant_id: TenantId, id: DepartmentId) -> Option<Department> {
        self.rows.get(tenant_id, &id)
    }

    fn find_by_name(&self, tenant_id: TenantId, name: &str) -> Option<Department> {
        self.rows
            .list(tenant_id)
            .into_iter()
            .find(|d| d.name == name)
    }

    fn list(&self, tenant_id: TenantId) -> Vec<Department> {
        self.rows.list(tenant_id)
    }

    fn save(&self, tenant_id: TenantId, department: Department) -> Result<(), DomainError> {
        let (id, name) = (department.id, department.name.clone());
        let taken = |other: &DepartmentId, d: &Department| *other != id && d.name == name;
        if self.rows.upsert_unless(tenant_id, id, department, &taken) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!("department name {name:?} is already taken")))
        }
    }

    fn delete(&self, tenant_id: TenantId, id: DepartmentId) -> Option<Department> {
        self.rows.remove(tenant_id, &id)
    }
}

#[cfg(test)]
mod tests {
    use facilityhub_admin::AdminError;
    use facilityhub_admin::service;
    use serde_json::json;

    use super::*;

    fn stores() -> (InMemoryRoleStore, InMemoryModuleStore) {
        (
            InMemoryRoleStore::new(),
            InMemoryModuleStore::with_seed(vec!["ZCS".to_string(), "HBR".to_string()]),
        )
    }

    #[test]
    fn modules_are_seeded_per_tenant() {
        let modules = InMemoryModuleStore::with_seed(vec!["ZCS".to_string(), "HBR".to_string()]);
        let tenant = TenantId::new();
        assert_eq!(modules.codes(tenant), vec!["HBR", "ZCS"]);
        assert!(modules.get(TenantId::new(), "ZCS").is_some());
    }

    #[test]
    fn create_role_persists_and_dedups_codes() {
        let (roles, modules) = stores();
        let tenant = TenantId::new();

        let role = service::create_role(
            &roles,
            &modules,
            tenant,
            &json!({ "name": "Security", "module_codes": ["ZCS", "ZCS", "HBR"] }),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(role.id, RoleId::new(1));
        assert_eq!(role.module_codes.len(), 2);
        assert_eq!(roles.get(tenant, role.id), Some(role));
    }

    #[test]
    fn create_role_rejects_unknown_module_at_its_index() {
        let (roles, modules) = stores();
        let err = service::create_role(
            &roles,
            &modules,
            TenantId::new(),
            &json!({ "name": "Security", "module_codes": ["ZCS", "XYZ"] }),
            Utc::now(),
        )
        .unwrap_err();

        let AdminError::Validation(errors) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get("module_codes.1").unwrap(),
            &["The selected module codes.1 is invalid.".to_string()]
        );
    }

    #[test]
    fn role_names_are_unique_per_tenant_only() {
        let (roles, modules) = stores();
        let a = TenantId::new();
        let b = TenantId::new();
        let payload = json!({ "name": "Finance" });

        service::create_role(&roles, &modules, a, &payload, Utc::now()).unwrap();
        assert!(service::create_role(&roles, &modules, a, &payload, Utc::now()).is_err());
        assert!(service::create_role(&roles, &modules, b, &payload, Utc::now()).is_ok());
    }

    /// Parks every name lookup at a barrier so both creates validate before either saves.
    struct GatedRoles {
        inner: InMemoryRoleStore,
        gate: std::sync::Barrier,
    }

    impl RoleRepository for GatedRoles {
        fn next_id(&self) -> RoleId {
            self.inner.next_id()
        }
        fn get(&self, tenant_id: TenantId, id: RoleId) -> Option<Role> {
            self.inner.get(tenant_id, id)
        }
        fn find_by_name(&self, tenant_id: TenantId, name: &str) -> Option<Role> {
            self.gate.wait();
            self.inner.find_by_name(tenant_id, name)
        }
        fn list(&self, tenant_id: TenantId) -> Vec<Role> {
            self.inner.list(tenant_id)
        }
        fn save(&self, tenant_id: TenantId, role: Role) -> Result<(), DomainError> {
            self.inner.save(tenant_id, role)
        }
        fn delete(&self, tenant_id: TenantId, id: RoleId) -> Option<Role> {
            self.inner.delete(tenant_id, id)
        }
    }

    #[test]
    fn concurrent_creates_keep_role_names_unique() {
        let roles = GatedRoles {
            inner: InMemoryRoleStore::new(),
            gate: std::sync::Barrier::new(2),
        };
        let modules = InMemoryModuleStore::new();
        let tenant = TenantId::new();
        let payload = json!({ "name": "Finance" });

        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..2)
                .map(|_| {
                    scope.spawn(|| {
                        service::create_role(&roles, &modules, tenant, &payload, Utc::now())
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results.iter().any(|r| matches!(
            r,
            Err(AdminError::Domain(DomainError::Conflict(_)))
        )));
        assert_eq!(roles.inner.list(tenant).len(), 1);
    }

    #[test]
    fn renaming_onto_a_taken_name_conflicts_at_the_store() {
        let departments = InMemoryDepartmentStore::new();
        let tenant = TenantId::new();
        let ops = service::create_department(&departments, tenant, &json!({ "name": "Operations" }), Utc::now())
            .unwrap();
        let mut hr = service::create_department(&departments, tenant, &json!({ "name": "HR" }), Utc::now())
            .unwrap();

        hr.name = ops.name.clone();
        assert!(matches!(
            departments.save(tenant, hr),
            Err(DomainError::Conflict(_))
        ));
        assert!(departments.save(tenant, ops).is_ok());
    }

    #[test]
    fn update_and_delete_role() {
        let (roles, modules) = stores();
        let tenant = TenantId::new();
        let role = service::create_role(
            &roles,
            &modules,
            tenant,
            &json!({ "name": "Finance", "module_codes": ["ZCS"] }),
            Utc::now(),
        )
        .unwrap();

        let updated = service::update_role(
            &roles,
            &modules,
            tenant,
            role.id,
            &json!({ "name": "Finance", "description": "Books" }),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(updated.description.as_deref(), Some("Books"));
        assert!(updated.module_codes.contains("ZCS"));

        service::delete_role(&roles, tenant, role.id).unwrap();
        assert!(matches!(
            service::delete_role(&roles, tenant, role.id),
            Err(AdminError::NotFound)
        ));
    }

    #[test]
    fn department_lifecycle() {
        let departments = InMemoryDepartmentStore::new();
        let tenant = TenantId::new();

        let d = service::create_department(
            &departments,
            tenant,
            &json!({ "name": "Operations" }),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(departments.list(tenant).len(), 1);

        assert!(matches!(
            service::create_department(&departments, tenant, &json!({ "name": "Operations" }), Utc::now()),
            Err(AdminError::Validation(_))
        ));

        service::delete_department(&departments, tenant, d.id).unwrap();
        assert!(departments.list(tenant).is_empty());
    }

    #[test]
    fn module_codes_must_be_unique() {
        let (_, modules) = stores();
        let tenant = TenantId::new();
        let err = service::create_module(
            &modules,
            tenant,
            &json!({ "code": "ZCS", "name": "Zone Control" }),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, AdminError::Validation(_)));

        service::create_module(&modules, tenant, &json!({ "code": "PRK", "name": "Parking" }), Utc::now())
            .unwrap();
        assert!(modules.codes(tenant).contains(&"PRK".to_string()));
    }
}

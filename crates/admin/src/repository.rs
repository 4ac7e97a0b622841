//! Storage contracts for admin records.
//!
//! Every call is tenant-scoped; implementations must never return records of
//! another tenant. `save` re-checks uniqueness atomically with the write and
//! fails with `DomainError::Conflict` when another record holds the name.

use facilityhub_core::{DepartmentId, DomainError, RoleId, TenantId};

use crate::{Department, Module, Role};

pub trait RoleRepository: Send + Sync {
    fn next_id(&self) -> RoleId;
    fn get(&self, tenant_id: TenantId, id: RoleId) -> Option<Role>;
    fn find_by_name(&self, tenant_id: TenantId, name: &str) -> Option<Role>;
    fn list(&self, tenant_id: TenantId) -> Vec<Role>;
    fn save(&self, tenant_id: TenantId, role: Role) -> Result<(), DomainError>;
    fn delete(&self, tenant_id: TenantId, id: RoleId) -> Option<Role>;
}

pub trait ModuleRepository: Send + Sync {
    /// All registered module codes. Read on every validation call.
    fn codes(&self, tenant_id: TenantId) -> Vec<String>;
    fn get(&self, tenant_id: TenantId, code: &str) -> Option<Module>;
    fn list(&self, tenant_id: TenantId) -> Vec<Module>;
    /// Registers a new code; an existing code is a conflict.
    fn save(&self, tenant_id: TenantId, module: Module) -> Result<(), DomainError>;
}

pub trait DepartmentRepository: Send + Sync {
    fn next_id(&self) -> DepartmentId;
    fn get(&self, tenant_id: TenantId, id: DepartmentId) -> Option<Department>;
    fn find_by_name(&self, tenant_id: TenantId, name: &str) -> Option<Department>;
    fn list(&self, tenant_id: TenantId) -> Vec<Department>;
    fn save(&self, tenant_id: TenantId, department: Department) -> Result<(), DomainError>;
    fn delete(&self, tenant_id: TenantId, id: DepartmentId) -> Option<Department>;
}

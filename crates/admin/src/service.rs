//! Admin use cases: validate, map, persist.
//!
//! Each operation either applies the whole payload or nothing.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use facilityhub_core::{DepartmentId, RoleId, TenantId};

use crate::validation::{
    StoreDepartment, StoreModule, StoreRole, UpdateDepartment, UpdateRole, Validator,
};
use crate::{
    AdminError, Department, DepartmentInput, DepartmentRepository, Module, ModuleInput,
    ModuleRepository, Role, RoleInput, RoleRepository,
};

fn validated<T: DeserializeOwned>(validator: &dyn Validator, payload: &Value) -> Result<T, AdminError> {
    validator.validate(payload)?;
    serde_json::from_value(payload.clone()).map_err(|e| AdminError::Malformed(e.to_string()))
}

pub fn create_role(
    roles: &dyn RoleRepository,
    modules: &dyn ModuleRepository,
    tenant_id: TenantId,
    payload: &Value,
    now: DateTime<Utc>,
) -> Result<Role, AdminError> {
    let input: RoleInput = validated(&StoreRole::new(tenant_id, roles, modules), payload)?;
    let role = Role::create(roles.next_id(), input, now);
    roles.save(tenant_id, role.clone())?;

    tracing::info!(tenant_id = %tenant_id, role_id = %role.id, name = %role.name, "role created");
    Ok(role)
}

pub fn update_role(
    roles: &dyn RoleRepository,
    modules: &dyn ModuleRepository,
    tenant_id: TenantId,
    role_id: RoleId,
    payload: &Value,
    now: DateTime<Utc>,
) -> Result<Role, AdminError> {
    let mut role = roles.get(tenant_id, role_id).ok_or(AdminError::NotFound)?;
    let input: RoleInput = validated(&UpdateRole::new(tenant_id, role_id, roles, modules), payload)?;
    role.apply(input, now);
    roles.save(tenant_id, role.clone())?;

    tracing::info!(tenant_id = %tenant_id, role_id = %role.id, "role updated");
    Ok(role)
}

pub fn delete_role(
    roles: &dyn RoleRepository,
    tenant_id: TenantId,
    role_id: RoleId,
) -> Result<Role, AdminError> {
    let role = roles.delete(tenant_id, role_id).ok_or(AdminError::NotFound)?;
    tracing::info!(tenant_id = %tenant_id, role_id = %role.id, "role deleted");
    Ok(role)
}

pub fn create_module(
    modules: &dyn ModuleRepository,
    tenant_id: TenantId,
    payload: &Value,
    now: DateTime<Utc>,
) -> Result<Module, AdminError> {
    let input: ModuleInput = validated(&StoreModule::new(tenant_id, modules), payload)?;
    let module = Module::create(input, now);
    modules.save(tenant_id, module.clone())?;

    tracing::info!(tenant_id = %tenant_id, code = %module.code, "module registered");
    Ok(module)
}

pub fn create_department(
    departments: &dyn DepartmentRepository,
    tenant_id: TenantId,
    payload: &Value,
    now: DateTime<Utc>,
) -> Result<Department, AdminError> {
    let input: DepartmentInput = validated(&StoreDepartment::new(tenant_id, departments), payload)?;
    let department = Department::create(departments.next_id(), input, now);
    departments.save(tenant_id, department.clone())?;

    tracing::info!(tenant_id = %tenant_id, department_id = %department.id, "department created");
    Ok(department)
}

pub fn update_department(
    departments: &dyn DepartmentRepository,
    tenant_id: TenantId,
    department_id: DepartmentId,
    payload: &Value,
    now: DateTime<Utc>,
) -> Result<Department, AdminError> {
    let mut department = departments
        .get(tenant_id, department_id)
        .ok_or(AdminError::NotFound)?;
    let input: DepartmentInput = validated(
        &UpdateDepartment::new(tenant_id, department_id, departments),
        payload,
    )?;
    department.apply(input, now);
    departments.save(tenant_id, department.clone())?;

    tracing::info!(tenant_id = %tenant_id, department_id = %department.id, "department updated");
    Ok(department)
}

pub fn delete_department(
    departments: &dyn DepartmentRepository,
    tenant_id: TenantId,
    department_id: DepartmentId,
) -> Result<Department, AdminError> {
    let department = departments
        .delete(tenant_id, department_id)
        .ok_or(AdminError::NotFound)?;
    tracing::info!(tenant_id = %tenant_id, department_id = %department.id, "department deleted");
    Ok(department)
}

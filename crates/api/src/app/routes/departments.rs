use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use serde_json::Value;

use facilityhub_admin::{DepartmentRepository, service};
use facilityhub_auth::Permission;

use crate::app::{dto, errors, services::AppServices};
use crate::authz::require_permission;
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_departments).post(create_department))
        .route(
            "/:id",
            get(get_department).put(update_department).delete(delete_department),
        )
}

fn guard(tenant: &TenantContext, principal: &PrincipalContext) -> Result<(), Response> {
    require_permission(tenant, principal, &Permission::DEPARTMENTS_MANAGE)
        .map_err(errors::authz_error_to_response)
}

pub async fn list_departments(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    if let Err(resp) = guard(&tenant, &principal) {
        return resp;
    }
    Json(services.departments.list(tenant.tenant_id())).into_response()
}

pub async fn create_department(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(payload): Json<Value>,
) -> Response {
    if let Err(resp) = guard(&tenant, &principal) {
        return resp;
    }
    match service::create_department(&services.departments, tenant.tenant_id(), &payload, Utc::now()) {
        Ok(d) => (StatusCode::CREATED, Json(d)).into_response(),
        Err(e) => errors::admin_error_to_response(e),
    }
}

pub async fn get_department(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    if let Err(resp) = guard(&tenant, &principal) {
        return resp;
    }
    let id = match dto::parse_department_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.departments.get(tenant.tenant_id(), id) {
        Some(d) => Json(d).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "department not found"),
    }
}

pub async fn update_department(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Response {
    if let Err(resp) = guard(&tenant, &principal) {
        return resp;
    }
    let id = match dto::parse_department_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match service::update_department(
        &services.departments,
        tenant.tenant_id(),
        id,
        &payload,
        Utc::now(),
    ) {
        Ok(d) => Json(d).into_response(),
        Err(e) => errors::admin_error_to_response(e),
    }
}

pub async fn delete_department(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    if let Err(resp) = guard(&tenant, &principal) {
        return resp;
    }
    let id = match dto::parse_department_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match service::delete_department(&services.departments, tenant.tenant_id(), id) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::admin_error_to_response(e),
    }
}

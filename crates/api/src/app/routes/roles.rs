//! Role administration.

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

use facilityhub_admin::{RoleRepository, service};
use facilityhub_auth::Permission;

use crate::app::{dto, errors, services::AppServices};
use crate::authz::require_permission;
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route("/:id", get(get_role).put(update_role).delete(delete_role))
}

fn guard(tenant: &TenantContext, principal: &PrincipalContext) -> Result<(), Response> {
    require_permission(tenant, principal, &Permission::ROLES_MANAGE)
        .map_err(errors::authz_error_to_response)
}

/// GET /roles
pub async fn list_roles(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    if let Err(resp) = guard(&tenant, &principal) {
        return resp;
    }
    Json(services.roles.list(tenant.tenant_id())).into_response()
}

/// POST /roles
pub async fn create_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(payload): Json<Value>,
) -> Response {
    if let Err(resp) = guard(&tenant, &principal) {
        return resp;
    }
    match service::create_role(
        &services.roles,
        &services.modules,
        tenant.tenant_id(),
        &payload,
        Utc::now(),
    ) {
        Ok(role) => (StatusCode::CREATED, Json(role)).into_response(),
        Err(e) => errors::admin_error_to_response(e),
    }
}

/// GET /roles/:id
pub async fn get_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    if let Err(resp) = guard(&tenant, &principal) {
        return resp;
    }
    let id = match dto::parse_role_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.roles.get(tenant.tenant_id(), id) {
        Some(role) => Json(role).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "role not found"),
    }
}

/// PUT /roles/:id
pub async fn update_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Response {
    if let Err(resp) = guard(&tenant, &principal) {
        return resp;
    }
    let id = match dto::parse_role_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match service::update_role(
        &services.roles,
        &services.modules,
        tenant.tenant_id(),
        id,
        &payload,
        Utc::now(),
    ) {
        Ok(role) => Json(role).into_response(),
        Err(e) => errors::admin_error_to_response(e),
    }
}

/// DELETE /roles/:id
pub async fn delete_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Response {
    if let Err(resp) = guard(&tenant, &principal) {
        return resp;
    }
    let id = match dto::parse_role_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match service::delete_role(&services.roles, tenant.tenant_id(), id) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::admin_error_to_response(e),
    }
}

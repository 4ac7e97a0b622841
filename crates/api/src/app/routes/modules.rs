use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use serde_json::Value;

use facilityhub_admin::{ModuleRepository, service};
use facilityhub_auth::Permission;

use crate::app::{errors, services::AppServices};
use crate::authz::require_permission;
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new().route("/", get(list_modules).post(create_module))
}

/// GET /modules
pub async fn list_modules(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    if let Err(e) = require_permission(&tenant, &principal, &Permission::MODULES_MANAGE) {
        return errors::authz_error_to_response(e);
    }
    Json(services.modules.list(tenant.tenant_id())).into_response()
}

/// POST /modules
pub async fn create_module(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(payload): Json<Value>,
) -> Response {
    if let Err(e) = require_permission(&tenant, &principal, &Permission::MODULES_MANAGE) {
        return errors::authz_error_to_response(e);
    }
    match service::create_module(&services.modules, tenant.tenant_id(), &payload, Utc::now()) {
        Ok(module) => (StatusCode::CREATED, Json(module)).into_response(),
        Err(e) => errors::admin_error_to_response(e),
    }
}

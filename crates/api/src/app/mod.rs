//! Axum router and handler wiring.
//!
//! - `services.rs`: shared stores, broadcaster and OTP issuer
//! - `routes/`: one file per resource
//! - `dto.rs`: request/response shapes
//! - `errors.rs`: JSON error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use facilityhub_infra::config::AppConfig;
use facilityhub_mail::LogTransport;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Production router: services wired from configuration, mail to the log.
pub fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = AppServices::from_config(config, Arc::new(LogTransport))?;
    Ok(build_app_with(config.jwt_secret.clone(), Arc::new(services)))
}

/// Router over caller-provided services (tests inject an outbox transport).
pub fn build_app_with(jwt_secret: String, services: Arc<AppServices>) -> Router {
    let jwt = Arc::new(facilityhub_auth::Hs256JwtValidator::new(jwt_secret.into_bytes()));
    let auth_state = middleware::AuthState { jwt };

    let protected = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .layer(ServiceBuilder::new())
}

use axum::{Router, routing::get};

pub mod departments;
pub mod modules;
pub mod occupancy;
pub mod otp;
pub mod roles;
pub mod system;

/// Router for all authenticated (tenant-scoped) endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/roles", roles::router())
        .nest("/modules", modules::router())
        .nest("/departments", departments::router())
        .nest("/otp", otp::router())
        .nest("/occupancy", occupancy::router())
}

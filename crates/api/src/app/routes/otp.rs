//! One-time verification codes.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};

use facilityhub_infra::otp::OtpError;
use facilityhub_mail::OTP_EXPIRY_MINUTES;

use crate::app::dto::{self, OtpSentResponse, OtpVerifiedResponse, SendOtpRequest, VerifyOtpRequest};
use crate::app::{errors, services::AppServices};
use crate::context::TenantContext;

pub fn router() -> Router {
    Router::new()
        .route("/send", post(send_otp))
        .route("/verify", post(verify_otp))
}

fn otp_error_to_response(err: OtpError) -> Response {
    tracing::error!(error = %err, "otp operation failed");
    match err {
        OtpError::Cache(e) => errors::json_error(StatusCode::SERVICE_UNAVAILABLE, "cache_error", e.to_string()),
        OtpError::Mail(e) => errors::json_error(StatusCode::BAD_GATEWAY, "mail_error", e.to_string()),
    }
}

/// POST /otp/send
pub async fn send_otp(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Json(body): Json<SendOtpRequest>,
) -> Response {
    if !dto::is_plausible_email(&body.email) {
        return errors::json_error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_email", "email is not valid");
    }

    match services.otp.issue(tenant.tenant_id(), &body.email, body.otp_type) {
        Ok(issued) => (
            StatusCode::ACCEPTED,
            Json(OtpSentResponse {
                email: issued.email,
                otp_type: issued.otp_type,
                expires_in_minutes: OTP_EXPIRY_MINUTES,
            }),
        )
            .into_response(),
        Err(e) => otp_error_to_response(e),
    }
}

/// POST /otp/verify
pub async fn verify_otp(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Json(body): Json<VerifyOtpRequest>,
) -> Response {
    match services
        .otp
        .verify(tenant.tenant_id(), &body.email, &body.otp_type, &body.code)
    {
        Ok(true) => Json(OtpVerifiedResponse { verified: true }).into_response(),
        Ok(false) => errors::json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "invalid_code",
            "code is invalid or has expired",
        ),
        Err(e) => otp_error_to_response(e),
    }
}

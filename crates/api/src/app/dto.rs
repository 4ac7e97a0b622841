use axum::response::Response;
use serde::{Deserialize, Serialize};

use facilityhub_core::{DepartmentId, RoleId};
use facilityhub_events::OccupancySnapshot;
use facilityhub_mail::OtpType;

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    pub email: String,
    #[serde(rename = "type")]
    pub otp_type: OtpType,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    #[serde(rename = "type")]
    pub otp_type: OtpType,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct SetCapacityRequest {
    pub max: u64,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct OtpSentResponse {
    pub email: String,
    #[serde(rename = "type")]
    pub otp_type: OtpType,
    pub expires_in_minutes: u32,
}

#[derive(Debug, Serialize)]
pub struct OtpVerifiedResponse {
    pub verified: bool,
}

#[derive(Debug, Serialize)]
pub struct OccupancyResponse {
    pub current: u64,
    pub max: u64,
    pub at_capacity: bool,
}

impl From<OccupancySnapshot> for OccupancyResponse {
    fn from(s: OccupancySnapshot) -> Self {
        Self {
            current: s.current,
            max: s.max,
            at_capacity: s.current >= s.max,
        }
    }
}

// -------------------------
// Path helpers
// -------------------------

pub fn parse_role_id(raw: &str) -> Result<RoleId, Response> {
    raw.parse().map_err(errors::domain_error_to_response)
}

pub fn parse_department_id(raw: &str) -> Result<DepartmentId, Response> {
    raw.parse().map_err(errors::domain_error_to_response)
}

/// Loose shape check; delivery is what actually proves the address.
pub fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !email.contains(char::is_whitespace)
        && !domain.contains('@')
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}

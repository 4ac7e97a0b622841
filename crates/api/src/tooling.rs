//! JSON-lines tooling protocol.
//!
//! One request object per input line, one response object per output line:
//!
//! ```text
//! -> {"id":1,"method":"otp.preview","params":{"code":"123456","type":"login"}}
//! <- {"id":1,"result":{"subject":"Your Verification Code",...}}
//! ```
//!
//! Nothing but response frames is ever written to the output.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use facilityhub_admin::ModuleRepository;
use facilityhub_core::TenantId;
use facilityhub_events::{EntryExitEvent, Notification, OccupancyUpdated};
use facilityhub_mail::{MailFormatter, OtpMailFormatter, OtpRequest};

use crate::app::AppServices;

#[derive(Debug, Deserialize)]
pub struct ToolingRequest {
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ToolingResponse {
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolingErrorBody>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ToolingErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ToolingError {
    #[error("request is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("unknown method '{0}'")]
    UnknownMethod(String),

    #[error("invalid params: {0}")]
    InvalidParams(String),

    #[error("{0}")]
    Failed(String),
}

impl ToolingError {
    fn code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "parse_error",
            Self::UnknownMethod(_) => "unknown_method",
            Self::InvalidParams(_) => "invalid_params",
            Self::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Deserialize)]
struct TenantParams {
    tenant_id: TenantId,
}

#[derive(Debug, Deserialize)]
struct OccupancyPreviewParams {
    event: EntryExitEvent,
    current: u64,
    max: u64,
}

pub struct ToolingServer {
    services: Arc<AppServices>,
}

impl ToolingServer {
    pub fn new(services: Arc<AppServices>) -> Self {
        Self { services }
    }

    /// Serve until `input` is exhausted.
    pub fn run<R: BufRead, W: Write>(&self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            if let Some(frame) = self.handle_line(&line) {
                writeln!(output, "{frame}")?;
                output.flush()?;
            }
        }
        Ok(())
    }

    /// `None` for blank lines.
    pub fn handle_line(&self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let response = match serde_json::from_str::<ToolingRequest>(line) {
            Ok(request) => self.handle_request(request),
            Err(e) => failure(Value::Null, ToolingError::Parse(e)),
        };

        // Serializing plain JSON values cannot fail.
        Some(serde_json::to_string(&response).unwrap_or_else(|_| "{}".to_string()))
    }

    pub fn handle_request(&self, request: ToolingRequest) -> ToolingResponse {
        tracing::debug!(method = %request.method, "tooling request");
        match self.dispatch(&request.method, request.params) {
            Ok(result) => ToolingResponse {
                id: request.id,
                result: Some(result),
                error: None,
            },
            Err(e) => failure(request.id, e),
        }
    }

    fn dispatch(&self, method: &str, params: Value) -> Result<Value, ToolingError> {
        match method {
            "ping" => Ok(json!({ "pong": true })),
            "modules.list" => {
                let p: TenantParams = parse_params(params)?;
                to_value(self.services.modules.list(p.tenant_id))
            }
            "otp.preview" => {
                let request: OtpRequest = parse_params(params)?;
                let mail = OtpMailFormatter::new(request)
                    .render()
                    .map_err(|e| ToolingError::Failed(e.to_string()))?;
                to_value(mail)
            }
            "occupancy.preview" => {
                let p: OccupancyPreviewParams = parse_params(params)?;
                let notification = OccupancyUpdated::new(p.event, p.current, p.max);
                Ok(json!({
                    "channel": notification.channel(),
                    "event": notification.event_name(),
                    "payload": to_value(notification.payload())?,
                }))
            }
            other => Err(ToolingError::UnknownMethod(other.to_string())),
        }
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(params: Value) -> Result<T, ToolingError> {
    serde_json::from_value(params).map_err(|e| ToolingError::InvalidParams(e.to_string()))
}

fn to_value<T: Serialize>(value: T) -> Result<Value, ToolingError> {
    serde_json::to_value(value).map_err(|e| ToolingError::Failed(e.to_string()))
}

fn failure(id: Value, err: ToolingError) -> ToolingResponse {
    ToolingResponse {
        id,
        result: None,
        error: Some(ToolingErrorBody {
            code: err.code(),
            message: err.to_string(),
        }),
    }
}

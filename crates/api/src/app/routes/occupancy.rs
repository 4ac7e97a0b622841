//! Entry/exit ingestion, occupancy counts and the live dashboard stream.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event as SseEvent, KeepAlive, Sse},
    },
    routing::{get, post, put},
};
use serde_json::Value;
use tokio::sync::mpsc::unbounded_channel;
use tokio_stream::wrappers::UnboundedReceiverStream;

use facilityhub_auth::Permission;
use facilityhub_events::{
    EntryExitEvent, EventBus, NotifyError, OCCUPANCY_CHANNEL, OccupancyUpdated, TenantScoped,
};

use crate::app::dto::{OccupancyResponse, SetCapacityRequest};
use crate::app::{errors, services::AppServices};
use crate::authz::require_permission;
use crate::context::{PrincipalContext, TenantContext};

const HEARTBEAT_EVERY: Duration = Duration::from_secs(15);

pub fn router() -> Router {
    Router::new()
        .route("/", get(current_occupancy))
        .route("/events", post(record_event))
        .route("/capacity", put(set_capacity))
        .route("/stream", get(stream_occupancy))
}

/// POST /occupancy/events
///
/// Applies the crossing to the tenant's count and broadcasts the result. A
/// failed broadcast is logged; the crossing is still recorded.
pub async fn record_event(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(event): Json<EntryExitEvent>,
) -> Response {
    if let Err(e) = require_permission(&tenant, &principal, &Permission::OCCUPANCY_RECORD) {
        return errors::authz_error_to_response(e);
    }

    let tenant_id = tenant.tenant_id();
    let snapshot = services.occupancy.record(tenant_id, event.kind);
    let notification = OccupancyUpdated::new(event, snapshot.current, snapshot.max);

    let payload = match services.notifier.notify(tenant_id, &notification) {
        Ok(message) => message.payload,
        Err(NotifyError::Publish { channel, message }) => {
            tracing::warn!(tenant_id = %tenant_id, channel, error = %message, "occupancy broadcast failed");
            services
                .notifier
                .message(tenant_id, &notification)
                .map(|m| m.payload)
                .unwrap_or(Value::Null)
        }
        Err(e) => {
            return errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "serialize_error", e.to_string());
        }
    };

    (StatusCode::ACCEPTED, Json(payload)).into_response()
}

/// GET /occupancy
pub async fn current_occupancy(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    if let Err(e) = require_permission(&tenant, &principal, &Permission::OCCUPANCY_VIEW) {
        return errors::authz_error_to_response(e);
    }
    Json(OccupancyResponse::from(services.occupancy.snapshot(tenant.tenant_id()))).into_response()
}

/// PUT /occupancy/capacity
pub async fn set_capacity(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<SetCapacityRequest>,
) -> Response {
    if let Err(e) = require_permission(&tenant, &principal, &Permission::OCCUPANCY_CONFIGURE) {
        return errors::authz_error_to_response(e);
    }
    let snapshot = services.occupancy.set_max(tenant.tenant_id(), body.max);
    tracing::info!(tenant_id = %tenant.tenant_id(), max = body.max, "occupancy capacity changed");
    Json(OccupancyResponse::from(snapshot)).into_response()
}

/// GET /occupancy/stream
///
/// Server-sent events for this tenant's dashboard channel. Each SSE event is
/// named after the broadcast event and carries its payload as data.
pub async fn stream_occupancy(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    if let Err(e) = require_permission(&tenant, &principal, &Permission::OCCUPANCY_VIEW) {
        return errors::authz_error_to_response(e);
    }

    let tenant_id = tenant.tenant_id();
    let subscription = services.notifier.bus().subscribe();
    let (tx, rx) = unbounded_channel::<Result<SseEvent, std::convert::Infallible>>();

    tokio::task::spawn_blocking(move || {
        let mut last_sent = std::time::Instant::now();

        loop {
            match subscription.recv_timeout(Duration::from_secs(1)) {
                Ok(message) => {
                    if message.tenant_id() != tenant_id || !message.is_on(OCCUPANCY_CHANNEL) {
                        continue;
                    }

                    let data = match serde_json::to_string(&message.payload) {
                        Ok(s) => s,
                        Err(_) => continue,
                    };

                    if tx.send(Ok(SseEvent::default().event(message.event).data(data))).is_err() {
                        break;
                    }
                    last_sent = std::time::Instant::now();
                }
                Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                    if tx.is_closed() {
                        break;
                    }
                    if last_sent.elapsed() > HEARTBEAT_EVERY {
                        let heartbeat = SseEvent::default().event("heartbeat").data("{}");
                        if tx.send(Ok(heartbeat)).is_err() {
                            break;
                        }
                        last_sent = std::time::Instant::now();
                    }
                }
                Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }
    });

    Sse::new(UnboundedReceiverStream::new(rx))
        .keep_alive(KeepAlive::new().interval(HEARTBEAT_EVERY))
        .into_response()
}

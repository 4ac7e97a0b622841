//! Notifications: a named channel plus a serializable payload.

use serde::Serialize;
use thiserror::Error;

use facilityhub_core::TenantId;

use crate::{BroadcastMessage, EventBus};

/// Something that can be broadcast to dashboard subscribers.
pub trait Notification {
    type Payload: Serialize;

    /// Logical channel the notification is delivered on.
    fn channel(&self) -> &'static str;

    /// Event name subscribers dispatch on (distinct from the channel).
    fn event_name(&self) -> &'static str;

    fn payload(&self) -> Self::Payload;
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("serialize notification payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("publish to channel '{channel}': {message}")]
    Publish { channel: &'static str, message: String },
}

/// Publishes notifications onto a broadcast bus.
///
/// One publish per call; whether subscribers actually receive it is up to the
/// transport behind `B`.
#[derive(Debug, Clone)]
pub struct Notifier<B> {
    bus: B,
}

impl<B> Notifier<B>
where
    B: EventBus<BroadcastMessage>,
{
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Build the broadcast message without publishing it.
    pub fn message<N: Notification>(
        &self,
        tenant_id: TenantId,
        notification: &N,
    ) -> Result<BroadcastMessage, NotifyError> {
        Ok(BroadcastMessage {
            tenant_id,
            channel: notification.channel().to_string(),
            event: notification.event_name().to_string(),
            payload: serde_json::to_value(notification.payload())?,
        })
    }

    pub fn notify<N: Notification>(
        &self,
        tenant_id: TenantId,
        notification: &N,
    ) -> Result<BroadcastMessage, NotifyError> {
        let message = self.message(tenant_id, notification)?;
        self.bus
            .publish(message.clone())
            .map_err(|e| NotifyError::Publish {
                channel: notification.channel(),
                message: e.to_string(),
            })?;

        tracing::debug!(
            tenant_id = %tenant_id,
            channel = notification.channel(),
            event = notification.event_name(),
            "notification published"
        );

        Ok(message)
    }
}

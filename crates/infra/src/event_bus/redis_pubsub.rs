//! Redis pub/sub bus for dashboard broadcasts.
//!
//! Pub/sub is not durable: subscribers that are offline miss messages. That
//! matches the dashboard contract, which only shows live updates.

use std::sync::mpsc;
use std::thread;

use redis::Commands;

use facilityhub_events::{BroadcastMessage, EventBus, Subscription};

#[derive(Debug, thiserror::Error)]
pub enum RedisBusError {
    #[error("redis error: {0}")]
    Redis(String),

    #[error("serialize broadcast: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// All broadcast channels share one Redis channel; subscribers filter on
/// [`BroadcastMessage::channel`].
#[derive(Debug, Clone)]
pub struct RedisPubSubEventBus {
    client: redis::Client,
    redis_channel: String,
}

impl RedisPubSubEventBus {
    pub const DEFAULT_CHANNEL: &'static str = "facilityhub:broadcast";

    pub fn new(redis_url: impl AsRef<str>, redis_channel: impl Into<String>) -> Result<Self, RedisBusError> {
        let client = redis::Client::open(redis_url.as_ref())
            .map_err(|e| RedisBusError::Redis(e.to_string()))?;
        Ok(Self {
            client,
            redis_channel: redis_channel.into(),
        })
    }
}

impl EventBus<BroadcastMessage> for RedisPubSubEventBus {
    type Error = RedisBusError;

    fn publish(&self, message: BroadcastMessage) -> Result<(), Self::Error> {
        let payload = serde_json::to_string(&message)?;

        let mut conn = self
            .client
            .get_connection()
            .map_err(|e| RedisBusError::Redis(e.to_string()))?;

        let _: i64 = conn
            .publish(&self.redis_channel, payload)
            .map_err(|e| RedisBusError::Redis(e.to_string()))?;

        Ok(())
    }

    fn subscribe(&self) -> Subscription<BroadcastMessage> {
        let (tx, rx) = mpsc::channel();

        let client = self.client.clone();
        let redis_channel = self.redis_channel.clone();

        thread::spawn(move || {
            let mut conn = match client.get_connection() {
                Ok(c) => c,
                Err(err) => {
                    tracing::warn!(error = %err, "redis subscriber could not connect");
                    return;
                }
            };

            let mut pubsub = conn.as_pubsub();
            if pubsub.subscribe(&redis_channel).is_err() {
                return;
            }

            loop {
                let msg = match pubsub.get_message() {
                    Ok(m) => m,
                    Err(_) => return,
                };

                let payload: String = match msg.get_payload() {
                    Ok(p) => p,
                    Err(_) => continue,
                };

                let message: BroadcastMessage = match serde_json::from_str(&payload) {
                    Ok(m) => m,
                    Err(_) => continue,
                };

                if tx.send(message).is_err() {
                    return;
                }
            }
        });

        Subscription::new(rx)
    }
}

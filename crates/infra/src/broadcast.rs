//! Broadcast transport selected by configuration.

use std::sync::Arc;

use thiserror::Error;

use facilityhub_events::{BroadcastMessage, EventBus, InMemoryBusError, InMemoryEventBus, Subscription};

#[cfg(feature = "redis")]
use crate::event_bus::{RedisBusError, RedisPubSubEventBus};
use crate::config::BroadcastDriver;

#[derive(Debug, Error)]
pub enum BroadcastError {
    #[error(transparent)]
    InMemory(#[from] InMemoryBusError),

    #[cfg(feature = "redis")]
    #[error(transparent)]
    Redis(#[from] RedisBusError),

    #[error("broadcast driver unavailable: {0}")]
    Unavailable(String),
}

/// The process-wide broadcast bus.
#[derive(Debug, Clone)]
pub enum Broadcaster {
    InMemory(Arc<InMemoryEventBus<BroadcastMessage>>),
    #[cfg(feature = "redis")]
    Redis(RedisPubSubEventBus),
}

impl Broadcaster {
    pub fn in_memory() -> Self {
        Self::InMemory(Arc::new(InMemoryEventBus::new()))
    }

    pub fn connect(driver: &BroadcastDriver) -> Result<Self, BroadcastError> {
        match driver {
            BroadcastDriver::InMemory => Ok(Self::in_memory()),
            #[cfg(feature = "redis")]
            BroadcastDriver::Redis { url } => Ok(Self::Redis(RedisPubSubEventBus::new(
                url,
                RedisPubSubEventBus::DEFAULT_CHANNEL,
            )?)),
            #[cfg(not(feature = "redis"))]
            BroadcastDriver::Redis { .. } => Err(BroadcastError::Unavailable(
                "built without the `redis` feature".to_string(),
            )),
        }
    }
}

impl EventBus<BroadcastMessage> for Broadcaster {
    type Error = BroadcastError;

    fn publish(&self, message: BroadcastMessage) -> Result<(), Self::Error> {
        match self {
            Self::InMemory(bus) => Ok(bus.publish(message)?),
            #[cfg(feature = "redis")]
            Self::Redis(bus) => Ok(bus.publish(message)?),
        }
    }

    fn subscribe(&self) -> Subscription<BroadcastMessage> {
        match self {
            Self::InMemory(bus) => bus.subscribe(),
            #[cfg(feature = "redis")]
            Self::Redis(bus) => bus.subscribe(),
        }
    }
}

//! Broker-backed event bus implementations.
//!
//! The bus abstraction lives in `facilityhub-events`; this module adds
//! transports that cross process boundaries.

#[cfg(feature = "redis")]
pub mod redis_pubsub;

#[cfg(feature = "redis")]
pub use redis_pubsub::{RedisBusError, RedisPubSubEventBus};

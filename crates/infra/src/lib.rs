//! Infrastructure layer: configuration, bootstrap, cache, stores, broadcast
//! transports and operational tooling.

pub mod bootstrap;
pub mod broadcast;
pub mod cache;
pub mod config;
pub mod db_reset;
pub mod event_bus;
pub mod otp;
pub mod read_model;

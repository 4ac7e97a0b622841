//! HTTP API, process entry wiring and the tooling protocol.

pub mod app;
pub mod authz;
pub mod cli;
pub mod context;
pub mod middleware;
pub mod tooling;

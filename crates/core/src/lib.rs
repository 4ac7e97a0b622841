//! `facilityhub-core` — shared domain building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod timestamp;

pub use error::DomainError;
pub use id::{DepartmentId, RoleId, TenantId};
pub use timestamp::EventTimestamp;

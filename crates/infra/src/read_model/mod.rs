//! Tenant-isolated storage behind the admin repositories and occupancy counts.

pub mod admin;
pub mod occupancy;
pub mod tenant_store;

pub use admin::{InMemoryDepartmentStore, InMemoryModuleStore, InMemoryRoleStore};
pub use occupancy::OccupancyBoard;
pub use tenant_store::{InMemoryTenantStore, TenantStore};

//! Broadcast mechanics and the notifications published through them.

pub mod broadcast;
pub mod bus;
pub mod in_memory_bus;
pub mod notification;
pub mod occupancy;
pub mod tenant;

pub use broadcast::BroadcastMessage;
pub use bus::{EventBus, Subscription};
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use notification::{Notification, NotifyError, Notifier};
pub use occupancy::{
    EntryExitEvent, EntryExitType, OccupancyLedger, OccupancySnapshot, OccupancyUpdated,
    ENTRY_EXIT_EVENT, OCCUPANCY_CHANNEL,
};
pub use tenant::TenantScoped;

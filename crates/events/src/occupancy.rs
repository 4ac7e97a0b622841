//! Entry/exit events and the occupancy dashboard notification.

use serde::{Deserialize, Serialize};

use facilityhub_core::EventTimestamp;

use crate::notification::Notification;

/// Channel the live occupancy dashboard subscribes to.
pub const OCCUPANCY_CHANNEL: &str = "occupancy-dashboard";

/// Event name for entry/exit updates on [`OCCUPANCY_CHANNEL`].
pub const ENTRY_EXIT_EVENT: &str = "entry-exit-event";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryExitType {
    Entry,
    Exit,
}

impl EntryExitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Exit => "exit",
        }
    }
}

/// A person crossing a monitored boundary, as read by a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryExitEvent {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: EntryExitType,
    pub person_id: u64,
    pub timestamp: EventTimestamp,
    pub device_id: String,
}

/// Current vs. maximum occupancy at notification time.
///
/// `current <= max` is expected but not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancySnapshot {
    pub current: u64,
    pub max: u64,
}

/// Running occupancy count for one tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyLedger {
    pub current: u64,
    pub max: u64,
}

impl OccupancyLedger {
    pub fn new(max: u64) -> Self {
        Self { current: 0, max }
    }

    /// Apply one crossing. Exits never take the count below zero.
    pub fn record(&mut self, kind: EntryExitType) -> OccupancySnapshot {
        match kind {
            EntryExitType::Entry => self.current = self.current.saturating_add(1),
            EntryExitType::Exit => self.current = self.current.saturating_sub(1),
        }
        self.snapshot()
    }

    pub fn snapshot(&self) -> OccupancySnapshot {
        OccupancySnapshot {
            current: self.current,
            max: self.max,
        }
    }
}

/// Wire form of the event inside the dashboard payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryExitPayload {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: EntryExitType,
    pub person_id: u64,
    /// Always a string; epoch inputs are converted to ISO-8601.
    pub timestamp: String,
    pub device_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyPayload {
    pub event: EntryExitPayload,
    pub occupancy: OccupancySnapshot,
}

/// Dashboard notification for one entry/exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyUpdated {
    pub event: EntryExitEvent,
    pub occupancy: OccupancySnapshot,
}

impl OccupancyUpdated {
    pub fn new(event: EntryExitEvent, current: u64, max: u64) -> Self {
        Self {
            event,
            occupancy: OccupancySnapshot { current, max },
        }
    }
}

impl Notification for OccupancyUpdated {
    type Payload = OccupancyPayload;

    fn channel(&self) -> &'static str {
        OCCUPANCY_CHANNEL
    }

    fn event_name(&self) -> &'static str {
        ENTRY_EXIT_EVENT
    }

    fn payload(&self) -> OccupancyPayload {
        OccupancyPayload {
            event: EntryExitPayload {
                id: self.event.id,
                kind: self.event.kind,
                person_id: self.event.person_id,
                timestamp: self.event.timestamp.normalized(),
                device_id: self.event.device_id.clone(),
            },
            occupancy: self.occupancy,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use facilityhub_core::TenantId;
    use serde_json::json;

    use super::*;
    use crate::{BroadcastMessage, EventBus, InMemoryEventBus, Notifier, NotifyError, Subscription};

    fn sample_event(timestamp: EventTimestamp) -> EntryExitEvent {
        EntryExitEvent {
            id: 1,
            kind: EntryExitType::Entry,
            person_id: 42,
            timestamp,
            device_id: "D1".to_string(),
        }
    }

    #[test]
    fn payload_matches_dashboard_contract() {
        let notification = OccupancyUpdated::new(sample_event(EventTimestamp::Epoch(1_700_000_000)), 3, 10);

        let payload = serde_json::to_value(notification.payload()).unwrap();

        assert_eq!(
            payload,
            json!({
                "event": {
                    "id": 1,
                    "type": "entry",
                    "person_id": 42,
                    "timestamp": "2023-11-14T22:13:20+00:00",
                    "device_id": "D1",
                },
                "occupancy": { "current": 3, "max": 10 },
            })
        );
    }

    #[test]
    fn string_timestamps_are_not_rewritten() {
        let notification =
            OccupancyUpdated::new(sample_event("2024-03-01 08:00:00".into()), 0, 5);
        assert_eq!(notification.payload().event.timestamp, "2024-03-01 08:00:00");
    }

    #[test]
    fn channel_and_event_name_are_distinct() {
        let notification = OccupancyUpdated::new(sample_event(EventTimestamp::Epoch(0)), 0, 0);
        assert_eq!(notification.channel(), "occupancy-dashboard");
        assert_eq!(notification.event_name(), "entry-exit-event");
    }

    #[test]
    fn current_above_max_is_passed_through() {
        let notification = OccupancyUpdated::new(sample_event(EventTimestamp::Epoch(0)), 12, 10);
        assert_eq!(notification.payload().occupancy, OccupancySnapshot { current: 12, max: 10 });
    }

    #[test]
    fn notifier_publishes_once_to_the_bus() {
        let bus = Arc::new(InMemoryEventBus::<BroadcastMessage>::new());
        let sub = bus.subscribe();
        let notifier = Notifier::new(bus.clone());
        let tenant = TenantId::new();

        notifier
            .notify(tenant, &OccupancyUpdated::new(sample_event(EventTimestamp::Epoch(1_700_000_000)), 3, 10))
            .unwrap();

        let msg = sub.try_recv().unwrap();
        assert_eq!(msg.tenant_id, tenant);
        assert_eq!(msg.channel, OCCUPANCY_CHANNEL);
        assert_eq!(msg.event, ENTRY_EXIT_EVENT);
        assert_eq!(msg.payload["occupancy"]["current"], 3);
        assert!(sub.try_recv().is_err());
    }

    struct ClosedBus;

    impl EventBus<BroadcastMessage> for ClosedBus {
        type Error = String;

        fn publish(&self, _message: BroadcastMessage) -> Result<(), Self::Error> {
            Err("transport closed".to_string())
        }

        fn subscribe(&self) -> Subscription<BroadcastMessage> {
            let (_tx, rx) = std::sync::mpsc::channel();
            Subscription::new(rx)
        }
    }

    #[test]
    fn publish_failures_name_the_channel() {
        let notifier = Notifier::new(ClosedBus);
        let err = notifier
            .notify(TenantId::new(), &OccupancyUpdated::new(sample_event(EventTimestamp::Epoch(0)), 1, 1))
            .unwrap_err();

        match err {
            NotifyError::Publish { channel, message } => {
                assert_eq!(channel, OCCUPANCY_CHANNEL);
                assert_eq!(message, "transport closed");
            }
            other => panic!("expected publish error, got {other:?}"),
        }
    }

    #[test]
    fn ledger_counts_entries_and_saturates_exits() {
        let mut ledger = OccupancyLedger::new(10);
        ledger.record(EntryExitType::Entry);
        ledger.record(EntryExitType::Entry);
        assert_eq!(ledger.record(EntryExitType::Exit), OccupancySnapshot { current: 1, max: 10 });

        ledger.record(EntryExitType::Exit);
        assert_eq!(ledger.record(EntryExitType::Exit).current, 0);
    }

    #[test]
    fn event_type_deserializes_from_lowercase() {
        let event: EntryExitEvent = serde_json::from_value(json!({
            "id": 9,
            "type": "exit",
            "person_id": 4,
            "timestamp": "2024-01-01T00:00:00Z",
            "device_id": "gate-2",
        }))
        .unwrap();
        assert_eq!(event.kind, EntryExitType::Exit);
    }
}

use std::collections::HashMap;
use std::sync::Mutex;

use facilityhub_core::TenantId;
use facilityhub_events::{EntryExitType, OccupancyLedger, OccupancySnapshot};

/// Per-tenant occupancy ledgers. Tenants start at zero with the default max.
#[derive(Debug)]
pub struct OccupancyBoard {
    default_max: u64,
    ledgers: Mutex<HashMap<TenantId, OccupancyLedger>>,
}

impl OccupancyBoard {
    pub fn new(default_max: u64) -> Self {
        Self {
            default_max,
            ledgers: Mutex::new(HashMap::new()),
        }
    }

    pub fn record(&self, tenant_id: TenantId, kind: EntryExitType) -> OccupancySnapshot {
        self.with_ledger(tenant_id, |ledger| ledger.record(kind))
    }

    pub fn snapshot(&self, tenant_id: TenantId) -> OccupancySnapshot {
        self.with_ledger(tenant_id, |ledger| ledger.snapshot())
    }

    /// Change capacity. The current count is left as is, even above `max`.
    pub fn set_max(&self, tenant_id: TenantId, max: u64) -> OccupancySnapshot {
        self.with_ledger(tenant_id, |ledger| {
            ledger.max = max;
            ledger.snapshot()
        })
    }

    fn with_ledger<T>(&self, tenant_id: TenantId, f: impl FnOnce(&mut OccupancyLedger) -> T) -> T {
        let mut ledgers = self
            .ledgers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let ledger = ledgers
            .entry(tenant_id)
            .or_insert_with(|| OccupancyLedger::new(self.default_max));
        f(ledger)
    }
}

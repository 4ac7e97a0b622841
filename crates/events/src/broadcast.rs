use serde::{Deserialize, Serialize};

use facilityhub_core::TenantId;

/// Unit handed to a broadcast transport.
///
/// `channel` is the logical destination subscribers connect to; `event` names
/// the kind of payload so several kinds can share one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastMessage {
    pub tenant_id: TenantId,
    pub channel: String,
    pub event: String,
    pub payload: serde_json::Value,
}

impl BroadcastMessage {
    pub fn is_on(&self, channel: &str) -> bool {
        self.channel == channel
    }
}

//! Event timestamps as received from upstream producers.
//!
//! Some producers send Unix epoch seconds, others send pre-formatted strings.
//! Both are accepted; outbound payloads always carry a string.

use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize};

/// Timestamp of an ingested event, in whichever form the producer used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventTimestamp {
    /// Unix epoch seconds.
    Epoch(i64),
    /// Already formatted by the producer; passed through untouched.
    Text(String),
}

impl EventTimestamp {
    /// Canonical string form used on the wire.
    ///
    /// Epoch seconds become ISO-8601 in UTC (`2023-11-14T22:13:20+00:00`).
    /// Strings are returned unchanged. Epoch values chrono cannot represent
    /// are rendered as their decimal digits.
    pub fn normalized(&self) -> String {
        match self {
            Self::Epoch(secs) => match DateTime::from_timestamp(*secs, 0) {
                Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, false),
                None => secs.to_string(),
            },
            Self::Text(s) => s.clone(),
        }
    }
}

impl From<i64> for EventTimestamp {
    fn from(value: i64) -> Self {
        Self::Epoch(value)
    }
}

impl From<String> for EventTimestamp {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for EventTimestamp {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MODULE_CODE_MAX: usize = 50;
pub const MODULE_NAME_MAX: usize = 255;

/// A feature area of the facility application (e.g. `ZCS`, `HBR`).
///
/// Module codes are the whitelist role assignments are checked against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub code: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModuleInput {
    pub code: String,
    pub name: String,
}

impl Module {
    pub fn create(input: ModuleInput, now: DateTime<Utc>) -> Self {
        Self {
            code: input.code,
            name: input.name,
            created_at: now,
        }
    }
}

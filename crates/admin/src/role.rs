use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use facilityhub_core::RoleId;

pub const ROLE_NAME_MAX: usize = 255;
pub const ROLE_DESCRIPTION_MAX: usize = 1000;

/// Tenant-defined role granting access to a set of modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub description: Option<String>,
    /// Association is a set; ordering and duplicates carry no meaning.
    pub module_codes: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated create/update payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoleInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub module_codes: Option<Vec<String>>,
}

impl Role {
    pub fn create(id: RoleId, input: RoleInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description,
            module_codes: input.module_codes.unwrap_or_default().into_iter().collect(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an update. Module codes are only replaced when the payload
    /// carries them.
    pub fn apply(&mut self, input: RoleInput, now: DateTime<Utc>) {
        self.name = input.name;
        self.description = input.description;
        if let Some(codes) = input.module_codes {
            self.module_codes = codes.into_iter().collect();
        }
        self.updated_at = now;
    }
}

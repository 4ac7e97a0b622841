use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use facilityhub_core::DepartmentId;

pub const DEPARTMENT_NAME_MAX: usize = 255;
pub const DEPARTMENT_DESCRIPTION_MAX: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DepartmentInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Department {
    pub fn create(id: DepartmentId, input: DepartmentInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, input: DepartmentInput, now: DateTime<Utc>) {
        self.name = input.name;
        self.description = input.description;
        self.updated_at = now;
    }
}

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Access role carried in a token (e.g. `"admin"`).
///
/// Distinct from the admin-managed role records: this is the coarse grant the
/// identity provider puts into the JWT.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleName(Cow<'static, str>);

impl RoleName {
    pub const ADMIN: RoleName = RoleName(Cow::Borrowed("admin"));
    pub const SECURITY: RoleName = RoleName(Cow::Borrowed("security"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for RoleName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

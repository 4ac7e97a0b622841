//! Process configuration, resolved once at startup from the environment.

use thiserror::Error;

use crate::bootstrap::BootProfile;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_RESET_DATABASE_URL: &str = "postgres://localhost:5432";
pub const DEFAULT_MAX_OCCUPANCY: u64 = 100;
const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} has invalid value '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("{key} must be set when {because}")]
    Missing {
        key: &'static str,
        because: &'static str,
    },
}

/// Where cached values (OTP codes) live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheBackend {
    InMemory,
    Redis { url: String },
}

/// Which transport carries dashboard broadcasts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastDriver {
    InMemory,
    Redis { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub jwt_secret: String,
    pub cache: CacheBackend,
    pub broadcast: BroadcastDriver,
    pub reset_database_url: String,
    pub default_max_occupancy: u64,
    /// Module codes every tenant starts with.
    pub seed_modules: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            cache: CacheBackend::InMemory,
            broadcast: BroadcastDriver::InMemory,
            reset_database_url: DEFAULT_RESET_DATABASE_URL.to_string(),
            default_max_occupancy: DEFAULT_MAX_OCCUPANCY,
            seed_modules: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let redis_url = lookup("REDIS_URL");

        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            defaults.jwt_secret.clone()
        });

        let cache = match lookup("CACHE_DRIVER").as_deref() {
            None | Some("memory") | Some("array") => CacheBackend::InMemory,
            Some("redis") => CacheBackend::Redis {
                url: redis_url.clone().ok_or(ConfigError::Missing {
                    key: "REDIS_URL",
                    because: "CACHE_DRIVER=redis",
                })?,
            },
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "CACHE_DRIVER",
                    value: other.to_string(),
                });
            }
        };

        let broadcast = match lookup("BROADCAST_DRIVER").as_deref() {
            None | Some("memory") => BroadcastDriver::InMemory,
            Some("redis") => BroadcastDriver::Redis {
                url: redis_url.clone().ok_or(ConfigError::Missing {
                    key: "REDIS_URL",
                    because: "BROADCAST_DRIVER=redis",
                })?,
            },
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "BROADCAST_DRIVER",
                    value: other.to_string(),
                });
            }
        };

        let default_max_occupancy = match lookup("OCCUPANCY_MAX") {
            None => defaults.default_max_occupancy,
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: "OCCUPANCY_MAX",
                value: raw,
            })?,
        };

        let seed_modules = lookup("SEED_MODULES")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            jwt_secret,
            cache,
            broadcast,
            reset_database_url: lookup("RESET_DATABASE_URL").unwrap_or(defaults.reset_database_url),
            default_max_occupancy,
            seed_modules,
        })
    }

    /// Apply the boot profile. Tooling runs never touch a real cache store.
    pub fn resolve(mut self, profile: &BootProfile) -> Self {
        if profile.is_tooling() && self.cache != CacheBackend::InMemory {
            tracing::debug!("tooling mode: cache backend switched to in-memory");
            self.cache = CacheBackend::InMemory;
        }
        self
    }
}

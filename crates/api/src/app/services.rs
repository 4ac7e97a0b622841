//! Process-wide state shared by every handler.

use std::sync::Arc;

use facilityhub_events::Notifier;
use facilityhub_infra::broadcast::Broadcaster;
use facilityhub_infra::cache;
use facilityhub_infra::config::AppConfig;
use facilityhub_infra::otp::OtpIssuer;
use facilityhub_infra::read_model::{
    InMemoryDepartmentStore, InMemoryModuleStore, InMemoryRoleStore, OccupancyBoard,
};
use facilityhub_mail::MailTransport;

pub struct AppServices {
    pub roles: InMemoryRoleStore,
    pub modules: InMemoryModuleStore,
    pub departments: InMemoryDepartmentStore,
    pub occupancy: OccupancyBoard,
    pub notifier: Notifier<Broadcaster>,
    pub otp: OtpIssuer,
}

impl AppServices {
    /// Wire everything the configuration asks for. Fails if a configured
    /// backend cannot be reached or was not compiled in.
    pub fn from_config(config: &AppConfig, mail: Arc<dyn MailTransport>) -> anyhow::Result<Self> {
        let cache = cache::connect(&config.cache)?;
        let broadcaster = Broadcaster::connect(&config.broadcast)?;

        tracing::info!(
            cache = ?config.cache,
            broadcast = ?config.broadcast,
            seed_modules = config.seed_modules.len(),
            "services wired"
        );

        Ok(Self::assemble(config, cache, broadcaster, mail))
    }

    /// Everything in process; cannot fail.
    pub fn in_memory(config: &AppConfig, mail: Arc<dyn MailTransport>) -> Self {
        Self::assemble(
            config,
            Arc::new(cache::InMemoryCache::new()),
            Broadcaster::in_memory(),
            mail,
        )
    }

    fn assemble(
        config: &AppConfig,
        cache: Arc<dyn cache::Cache>,
        broadcaster: Broadcaster,
        mail: Arc<dyn MailTransport>,
    ) -> Self {
        Self {
            roles: InMemoryRoleStore::new(),
            modules: InMemoryModuleStore::with_seed(config.seed_modules.clone()),
            departments: InMemoryDepartmentStore::new(),
            occupancy: OccupancyBoard::new(config.default_max_occupancy),
            notifier: Notifier::new(broadcaster),
            otp: OtpIssuer::new(cache, mail),
        }
    }
}

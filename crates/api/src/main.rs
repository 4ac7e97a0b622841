use std::sync::Arc;

use anyhow::Context;

use facilityhub_api::app::{self, AppServices};
use facilityhub_api::cli::{self, Command};
use facilityhub_api::tooling::ToolingServer;
use facilityhub_infra::bootstrap::{BootProfile, Bootstrap};
use facilityhub_infra::config::AppConfig;
use facilityhub_mail::LogTransport;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let profile = BootProfile::detect(&args);

    if profile.is_tooling() {
        facilityhub_observability::init_for_tooling();
    } else {
        facilityhub_observability::init();
    }

    let command = cli::resolve_command(&args, &profile);
    let mut boot = Bootstrap::new(profile.clone());

    let config = boot
        .step("config", || Ok(AppConfig::from_env()?))?
        .unwrap_or_default()
        .resolve(&profile);

    match command {
        Command::Serve => serve(&mut boot, &config).await,
        Command::Mcp => run_tooling(&mut boot, &config).await,
    }
}

async fn serve(boot: &mut Bootstrap, config: &AppConfig) -> anyhow::Result<()> {
    let router = boot
        .step("router", || app::build_app(config))?
        .context("router was not built")?;

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router).await?;
    Ok(())
}

async fn run_tooling(boot: &mut Bootstrap, config: &AppConfig) -> anyhow::Result<()> {
    let services = boot
        .step("services", || AppServices::from_config(config, Arc::new(LogTransport)))?
        .unwrap_or_else(|| AppServices::in_memory(config, Arc::new(LogTransport)));

    let server = ToolingServer::new(Arc::new(services));
    tokio::task::spawn_blocking(move || server.run(std::io::stdin().lock(), std::io::stdout().lock()))
        .await??;
    Ok(())
}

//! Drops every table in each application database.
//!
//! Usage: `facilityhub-db-reset` (server from `RESET_DATABASE_URL`).

use facilityhub_infra::config::AppConfig;
use facilityhub_infra::db_reset::{PgConnector, RESET_DATABASES, reset_databases};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    facilityhub_observability::init();

    let config = AppConfig::from_env()?;
    let connector = PgConnector::new(&config.reset_database_url);

    let report = reset_databases(&connector, &RESET_DATABASES, |outcome| match &outcome.result {
        Ok(dropped) => println!("{}: dropped {dropped} table(s)", outcome.database),
        Err(err) => println!("{}: FAILED ({err})", outcome.database),
    })
    .await;

    let failed = report.failures().count();
    println!(
        "Database reset finished: {} succeeded, {failed} failed.",
        report.outcomes.len() - failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

//! Drops every table in each of the application's logical databases.
//!
//! Each database is handled on its own: a failure is recorded for that
//! database and the loop moves on. Nothing is rolled back.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{Connection, Executor};
use thiserror::Error;

pub const RESET_DATABASES: [&str; 6] = [
    "facility_central",
    "facility_auth",
    "facility_access",
    "facility_occupancy",
    "facility_notifications",
    "facility_audit",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResetError {
    #[error("connect: {0}")]
    Connect(String),

    #[error("list tables: {0}")]
    ListTables(String),

    #[error("toggle referential checks: {0}")]
    ReferentialChecks(String),

    #[error("drop table {table}: {message}")]
    DropTable { table: String, message: String },
}

#[async_trait]
pub trait ResetSession: Send {
    async fn list_tables(&mut self) -> Result<Vec<String>, ResetError>;

    async fn set_referential_checks(&mut self, enabled: bool) -> Result<(), ResetError>;

    async fn drop_table(&mut self, table: &str) -> Result<(), ResetError>;
}

#[async_trait]
pub trait DatabaseConnector: Send + Sync {
    async fn connect(&self, database: &str) -> Result<Box<dyn ResetSession>, ResetError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseOutcome {
    pub database: String,
    /// Number of tables dropped.
    pub result: Result<usize, ResetError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetReport {
    pub outcomes: Vec<DatabaseOutcome>,
}

impl ResetReport {
    pub fn failures(&self) -> impl Iterator<Item = &DatabaseOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Reset each database in order. `observe` sees every outcome as it lands.
pub async fn reset_databases(
    connector: &dyn DatabaseConnector,
    databases: &[&str],
    mut observe: impl FnMut(&DatabaseOutcome),
) -> ResetReport {
    let mut report = ResetReport::default();

    for database in databases {
        let result = reset_one(connector, database).await;
        match &result {
            Ok(dropped) => tracing::info!(database, dropped, "database reset"),
            Err(err) => tracing::error!(database, error = %err, "database reset failed"),
        }

        let outcome = DatabaseOutcome {
            database: database.to_string(),
            result,
        };
        observe(&outcome);
        report.outcomes.push(outcome);
    }

    report
}

async fn reset_one(connector: &dyn DatabaseConnector, database: &str) -> Result<usize, ResetError> {
    let mut session = connector.connect(database).await?;
    let tables = session.list_tables().await?;

    session.set_referential_checks(false).await?;
    for table in &tables {
        if let Err(err) = session.drop_table(table).await {
            // Leave the session the way we found it before bailing.
            let _ = session.set_referential_checks(true).await;
            return Err(err);
        }
    }
    session.set_referential_checks(true).await?;

    Ok(tables.len())
}

/// Postgres connector; `base_url` points at the server, database names are
/// substituted per connection.
#[derive(Debug, Clone)]
pub struct PgConnector {
    base_url: String,
}

impl PgConnector {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl DatabaseConnector for PgConnector {
    async fn connect(&self, database: &str) -> Result<Box<dyn ResetSession>, ResetError> {
        let options = PgConnectOptions::from_str(&self.base_url)
            .map_err(|e| ResetError::Connect(e.to_string()))?
            .database(database);
        let conn = PgConnection::connect_with(&options)
            .await
            .map_err(|e| ResetError::Connect(e.to_string()))?;
        Ok(Box::new(PgResetSession { conn }))
    }
}

struct PgResetSession {
    conn: PgConnection,
}

#[async_trait]
impl ResetSession for PgResetSession {
    async fn list_tables(&mut self) -> Result<Vec<String>, ResetError> {
        sqlx::query_scalar::<_, String>(
            "SELECT tablename FROM pg_tables WHERE schemaname = current_schema() ORDER BY tablename",
        )
        .fetch_all(&mut self.conn)
        .await
        .map_err(|e| ResetError::ListTables(e.to_string()))
    }

    async fn set_referential_checks(&mut self, enabled: bool) -> Result<(), ResetError> {
        // `replica` suppresses foreign-key triggers for this session.
        let role = if enabled { "origin" } else { "replica" };
        let sql = format!("SET session_replication_role = '{role}'");
        (&mut self.conn)
            .execute(sql.as_str())
            .await
            .map(|_| ())
            .map_err(|e| ResetError::ReferentialChecks(e.to_string()))
    }

    async fn drop_table(&mut self, table: &str) -> Result<(), ResetError> {
        let sql = format!("DROP TABLE IF EXISTS {} CASCADE", quote_ident(table));
        (&mut self.conn)
            .execute(sql.as_str())
            .await
            .map(|_| ())
            .map_err(|e| ResetError::DropTable {
                table: table.to_string(),
                message: e.to_string(),
            })
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

//! Database configuration loaded from the environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::error::{Error, Result};

/// Connection settings for the gym database.
///
/// Read from the environment by [`DbConfig::from_env`], after loading a `.env`
/// file if one is present:
///
/// | Variable                         | Default  |
/// |----------------------------------|----------|
/// | `DATABASE_URL`                   | required |
/// | `DATABASE_MAX_CONNECTIONS`       | 10       |
/// | `DATABASE_MIN_CONNECTIONS`       | 2        |
/// | `DATABASE_CONNECT_TIMEOUT_SECS`  | 10       |
/// | `DATABASE_SQLX_LOGGING`          | false    |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub sqlx_logging: bool,
}

impl DbConfig {
    /// Creates a configuration for `url` with default pool settings.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_connections: 2,
            connect_timeout: Duration::from_secs(10),
            sqlx_logging: false,
        }
    }

    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let url = env::var("DATABASE_URL")
            .map_err(|_| Error::Config("DATABASE_URL must be set".to_string()))?;
        let defaults = Self::new(url);

        Ok(Self {
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS")?
                .unwrap_or(defaults.max_connections),
            min_connections: parse_var("DATABASE_MIN_CONNECTIONS")?
                .unwrap_or(defaults.min_connections),
            connect_timeout: parse_var("DATABASE_CONNECT_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
            sqlx_logging: parse_var("DATABASE_SQLX_LOGGING")?.unwrap_or(defaults.sqlx_logging),
            ..defaults
        })
    }

    pub fn connect_options(&self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(self.url.clone());
        opt.max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(self.connect_timeout)
            .acquire_timeout(self.connect_timeout)
            .sqlx_logging(self.sqlx_logging);
        opt
    }

    pub async fn connect(&self) -> Result<DatabaseConnection> {
        let db = Database::connect(self.connect_options()).await?;
        info!(max_connections = self.max_connections, "connected to database");
        Ok(db)
    }

    /// Connects and applies any pending schema migrations.
    #[cfg(feature = "migration")]
    pub async fn connect_and_migrate(&self) -> Result<DatabaseConnection> {
        use sea_orm_migration::MigratorTrait;

        let db = self.connect().await?;
        crate::migration::Migrator::up(&db, None).await?;
        info!("database schema is up to date");
        Ok(db)
    }
}

fn parse_var<T: FromStr>(key: &str) -> Result<Option<T>> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{key} has an invalid value: {raw:?}"))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(Error::Config(format!("{key}: {err}"))),
    }
}

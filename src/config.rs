use std::{env, time::Duration};

use anyhow::{Context, anyhow};
use sqlx::postgres::PgConnectOptions;

/// The three services built from this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Orders,
    Products,
    Users,
}

impl ServiceKind {
    pub fn name(self) -> &'static str {
        match self {
            ServiceKind::Orders => "order-service",
            ServiceKind::Products => "product-service",
            ServiceKind::Users => "user-service",
        }
    }

    /// Every service gets its own port so all three can run side by side.
    pub fn default_port(self) -> u16 {
        match self {
            ServiceKind::Orders => 8080,
            ServiceKind::Users => 8081,
            ServiceKind::Products => 8082,
        }
    }
}

/// Database settings assembled from the `POSTGRES_*` variables.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
}

impl DbConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| anyhow!("environment variable {key} is not set"))
        };

        let port = match lookup("POSTGRES_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("POSTGRES_PORT is not a valid port: {raw}"))?,
            None => 5432,
        };

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .with_context(|| {
                    format!("DB_MAX_CONNECTIONS must be a positive integer: {raw}")
                })?,
            None => 10,
        };

        Ok(Self {
            host: lookup("POSTGRES_HOST").unwrap_or_else(|| "localhost".to_string()),
            port,
            database: required("POSTGRES_DB")?,
            user: required("POSTGRES_USER")?,
            password: required("POSTGRES_PASSWORD")?,
            max_connections,
        })
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
}

impl ServerConfig {
    pub fn from_env(kind: ServiceKind) -> Self {
        Self::from_lookup(kind, |key| env::var(key).ok())
    }

    pub fn from_lookup<F>(kind: ServiceKind, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("APP_PORT")
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(kind.default_port());
        let timeout_secs = lookup("REQUEST_TIMEOUT_SECS")
            .and_then(|t| t.parse::<u64>().ok())
            .filter(|t| *t > 0)
            .unwrap_or(5);
        Self {
            host,
            port,
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }
}

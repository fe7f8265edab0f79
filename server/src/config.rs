//! Configuration management for the server.

use std::env;

use motorpool_engine::EngineConfig;

/// Which store backend to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// PostgreSQL via sqlx; requires `DATABASE_URL`.
    Postgres,
    /// In-process store, for development and demos. Data is lost on
    /// shutdown.
    Memory,
}

impl StoreBackend {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "postgres" => Some(Self::Postgres),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Memory => "memory",
        }
    }
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Store backend selector (`STORE_BACKEND`, default `postgres`)
    pub store_backend: StoreBackend,
    /// PostgreSQL connection URL; required for the postgres backend
    pub database_url: Option<String>,
    /// Booking id prefix (`BOOKING_ID_PREFIX`, default `BK`)
    pub booking_prefix: String,
    /// Customer id prefix (`CUSTOMER_ID_PREFIX`, default `CUST`)
    pub customer_prefix: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let store_backend = match env::var("STORE_BACKEND") {
            Ok(value) => {
                StoreBackend::parse(&value).ok_or(ConfigError::InvalidBackend(value))?
            }
            Err(_) => StoreBackend::Postgres,
        };

        let database_url = env::var("DATABASE_URL").ok();
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        let booking_prefix = env::var("BOOKING_ID_PREFIX").unwrap_or_else(|_| "BK".to_string());
        let customer_prefix =
            env::var("CUSTOMER_ID_PREFIX").unwrap_or_else(|_| "CUST".to_string());

        Ok(Self {
            host,
            port,
            store_backend,
            database_url,
            booking_prefix,
            customer_prefix,
        })
    }

    /// Engine configuration derived from the id-prefix settings.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            booking_prefix: self.booking_prefix.clone(),
            customer_prefix: self.customer_prefix.clone(),
            ..EngineConfig::default()
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DATABASE_URL environment variable is required for the postgres backend")]
    MissingDatabaseUrl,

    #[error("Invalid PORT value")]
    InvalidPort,

    #[error("Invalid STORE_BACKEND value: {0} (expected 'postgres' or 'memory')")]
    InvalidBackend(String),
}

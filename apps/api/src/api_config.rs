use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crawlpool_core::AppError;
use tracing_subscriber::EnvFilter;

/// Startup configuration, read once from the environment.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub redis_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub database_max_connections: u32,
    pub database_min_connections: u32,
    pub database_idle_timeout_seconds: u64,
    pub request_timeout_seconds: u64,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_env("DATABASE_URL")?;
        let redis_url = required_env("REDIS_URL")?;

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let database_max_connections = parse_env_u32("DATABASE_MAX_CONNECTIONS", 100)?;
        let database_min_connections = parse_env_u32("DATABASE_MIN_CONNECTIONS", 10)?;
        let database_idle_timeout_seconds = parse_env_u64("DATABASE_IDLE_TIMEOUT_SECONDS", 3600)?;
        let request_timeout_seconds = parse_env_u64("REQUEST_TIMEOUT_SECONDS", 30)?;

        if database_max_connections == 0 {
            return Err(AppError::Validation(
                "DATABASE_MAX_CONNECTIONS must be greater than zero".to_owned(),
            ));
        }
        if database_min_connections > database_max_connections {
            return Err(AppError::Validation(
                "DATABASE_MIN_CONNECTIONS must not exceed DATABASE_MAX_CONNECTIONS".to_owned(),
            ));
        }
        if request_timeout_seconds == 0 {
            return Err(AppError::Validation(
                "REQUEST_TIMEOUT_SECONDS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            migrate_only,
            database_url,
            redis_url,
            api_host,
            api_port,
            database_max_connections,
            database_min_connections,
            database_idle_timeout_seconds,
            request_timeout_seconds,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn parse_env_u32(name: &str, default: u32) -> Result<u32, AppError> {
    match env::var(name) {
        Ok(value) => value.parse::<u32>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, AppError> {
    match env::var(name) {
        Ok(value) => value.parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        Err(_) => Ok(default),
    }
}

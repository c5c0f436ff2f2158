use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

/// Minimum HS256 key length in bytes (256 bits).
pub const MIN_SECRET_BYTES: usize = 32;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
    pub store_lookup_timeout_ms: u64,
    pub app_host: String,
    pub app_port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL is not set")?;
        let secret = lookup("JWT_SECRET").context("JWT_SECRET is not set")?;
        if secret.len() < MIN_SECRET_BYTES {
            anyhow::bail!(
                "JWT_SECRET must be at least {} bytes, got {}",
                MIN_SECRET_BYTES,
                secret.len()
            );
        }

        let jwt = JwtConfig {
            secret,
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "projectboard".into()),
            audience: lookup("JWT_AUDIENCE").unwrap_or_else(|| "projectboard-users".into()),
        };

        Ok(Self {
            database_url,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            jwt,
            store_lookup_timeout_ms: parse_or(&lookup, "STORE_LOOKUP_TIMEOUT_MS", 3000)?,
            app_host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            app_port: parse_or(&lookup, "APP_PORT", 8080)?,
        })
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.app_host, self.app_port)
            .parse()
            .with_context(|| format!("APP_HOST {:?} is not an IP address", self.app_host))
    }

    pub fn store_lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.store_lookup_timeout_ms)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}

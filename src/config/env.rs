use crate::constants;
use anyhow::{anyhow, Context, Result};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Postgres,
    Memory,
}

/// Process settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub addr: String,
    pub storage: Storage,
    pub database_url: String,
    pub redis_url: String,
    pub secret: String,
    pub session_cache_ttl: Duration,
    pub token_ttl: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = match get("STORAGE").as_deref() {
            None | Some("postgres") => Storage::Postgres,
            Some("memory") => Storage::Memory,
            Some(other) => return Err(anyhow!("unknown STORAGE {:?}, expected postgres or memory", other)),
        };
        let required = |key: &str| get(key).ok_or_else(|| anyhow!("no {} in env", key));
        let (database_url, redis_url) = match storage {
            Storage::Postgres => (required("DATABASE_URL")?, required("REDIS_URL")?),
            Storage::Memory => (String::new(), String::new()),
        };
        let seconds = |key: &str, default: u64| -> Result<Duration> {
            match get(key) {
                Some(v) => Ok(Duration::from_secs(
                    v.parse().with_context(|| format!("{} must be a number of seconds", key))?,
                )),
                None => Ok(Duration::from_secs(default)),
            }
        };
        Ok(Self {
            addr: get("ADDR").unwrap_or_else(|| constants::DEFAULT_ADDR.to_string()),
            storage,
            database_url,
            redis_url,
            secret: required("SECRET")?,
            session_cache_ttl: seconds("SESSION_CACHE_TTL", constants::SESSION_CACHE_TTL)?,
            token_ttl: seconds("TOKEN_TTL", constants::TOKEN_TTL)?,
        })
    }
}

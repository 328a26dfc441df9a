use super::traits::SessionCache;
use crate::constants;
use crate::model::session::Session;
use crate::types::error::Result;
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use mobc_redis::{
    mobc::{Connection as PooledConnection, Pool},
    redis::{self, aio::Connection, Client},
    RedisConnectionManager,
};
use std::time::Duration;

pub type RedisPool = Pool<RedisConnectionManager>;

pub fn create_redis_pool(redis_url: &str) -> anyhow::Result<RedisPool> {
    let client = Client::open(redis_url).context("invalid REDIS_URL")?;
    let manager = RedisConnectionManager::new(client);
    Ok(Pool::builder()
        .max_open(constants::REDIS_POOL_SIZE)
        .build(manager))
}

pub async fn get_conn(pool: &RedisPool) -> anyhow::Result<PooledConnection<RedisConnectionManager>> {
    pool.get().await.map_err(|e| anyhow!("redis pool: {}", e))
}

pub async fn ping(pool: &RedisPool) -> anyhow::Result<()> {
    let mut conn = get_conn(pool).await?;
    let res: String = redis::cmd("PING")
        .query_async(&mut conn as &mut Connection)
        .await?;
    tracing::info!("redis: {}", res);
    Ok(())
}

pub fn session_key(token: &str) -> String {
    format!("{}:{}", constants::SESSION_KEY_PREFIX, token)
}

/// Sessions as JSON strings under `session:<token>`, expiring with the TTL.
#[derive(Clone)]
pub struct RedisSessionCache {
    pool: RedisPool,
}

impl RedisSessionCache {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionCache for RedisSessionCache {
    async fn set(&self, session: &Session, ttl: Duration) -> Result<()> {
        // EX 0 is rejected by redis; an expired entry is simply not cached
        if ttl.as_secs() == 0 {
            return Ok(());
        }
        let val = serde_json::to_string(session).context("session encode")?;
        let mut conn = get_conn(&self.pool).await?;
        redis::cmd("SET")
            .arg(session_key(&session.id))
            .arg(val)
            .arg("EX")
            .arg(ttl.as_secs())
            .query_async::<_, ()>(&mut conn as &mut Connection)
            .await
            .context("redis SET")?;
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<Session>> {
        let mut conn = get_conn(&self.pool).await?;
        let raw: Option<String> = redis::cmd("GET")
            .arg(session_key(token))
            .query_async(&mut conn as &mut Connection)
            .await
            .context("redis GET")?;
        match raw {
            Some(s) => Ok(Some(serde_json::from_str(&s).context("cached session decode")?)),
            None => Ok(None),
        }
    }
}

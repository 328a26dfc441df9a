use super::env::{Settings, Storage};
use crate::dao::{
    memory::{MemoryPostStore, MemorySessionCache, MemorySessionStore, MemoryUserStore},
    post_dao::PostRepository,
    postgres::{self, PgPostStore, PgSessionStore, PgUserStore},
    redis_db::{self, RedisSessionCache},
    session_dao::SessionManager,
    traits::{PostStore, SessionCache, SessionStore, UserStore},
    user_dao::UserRepository,
};
use crate::utils::{clock::SystemClock, generator::RandomIdGenerator, jwt::JwtKeys};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Shared handles every handler receives.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostRepository>,
    pub users: Arc<UserRepository>,
    pub sessions: Arc<SessionManager>,
}

/// The four stores a running service is assembled from.
pub struct Stores {
    pub posts: Arc<dyn PostStore>,
    pub users: Arc<dyn UserStore>,
    pub session_cache: Arc<dyn SessionCache>,
    pub session_store: Arc<dyn SessionStore>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            posts: Arc::new(MemoryPostStore::new()),
            users: Arc::new(MemoryUserStore::new()),
            session_cache: Arc::new(MemorySessionCache::new()),
            session_store: Arc::new(MemorySessionStore::new()),
        }
    }
}

impl AppState {
    pub fn new(stores: Stores, settings: &Settings) -> Self {
        let ids = Arc::new(RandomIdGenerator);
        Self {
            posts: Arc::new(PostRepository::new(stores.posts, ids.clone(), Arc::new(SystemClock))),
            users: Arc::new(UserRepository::new(stores.users, ids)),
            sessions: Arc::new(SessionManager::new(
                stores.session_cache,
                stores.session_store,
                JwtKeys::from_secret(settings.secret.as_bytes()),
                settings.session_cache_ttl,
                settings.token_ttl,
            )),
        }
    }
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // a second call (tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Connects the configured backends and bootstraps the schema.
pub async fn connect_stores(settings: &Settings) -> anyhow::Result<Stores> {
    if settings.storage == Storage::Memory {
        tracing::warn!("running with in-memory storage, nothing will be persisted");
        return Ok(Stores::in_memory());
    }

    let redis = redis_db::create_redis_pool(&settings.redis_url)?;
    redis_db::ping(&redis).await?;

    let pg = postgres::config_pg_pool(&settings.database_url)?;
    postgres::init_tables(&pg).await?;
    tracing::info!("postgres schema ready");

    Ok(Stores {
        posts: Arc::new(PgPostStore::new(pg.clone())),
        users: Arc::new(PgUserStore::new(pg.clone())),
        session_cache: Arc::new(RedisSessionCache::new(redis)),
        session_store: Arc::new(PgSessionStore::new(pg)),
    })
}

pub async fn init() -> anyhow::Result<(Settings, AppState)> {
    // a missing .env file is fine, the real environment still applies
    dotenv::dotenv().ok();
    init_tracing();

    let settings = Settings::from_env()?;
    let stores = connect_stores(&settings).await?;
    let state = AppState::new(stores, &settings);
    Ok((settings, state))
}

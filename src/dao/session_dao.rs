use super::traits::{SessionCache, SessionStore};
use crate::model::session::{Session, SessionClaims};
use crate::model::user::UserRef;
use crate::types::error::{Error, Result};
use crate::utils::{generator, jwt::JwtKeys, lock::ShardedLocks};
use std::sync::Arc;
use std::time::Duration;

/// Issues and resolves session tokens over two tiers: a lossy cache in
/// front of an authoritative store.
pub struct SessionManager {
    cache: Arc<dyn SessionCache>,
    store: Arc<dyn SessionStore>,
    keys: JwtKeys,
    cache_ttl: Duration,
    token_ttl: i64,
    locks: ShardedLocks,
}

impl SessionManager {
    pub fn new(
        cache: Arc<dyn SessionCache>,
        store: Arc<dyn SessionStore>,
        keys: JwtKeys,
        cache_ttl: Duration,
        token_ttl: Duration,
    ) -> Self {
        Self {
            cache,
            store,
            keys,
            cache_ttl,
            token_ttl: token_ttl.as_secs() as i64,
            locks: ShardedLocks::default(),
        }
    }

    /// Signs a token for `user` and records the session in both tiers.
    /// Only the durable write is required to succeed.
    pub async fn create_new_session(&self, user: &UserRef) -> Result<String> {
        let iat = chrono::Utc::now().timestamp();
        let claims = SessionClaims {
            user: user.clone(),
            iat,
            exp: iat + self.token_ttl,
            jti: generator::random_string(crate::constants::ID_LEN),
        };
        let token = self.keys.encode(&claims)?;
        let session = Session::new(token.clone(), user.clone());

        let _guard = self.locks.write(token.as_str()).await;
        if let Err(e) = self.cache.set(&session, self.cache_ttl).await {
            tracing::warn!(user = %user.username, "session cache write failed: {}", e);
        }
        self.store.create(&session, claims.exp).await?;
        tracing::info!(user = %user.username, "session created");
        Ok(token)
    }

    /// Verifies the token, then reads the cache and falls back to the
    /// durable tier. A durable hit is written back into the cache.
    pub async fn get_session(&self, token: &str) -> Result<Session> {
        let claims: SessionClaims = self.keys.decode(token).map_err(|kind| {
            tracing::debug!("rejected token: {:?}", kind);
            Error::NoAuth
        })?;

        let _guard = self.locks.read(token).await;
        match self.cache.get(token).await {
            Ok(Some(session)) => return Ok(session),
            Ok(None) => tracing::debug!(user = %claims.user.username, "session cache miss"),
            Err(e) => tracing::warn!("session cache read failed: {}", e),
        }

        let session = self.store.get(token).await?.ok_or(Error::NoAuth)?;
        let remaining = (claims.exp - chrono::Utc::now().timestamp()).max(0) as u64;
        let ttl = self.cache_ttl.min(Duration::from_secs(remaining));
        if let Err(e) = self.cache.set(&session, ttl).await {
            tracing::warn!("session cache backfill failed: {}", e);
        }
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::memory::{MemorySessionCache, MemorySessionStore};
    use crate::dao::traits::{MockSessionCache, MockSessionStore};
    use jsonwebtoken::{Algorithm, EncodingKey, Header};

    const SECRET: &[u8] = b"test-secret";

    fn manager(cache: Arc<dyn SessionCache>, store: Arc<dyn SessionStore>) -> SessionManager {
        SessionManager::new(
            cache,
            store,
            JwtKeys::from_secret(SECRET),
            Duration::from_secs(60),
            Duration::from_secs(3600),
        )
    }

    fn alice() -> UserRef {
        UserRef::new("u1", "alice")
    }

    fn broken() -> Error {
        Error::Store(anyhow::anyhow!("down"))
    }

    #[tokio::test]
    async fn created_session_resolves() {
        let sm = manager(Arc::new(MemorySessionCache::new()), Arc::new(MemorySessionStore::new()));
        let token = sm.create_new_session(&alice()).await.unwrap();
        let s = sm.get_session(&token).await.unwrap();
        assert_eq!(s.id, token);
        assert_eq!(s.user, alice());
    }

    #[tokio::test]
    async fn tokens_issued_together_differ() {
        let sm = manager(Arc::new(MemorySessionCache::new()), Arc::new(MemorySessionStore::new()));
        let a = sm.create_new_session(&alice()).await.unwrap();
        let b = sm.create_new_session(&alice()).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn cache_miss_falls_back_and_backfills() {
        let cache = Arc::new(MemorySessionCache::new());
        let sm = manager(cache.clone(), Arc::new(MemorySessionStore::new()));
        let token = sm.create_new_session(&alice()).await.unwrap();
        cache.evict(&token).await;
        assert!(!cache.contains(&token).await);
        assert_eq!(sm.get_session(&token).await.unwrap().user, alice());
        assert!(cache.contains(&token).await);
    }

    #[tokio::test]
    async fn cache_outage_degrades_to_durable_tier() {
        let mut cache = MockSessionCache::new();
        cache.expect_set().returning(|_, _| Err(broken()));
        cache.expect_get().returning(|_| Err(broken()));
        let sm = manager(Arc::new(cache), Arc::new(MemorySessionStore::new()));
        let token = sm.create_new_session(&alice()).await.unwrap();
        assert_eq!(sm.get_session(&token).await.unwrap().id, token);
    }

    #[tokio::test]
    async fn durable_write_failure_fails_creation() {
        let mut store = MockSessionStore::new();
        store.expect_create().returning(|_, _| Err(broken()));
        let sm = manager(Arc::new(MemorySessionCache::new()), Arc::new(store));
        assert!(matches!(sm.create_new_session(&alice()).await, Err(Error::Store(_))));
    }

    #[tokio::test]
    async fn unknown_session_is_no_auth() {
        let sm = manager(Arc::new(MemorySessionCache::new()), Arc::new(MemorySessionStore::new()));
        let other = manager(Arc::new(MemorySessionCache::new()), Arc::new(MemorySessionStore::new()));
        let token = other.create_new_session(&alice()).await.unwrap();
        assert!(matches!(sm.get_session(&token).await, Err(Error::NoAuth)));
    }

    #[tokio::test]
    async fn durable_read_failure_propagates() {
        let mut store = MockSessionStore::new();
        store.expect_create().returning(|_, _| Ok(()));
        store.expect_get().returning(|_| Err(broken()));
        let mut cache = MockSessionCache::new();
        cache.expect_set().returning(|_, _| Ok(()));
        cache.expect_get().returning(|_| Ok(None));
        let sm = manager(Arc::new(cache), Arc::new(store));
        let token = sm.create_new_session(&alice()).await.unwrap();
        assert!(matches!(sm.get_session(&token).await, Err(Error::Store(_))));
    }

    #[tokio::test]
    async fn tampered_token_is_rejected_whatever_the_tiers_hold() {
        let cache = Arc::new(MemorySessionCache::new());
        let store = Arc::new(MemorySessionStore::new());
        let sm = manager(cache.clone(), store.clone());
        let token = sm.create_new_session(&alice()).await.unwrap();

        let sig = token.rfind('.').unwrap() + 1;
        let flipped = if token[sig..].starts_with('A') { "B" } else { "A" };
        let mut forged = token.clone();
        forged.replace_range(sig..sig + 1, flipped);
        let session = Session::new(forged.clone(), alice());
        cache.set(&session, Duration::from_secs(60)).await.unwrap();
        store.create(&session, i64::MAX).await.unwrap();

        assert!(matches!(sm.get_session(&forged).await, Err(Error::NoAuth)));
        assert!(matches!(sm.get_session("garbage").await, Err(Error::NoAuth)));
    }

    #[tokio::test]
    async fn expired_and_foreign_algorithm_tokens_are_rejected() {
        let cache = Arc::new(MemorySessionCache::new());
        let sm = manager(cache.clone(), Arc::new(MemorySessionStore::new()));
        let now = chrono::Utc::now().timestamp();
        let claims = |exp| SessionClaims { user: alice(), iat: now, exp, jti: "j".into() };

        let expired = JwtKeys::from_secret(SECRET).encode(&claims(now - 3600)).unwrap();
        let hs512 = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims(now + 3600),
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();
        for token in [expired, hs512] {
            cache.set(&Session::new(token.clone(), alice()), Duration::from_secs(60)).await.unwrap();
            assert!(matches!(sm.get_session(&token).await, Err(Error::NoAuth)));
        }
    }
}

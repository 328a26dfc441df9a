//! Storage seams. Each trait names exactly the operations the core needs;
//! driver types stay behind the implementations in `postgres`, `redis_db`
//! and `memory`.

use crate::model::post::{Post, PostFilter, PostId, PostUpdate};
use crate::model::session::Session;
use crate::model::user::User;
use crate::types::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Document store holding post aggregates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>>;
    /// Matching posts in insertion order.
    async fn find(&self, filter: PostFilter) -> Result<Vec<Post>>;
    /// Assigns a fresh id and stores the post.
    async fn insert(&self, post: Post) -> Result<Post>;
    async fn update(&self, id: &PostId, update: PostUpdate) -> Result<()>;
    /// Number of removed documents.
    async fn delete(&self, id: &PostId) -> Result<u64>;
}

/// Relational store of accounts. `insert` reports a taken username as
/// `Error::AlreadyExist`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn insert(&self, user: &User) -> Result<()>;
}

/// Fast, lossy session tier.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionCache: Send + Sync {
    async fn set(&self, session: &Session, ttl: Duration) -> Result<()>;
    async fn get(&self, token: &str) -> Result<Option<Session>>;
}

/// Authoritative session tier.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// `expires_at` is unix seconds. Expired rows are never returned and
    /// `create` drops them.
    async fn create(&self, session: &Session, expires_at: i64) -> Result<()>;
    async fn get(&self, token: &str) -> Result<Option<Session>>;
}

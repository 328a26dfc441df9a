//! In-process stores. Used by the test suites and by `STORAGE=memory`,
//! which runs the whole service without Postgres or Redis.

use super::traits::{PostStore, SessionCache, SessionStore, UserStore};
use crate::model::post::{Post, PostFilter, PostId, PostUpdate};
use crate::model::session::Session;
use crate::model::user::User;
use crate::types::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryPostStore {
    posts: RwLock<Vec<Post>>,
    writes: AtomicUsize,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store; ids are kept as given.
    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: RwLock::new(posts),
            writes: AtomicUsize::new(0),
        }
    }

    /// Count of insert/update/delete calls served so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>> {
        Ok(self.posts.read().await.iter().find(|p| &p.id == id).cloned())
    }

    async fn find(&self, filter: PostFilter) -> Result<Vec<Post>> {
        Ok(self
            .posts
            .read()
            .await
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    async fn insert(&self, mut post: Post) -> Result<Post> {
        self.touch();
        post.id = PostId::generate();
        self.posts.write().await.push(post.clone());
        Ok(post)
    }

    async fn update(&self, id: &PostId, update: PostUpdate) -> Result<()> {
        self.touch();
        let mut posts = self.posts.write().await;
        if let Some(stored) = posts.iter_mut().find(|p| &p.id == id) {
            match update {
                PostUpdate::Views(views) => stored.views = views,
                PostUpdate::Comments(comments) => stored.comments = comments,
                PostUpdate::Replace(post) => *stored = post,
            }
        }
        Ok(())
    }

    async fn delete(&self, id: &PostId) -> Result<u64> {
        self.touch();
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|p| &p.id != id);
        Ok((before - posts.len()) as u64)
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>, // by username
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn insert(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(Error::AlreadyExist);
        }
        users.insert(user.username.clone(), user.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, (Session, i64)>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows held, expired or not.
    pub async fn entry_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, session: &Session, expires_at: i64) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, (_, exp)| *exp > now);
        sessions.insert(session.id.clone(), (session.clone(), expires_at));
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<Session>> {
        let now = chrono::Utc::now().timestamp();
        Ok(self
            .sessions
            .read()
            .await
            .get(token)
            .filter(|(_, expires_at)| *expires_at > now)
            .map(|(s, _)| s.clone()))
    }
}

#[derive(Default)]
pub struct MemorySessionCache {
    entries: RwLock<HashMap<String, (Session, Instant)>>,
}

impl MemorySessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn evict(&self, token: &str) {
        self.entries.write().await.remove(token);
    }

    pub async fn contains(&self, token: &str) -> bool {
        matches!(self.get(token).await, Ok(Some(_)))
    }

    /// Entries held, expired or not.
    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl SessionCache for MemorySessionCache {
    async fn set(&self, session: &Session, ttl: Duration) -> Result<()> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, (_, deadline)| *deadline > now);
        entries.insert(session.id.clone(), (session.clone(), now + ttl));
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<Session>> {
        Ok(self
            .entries
            .read()
            .await
            .get(token)
            .filter(|(_, deadline)| *deadline > Instant::now())
            .map(|(s, _)| s.clone()))
    }
}

use super::traits::{PostStore, SessionStore, UserStore};
use crate::constants;
use crate::model::post::{Post, PostFilter, PostId, PostUpdate};
use crate::model::session::Session;
use crate::model::user::{User, UserRef};
use crate::types::error::{Error, Result};
use anyhow::Context;
use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod};
use std::str::FromStr;
use tokio_postgres::error::SqlState;
use tokio_postgres::types::Json;
use tokio_postgres::Row;

pub fn config_pg_pool(database_url: &str) -> anyhow::Result<Pool> {
    let cfg = tokio_postgres::Config::from_str(database_url).context("invalid DATABASE_URL")?;
    let mgr_config = ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    };
    let mgr = Manager::from_config(cfg, tokio_postgres::NoTls, mgr_config);
    Ok(Pool::builder(mgr)
        .max_size(constants::POSTGRES_POOL_SIZE)
        .build()?)
}

pub async fn get_pg_connect(pool: &Pool) -> anyhow::Result<Object> {
    pool.get().await.context("postgres pool exhausted")
}

pub async fn init_tables(pool: &Pool) -> anyhow::Result<()> {
    let conn = get_pg_connect(pool).await?;
    conn.batch_execute(include_str!("../../sql/schema.sql"))
        .await
        .context("schema bootstrap failed")?;
    Ok(())
}

/// Posts as JSONB documents; `seq` keeps insertion order.
#[derive(Clone)]
pub struct PgPostStore {
    pool: Pool,
}

impl PgPostStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

fn post_from_row(row: &Row) -> Result<Post> {
    let doc: Json<Post> = row.try_get("doc").context("undecodable post document")?;
    Ok(doc.0)
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>> {
        let conn = get_pg_connect(&self.pool).await?;
        let row = conn
            .query_opt("SELECT doc FROM posts WHERE id = $1", &[&id.as_str()])
            .await
            .context("post lookup failed")?;
        row.as_ref().map(post_from_row).transpose()
    }

    async fn find(&self, filter: PostFilter) -> Result<Vec<Post>> {
        let conn = get_pg_connect(&self.pool).await?;
        let rows = match &filter {
            PostFilter::All => conn.query("SELECT doc FROM posts ORDER BY seq", &[]).await,
            PostFilter::Category(category) => {
                conn.query(
                    "SELECT doc FROM posts WHERE doc->>'category' = $1 ORDER BY seq",
                    &[category],
                )
                .await
            }
            PostFilter::AuthorUsername(username) => {
                conn.query(
                    "SELECT doc FROM posts WHERE doc->'author'->>'username' = $1 ORDER BY seq",
                    &[username],
                )
                .await
            }
        }
        .context("post listing failed")?;
        rows.iter().map(post_from_row).collect()
    }

    async fn insert(&self, mut post: Post) -> Result<Post> {
        post.id = PostId::generate();
        let conn = get_pg_connect(&self.pool).await?;
        conn.execute(
            "INSERT INTO posts (id, doc) VALUES ($1, $2)",
            &[&post.id.as_str(), &Json(&post)],
        )
        .await
        .context("post insert failed")?;
        Ok(post)
    }

    async fn update(&self, id: &PostId, update: PostUpdate) -> Result<()> {
        let conn = get_pg_connect(&self.pool).await?;
        let res = match update {
            PostUpdate::Views(views) => {
                conn.execute(
                    "UPDATE posts SET doc = jsonb_set(doc, '{views}', to_jsonb($2::BIGINT)) WHERE id = $1",
                    &[&id.as_str(), &(views as i64)],
                )
                .await
            }
            PostUpdate::Comments(comments) => {
                conn.execute(
                    "UPDATE posts SET doc = jsonb_set(doc, '{comments}', $2) WHERE id = $1",
                    &[&id.as_str(), &Json(&comments)],
                )
                .await
            }
            PostUpdate::Replace(post) => {
                conn.execute(
                    "UPDATE posts SET doc = $2 WHERE id = $1",
                    &[&id.as_str(), &Json(&post)],
                )
                .await
            }
        };
        res.context("post update failed")?;
        Ok(())
    }

    async fn delete(&self, id: &PostId) -> Result<u64> {
        let conn = get_pg_connect(&self.pool).await?;
        Ok(conn
            .execute("DELETE FROM posts WHERE id = $1", &[&id.as_str()])
            .await
            .context("post delete failed")?)
    }
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: Pool,
}

impl PgUserStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = get_pg_connect(&self.pool).await?;
        let row = conn
            .query_opt(
                "SELECT id, username, password FROM users WHERE username = $1",
                &[&username],
            )
            .await
            .context("user lookup failed")?;
        Ok(row.map(|r| User::new(r.get::<_, String>("id"), r.get::<_, String>("username"), r.get::<_, String>("password"))))
    }

    async fn insert(&self, user: &User) -> Result<()> {
        let conn = get_pg_connect(&self.pool).await?;
        match conn
            .execute(
                "INSERT INTO users (id, username, password) VALUES ($1, $2, $3)",
                &[&user.id, &user.username, &user.password],
            )
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if e.code() == Some(&SqlState::UNIQUE_VIOLATION) => Err(Error::AlreadyExist),
            Err(e) => Err(anyhow::Error::new(e).context("user insert failed").into()),
        }
    }
}

#[derive(Clone)]
pub struct PgSessionStore {
    pool: Pool,
}

impl PgSessionStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self, session: &Session, expires_at: i64) -> Result<()> {
        let conn = get_pg_connect(&self.pool).await?;
        let now = chrono::Utc::now().timestamp();
        conn.execute("DELETE FROM sessions WHERE expires_at <= $1", &[&now])
            .await
            .context("expired session purge failed")?;
        conn.execute(
            "INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3)",
            &[&session.id, &session.user.id, &expires_at],
        )
        .await
        .context("session insert failed")?;
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<Session>> {
        let conn = get_pg_connect(&self.pool).await?;
        let now = chrono::Utc::now().timestamp();
        let row = conn
            .query_opt(
                "SELECT u.id, u.username FROM sessions s JOIN users u ON u.id = s.user_id \
                 WHERE s.token = $1 AND s.expires_at > $2",
                &[&token, &now],
            )
            .await
            .context("session lookup failed")?;
        Ok(row.map(|r| Session::new(token, UserRef::new(r.get::<_, String>("id"), r.get::<_, String>("username")))))
    }
}

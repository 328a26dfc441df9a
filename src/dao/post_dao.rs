use super::traits::PostStore;
use crate::constants;
use crate::model::comment::Comment;
use crate::model::post::{Post, PostDraft, PostFilter, PostId, PostUpdate};
use crate::model::user::UserRef;
use crate::model::vote::VoteValue;
use crate::types::error::{Error, Result};
use crate::utils::clock::Clock;
use crate::utils::generator::IdGenerator;
use crate::utils::lock::ShardedLocks;
use std::sync::Arc;

/// Business rules over post aggregates.
///
/// Every mutation holds the write lock of the post's shard from the load
/// until the store has acknowledged the write, so two writers on the same
/// post never interleave. Listings go straight to the store.
pub struct PostRepository {
    store: Arc<dyn PostStore>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    locks: ShardedLocks,
}

impl PostRepository {
    pub fn new(store: Arc<dyn PostStore>, ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            ids,
            clock,
            locks: ShardedLocks::default(),
        }
    }

    pub async fn get_all(&self) -> Result<Vec<Post>> {
        self.store.find(PostFilter::All).await
    }

    pub async fn get_post_by_category(&self, category: &str) -> Result<Vec<Post>> {
        self.store.find(PostFilter::Category(category.to_string())).await
    }

    pub async fn get_posts_by_user_id(&self, username: &str) -> Result<Vec<Post>> {
        self.store.find(PostFilter::AuthorUsername(username.to_string())).await
    }

    pub async fn add_post(&self, draft: PostDraft, author: UserRef) -> Result<Post> {
        let post = Post::from_draft(draft, author, self.clock.timestamp());
        let post = self.store.insert(post).await?;
        tracing::info!(post_id = %post.id, author = %post.author.username, "post created");
        Ok(post)
    }

    /// Returns the post with its view counter already bumped and stored.
    /// A failed counter write fails the whole read.
    pub async fn get_post_by_id(&self, post_id: &str) -> Result<Post> {
        let id: PostId = post_id.parse()?;
        let _guard = self.locks.write(id.as_str()).await;
        let mut post = self.load(&id).await?;
        post.views += 1;
        self.store.update(&id, PostUpdate::Views(post.views)).await?;
        Ok(post)
    }

    pub async fn add_comment(&self, body: String, author: UserRef, post_id: &str) -> Result<Post> {
        let id: PostId = post_id.parse()?;
        let _guard = self.locks.write(id.as_str()).await;
        let mut post = self.load(&id).await?;
        post.comments.push(Comment {
            created: self.clock.timestamp(),
            author,
            body,
            id: self.ids.generate_id(constants::ID_LEN),
        });
        self.store
            .update(&id, PostUpdate::Comments(post.comments.clone()))
            .await?;
        Ok(post)
    }

    pub async fn delete_comment(&self, user_id: &str, post_id: &str, comment_id: &str) -> Result<Post> {
        let id: PostId = post_id.parse()?;
        let _guard = self.locks.write(id.as_str()).await;
        let mut post = self.load(&id).await?;
        post.remove_comment(user_id, comment_id)?;
        self.store
            .update(&id, PostUpdate::Comments(post.comments.clone()))
            .await?;
        tracing::debug!(post_id = %id, comment_id, "comment removed");
        Ok(post)
    }

    pub async fn up_vote(&self, post_id: &str, user_id: &str) -> Result<Post> {
        self.vote(post_id, user_id, VoteValue::Up).await
    }

    pub async fn down_vote(&self, post_id: &str, user_id: &str) -> Result<Post> {
        self.vote(post_id, user_id, VoteValue::Down).await
    }

    /// Dropping a vote the user never cast returns the post untouched.
    pub async fn un_vote(&self, post_id: &str, user_id: &str) -> Result<Post> {
        let id: PostId = post_id.parse()?;
        let _guard = self.locks.write(id.as_str()).await;
        let mut post = self.load(&id).await?;
        if post.retract_vote(user_id) {
            self.store.update(&id, PostUpdate::Replace(post.clone())).await?;
        }
        Ok(post)
    }

    /// Only the author may delete. The flag reports whether the store
    /// actually removed a record.
    pub async fn delete_post(&self, user_id: &str, post_id: &str) -> Result<bool> {
        let id: PostId = post_id.parse()?;
        let _guard = self.locks.write(id.as_str()).await;
        let post = self.load(&id).await?;
        if post.author.id != user_id {
            return Err(Error::NoAccess);
        }
        let removed = self.store.delete(&id).await? > 0;
        tracing::info!(post_id = %id, removed, "post deleted");
        Ok(removed)
    }

    async fn vote(&self, post_id: &str, user_id: &str, value: VoteValue) -> Result<Post> {
        let id: PostId = post_id.parse()?;
        let _guard = self.locks.write(id.as_str()).await;
        let mut post = self.load(&id).await?;
        if post.cast_vote(user_id, value) {
            self.store.update(&id, PostUpdate::Replace(post.clone())).await?;
        }
        Ok(post)
    }

    async fn load(&self, id: &PostId) -> Result<Post> {
        self.store.find_by_id(id).await?.ok_or(Error::NoPost)
    }
}

use super::comment::Comment;
use super::user::UserRef;
use super::vote::{Vote, VoteValue};
use crate::types::error::Error;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Opaque document id: 24 lowercase hex characters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct PostId(String);

impl PostId {
    pub const LEN: usize = 24;

    /// Placeholder carried by a post the store has not assigned an id to yet.
    pub fn nil() -> Self {
        Self("0".repeat(Self::LEN))
    }

    pub fn generate() -> Self {
        let bytes: [u8; 12] = rand::random();
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for PostId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == Self::LEN && s.bytes().all(|b| b.is_ascii_hexdigit()) {
            Ok(Self(s.to_ascii_lowercase()))
        } else {
            Err(Error::NoPost)
        }
    }
}

impl TryFrom<String> for PostId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PostId> for String {
    fn from(id: PostId) -> Self {
        id.0
    }
}

impl Display for PostId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    Text,
    Link,
}

/// Validated submission from the request layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub kind: PostKind,
    pub title: String,
    pub url: Option<String>,
    pub category: String,
    pub text: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub score: i64,
    pub views: u64,
    #[serde(rename = "type")]
    pub kind: PostKind,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub author: UserRef,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub votes: Vec<Vote>,
    pub comments: Vec<Comment>,
    pub created: String,
    #[serde(rename = "upvotePercentage")]
    pub upvote_percentage: u8,
    pub id: PostId,
}

/// Which posts a listing wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    All,
    Category(String),
    AuthorUsername(String),
}

impl PostFilter {
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            PostFilter::All => true,
            PostFilter::Category(c) => &post.category == c,
            PostFilter::AuthorUsername(u) => &post.author.username == u,
        }
    }
}

/// Partial or full write of a stored post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostUpdate {
    Views(u64),
    Comments(Vec<Comment>),
    Replace(Post),
}

impl Post {
    /// Fresh post as the author submits it: one upvote from the author,
    /// score 1, no views, 100% upvoted.
    pub fn from_draft(draft: PostDraft, author: UserRef, created: String) -> Self {
        let (url, text) = match draft.kind {
            PostKind::Text => (None, draft.text),
            PostKind::Link => (draft.url, None),
        };
        Self {
            score: 1,
            views: 0,
            kind: draft.kind,
            title: draft.title,
            url,
            votes: vec![Vote::new(VoteValue::Up, author.id.clone())],
            author,
            category: draft.category,
            text,
            comments: Vec::new(),
            created,
            upvote_percentage: 100,
            id: PostId::nil(),
        }
    }

    pub fn vote_of(&self, user_id: &str) -> Option<VoteValue> {
        self.votes.iter().find(|v| v.user == user_id).map(|v| v.vote)
    }

    /// Applies an up or down vote. Returns `false` when the user already
    /// voted the same way and nothing changed.
    pub fn cast_vote(&mut self, user_id: &str, value: VoteValue) -> bool {
        match self.votes.iter_mut().find(|v| v.user == user_id) {
            Some(existing) if existing.vote == value => return false,
            Some(existing) => {
                existing.vote = value;
                self.score += 2 * value.sign();
            }
            None => {
                self.votes.push(Vote::new(value, user_id));
                self.score += value.sign();
            }
        }
        self.upvote_percentage = upvote_percentage(&self.votes);
        true
    }

    /// Removes the user's vote. Returns `false` when there was none.
    pub fn retract_vote(&mut self, user_id: &str) -> bool {
        let pos = match self.votes.iter().position(|v| v.user == user_id) {
            Some(pos) => pos,
            None => return false,
        };
        let removed = self.votes.remove(pos);
        if self.votes.is_empty() {
            self.score = 0;
        } else {
            self.score -= removed.vote.sign();
        }
        self.upvote_percentage = upvote_percentage(&self.votes);
        true
    }

    /// Removes a comment written by `user_id`, keeping the order of the rest.
    pub fn remove_comment(&mut self, user_id: &str, comment_id: &str) -> Result<Comment, Error> {
        let pos = self
            .comments
            .iter()
            .position(|c| c.id == comment_id)
            .ok_or(Error::NoComment)?;
        if !self.comments[pos].is_written_by(user_id) {
            return Err(Error::NoAccess);
        }
        Ok(self.comments.remove(pos))
    }
}

/// `floor(100 * up / total)`, 0 when nobody has voted.
pub fn upvote_percentage(votes: &[Vote]) -> u8 {
    if votes.is_empty() {
        return 0;
    }
    let up = votes.iter().filter(|v| v.vote == VoteValue::Up).count();
    (100 * up / votes.len()) as u8
}

//! Reader comments attached to an article.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::article::ArticleId;
use super::user::AuthorSummary;

/// Comment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(Uuid);

impl CommentId {
    /// Generate a new random [`CommentId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Raised when comment content is blank after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyCommentError;

impl fmt::Display for EmptyCommentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Comment content is required")
    }
}

impl std::error::Error for EmptyCommentError {}

/// Trimmed, non-empty comment body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommentContent(String);

impl CommentContent {
    /// Trim `content`, rejecting blank input.
    pub fn new(content: impl AsRef<str>) -> Result<Self, EmptyCommentError> {
        let trimmed = content.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EmptyCommentError);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for CommentContent {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<CommentContent> for String {
    fn from(value: CommentContent) -> Self {
        value.0
    }
}

impl TryFrom<String> for CommentContent {
    type Error = EmptyCommentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A comment as stored and served; comments are never edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub article_id: ArticleId,
    pub author: AuthorSummary,
    pub content: CommentContent,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// New comment stamped at `now`.
    pub fn new(
        article_id: ArticleId,
        author: AuthorSummary,
        content: CommentContent,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: CommentId::random(),
            article_id,
            author,
            content,
            created_at: now,
            updated_at: now,
        }
    }
}

//! Driving ports for comment use-cases.
//!
//! Writes and reads are split so read-only adapters never receive a
//! mutation handle.

use async_trait::async_trait;

use crate::domain::{ArticleId, Comment, CommentContent, Error, UserId};

/// Request to comment on an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCommentRequest {
    pub article_id: ArticleId,
    pub author: UserId,
    pub content: CommentContent,
}

/// Domain use-case port for posting comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentsCommand: Send + Sync {
    /// Post a comment; fails with `not_found` when the article is absent.
    async fn create(&self, request: CreateCommentRequest) -> Result<Comment, Error>;
}

/// Domain use-case port for reading comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentsQuery: Send + Sync {
    /// Comments on an existing article, newest first. An article without
    /// comments yields an empty list.
    async fn list_for_article(&self, article_id: ArticleId) -> Result<Vec<Comment>, Error>;
}

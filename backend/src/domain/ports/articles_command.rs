//! Driving port for article mutations.
//!
//! Inbound adapters call this port to create, edit, delete, and like
//! articles. Ownership checks, slug uniqueness, and the publish transition
//! all sit behind it.

use async_trait::async_trait;

use crate::domain::{Article, ArticleChanges, ArticleDraft, ArticleId, Error, LikeToggle, UserId};

/// Request to create an article on behalf of `author`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateArticleRequest {
    pub author: UserId,
    pub draft: ArticleDraft,
}

/// Request from `caller` to edit an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateArticleRequest {
    pub article_id: ArticleId,
    pub caller: UserId,
    pub changes: ArticleChanges,
}

/// Domain use-case port for article mutations.
///
/// # Errors
///
/// - `invalid_request` when the draft or new title yields no slug.
/// - `not_found` when the article id does not exist.
/// - `forbidden` when the caller is not the author.
/// - `conflict` when the derived slug belongs to another article.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticlesCommand: Send + Sync {
    /// Create an article; publishing on creation stamps `published_at`.
    async fn create(&self, request: CreateArticleRequest) -> Result<Article, Error>;

    /// Apply a partial update. Author only.
    async fn update(&self, request: UpdateArticleRequest) -> Result<Article, Error>;

    /// Delete an article and all of its comments. Author only.
    async fn delete(&self, article_id: ArticleId, caller: UserId) -> Result<(), Error>;

    /// Flip the caller's like on an article.
    async fn toggle_like(&self, article_id: ArticleId, caller: UserId)
    -> Result<LikeToggle, Error>;
}

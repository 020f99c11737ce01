//! Port for article persistence.
//!
//! The store owns slug uniqueness and like-set atomicity: adapters reject a
//! duplicate slug at write time and flip a like in a single operation, so no
//! read-then-write window exists in callers.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Article, ArticleId, ArticleSummary, LikeToggle, Slug, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by article repository adapters.
    pub enum ArticlePersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "article repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "article repository query failed: {message}",
        /// The slug is already taken by another article.
        Conflict { message: String } =>
            "article slug already exists: {message}",
    }
}

/// Port for article storage and retrieval.
///
/// Returned articles carry their author summary already populated.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Insert a new article.
    async fn insert(&self, article: &Article) -> Result<(), ArticlePersistenceError>;

    /// Persist title, slug, body, excerpt, and publish state.
    ///
    /// The like set is not written; it only changes through
    /// [`ArticleRepository::toggle_like`]. Returns `false` when the article
    /// no longer exists.
    async fn update(&self, article: &Article) -> Result<bool, ArticlePersistenceError>;

    /// Fetch any article, published or not.
    async fn find_by_id(&self, id: &ArticleId) -> Result<Option<Article>, ArticlePersistenceError>;

    /// Fetch a published article by slug.
    async fn find_published_by_slug(
        &self,
        slug: &Slug,
    ) -> Result<Option<Article>, ArticlePersistenceError>;

    /// Return `true` when an article other than `exclude` uses `slug`.
    async fn slug_exists(
        &self,
        slug: &Slug,
        exclude: Option<ArticleId>,
    ) -> Result<bool, ArticlePersistenceError>;

    /// Page through published articles, newest publish time first.
    async fn list_published(
        &self,
        request: PageRequest,
    ) -> Result<Page<ArticleSummary>, ArticlePersistenceError>;

    /// Atomically add or remove `user` from the like set.
    ///
    /// Returns `None` when the article does not exist.
    async fn toggle_like(
        &self,
        id: &ArticleId,
        user: &UserId,
    ) -> Result<Option<LikeToggle>, ArticlePersistenceError>;

    /// Delete the article row. Returns `false` when nothing was deleted.
    async fn delete(&self, id: &ArticleId) -> Result<bool, ArticlePersistenceError>;
}

//! Driving port for article reads.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{ArticleDetails, ArticleId, ArticleSummary, Error, Slug};

/// Domain use-case port for reading articles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticlesQuery: Send + Sync {
    /// Published articles only, newest publish time first, without bodies.
    async fn list_published(&self, request: PageRequest) -> Result<Page<ArticleSummary>, Error>;

    /// Any article by id, including unpublished drafts, with its comment
    /// count.
    async fn find_by_id(&self, article_id: ArticleId) -> Result<ArticleDetails, Error>;

    /// A published article by slug, with its comment count.
    async fn find_published_by_slug(&self, slug: Slug) -> Result<ArticleDetails, Error>;
}

//! Port for comment persistence.

use async_trait::async_trait;

use crate::domain::{ArticleId, Comment};

use super::define_port_error;

define_port_error! {
    /// Errors raised by comment repository adapters.
    pub enum CommentPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "comment repository query failed: {message}",
        /// The parent article vanished before the comment was written.
        MissingArticle { article_id: String } =>
            "article {article_id} does not exist",
    }
}

/// Storage for article comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert a comment.
    async fn insert(&self, comment: &Comment) -> Result<(), CommentPersistenceError>;

    /// All comments on an article, newest first.
    async fn list_for_article(
        &self,
        article_id: &ArticleId,
    ) -> Result<Vec<Comment>, CommentPersistenceError>;

    async fn count_for_article(&self, article_id: &ArticleId)
    -> Result<u64, CommentPersistenceError>;

    /// Delete every comment on an article, returning how many were removed.
    async fn delete_for_article(
        &self,
        article_id: &ArticleId,
    ) -> Result<u64, CommentPersistenceError>;
}

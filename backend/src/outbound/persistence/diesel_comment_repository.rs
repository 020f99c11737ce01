//! PostgreSQL-backed `CommentRepository` implementation using Diesel ORM.
//!
//! Comments reference their article through `comments_article_id_fkey` with
//! `ON DELETE CASCADE`; an insert racing an article delete surfaces as
//! `CommentPersistenceError::MissingArticle`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{CommentPersistenceError, CommentRepository};
use crate::domain::{ArticleId, Comment};

use super::diesel_helpers::{
    DieselFailure, classify_diesel_error, collect_rows, count_to_u64, pool_error_message,
};
use super::models::{AuthorRow, CommentRow, NewCommentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{comments, users};

const ARTICLE_FOREIGN_KEY: &str = "comments_article_id_fkey";

/// Diesel-backed implementation of the comment repository port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CommentPersistenceError {
    CommentPersistenceError::connection(pool_error_message(error))
}

fn map_diesel_error(
    error: diesel::result::Error,
    operation: &str,
    article_id: &ArticleId,
) -> CommentPersistenceError {
    match classify_diesel_error(error, operation) {
        DieselFailure::Connection(message) => CommentPersistenceError::connection(message),
        DieselFailure::ForeignKeyViolation(constraint) if constraint == ARTICLE_FOREIGN_KEY => {
            CommentPersistenceError::missing_article(article_id.to_string())
        }
        DieselFailure::ForeignKeyViolation(constraint) => {
            warn!(%constraint, "unrecognised foreign key violation on comments");
            CommentPersistenceError::query("foreign key violation")
        }
        DieselFailure::UniqueViolation(constraint) => {
            CommentPersistenceError::query(format!("unique violation: {constraint}"))
        }
        DieselFailure::Query(message) => CommentPersistenceError::query(message),
    }
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn insert(&self, comment: &Comment) -> Result<(), CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(comments::table)
            .values(&NewCommentRow::from(comment))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, "insert comment", &comment.article_id))
    }

    async fn list_for_article(
        &self,
        article_id: &ArticleId,
    ) -> Result<Vec<Comment>, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(CommentRow, AuthorRow)> = comments::table
            .inner_join(users::table)
            .filter(comments::article_id.eq(*article_id.as_uuid()))
            .order((comments::created_at.desc(), comments::id.desc()))
            .select((CommentRow::as_select(), AuthorRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list comments", article_id))?;

        collect_rows(
            rows.into_iter()
                .map(|(comment, author)| comment.into_comment(author)),
            CommentPersistenceError::query,
        )
    }

    async fn count_for_article(
        &self,
        article_id: &ArticleId,
    ) -> Result<u64, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = comments::table
            .filter(comments::article_id.eq(*article_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "count comments", article_id))?;
        Ok(count_to_u64(count))
    }

    async fn delete_for_article(
        &self,
        article_id: &ArticleId,
    ) -> Result<u64, CommentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            comments::table.filter(comments::article_id.eq(*article_id.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(|err| map_diesel_error(err, "delete comments", article_id))?;
        Ok(u64::try_from(deleted).unwrap_or(u64::MAX))
    }
}

//! Translation from repository port errors to domain errors.
//!
//! Connection and query failures both surface as `internal_error`, which the
//! HTTP layer redacts; write-time uniqueness violations become `conflict`.

use tracing::error;

use crate::domain::Error;
use crate::domain::ports::{ArticlePersistenceError, CommentPersistenceError, UserPersistenceError};

/// Message returned whenever a derived slug is already taken.
pub const SLUG_CONFLICT_MESSAGE: &str = "An article with this title already exists";

/// Message returned whenever an email or username is already registered.
pub const ACCOUNT_CONFLICT_MESSAGE: &str = "Email or username already exists";

pub(crate) const ARTICLE_NOT_FOUND_MESSAGE: &str = "Article not found";

pub(crate) fn map_article_error(err: ArticlePersistenceError) -> Error {
    match err {
        ArticlePersistenceError::Connection { message } => {
            error!(%message, "article repository unavailable");
            Error::internal(format!("article repository unavailable: {message}"))
        }
        ArticlePersistenceError::Query { message } => {
            error!(%message, "article repository query failed");
            Error::internal(format!("article repository error: {message}"))
        }
        ArticlePersistenceError::Conflict { .. } => Error::conflict(SLUG_CONFLICT_MESSAGE),
    }
}

pub(crate) fn map_comment_error(err: CommentPersistenceError) -> Error {
    match err {
        CommentPersistenceError::Connection { message } => {
            error!(%message, "comment repository unavailable");
            Error::internal(format!("comment repository unavailable: {message}"))
        }
        CommentPersistenceError::Query { message } => {
            error!(%message, "comment repository query failed");
            Error::internal(format!("comment repository error: {message}"))
        }
        CommentPersistenceError::MissingArticle { .. } => {
            Error::not_found(ARTICLE_NOT_FOUND_MESSAGE)
        }
    }
}

pub(crate) fn map_user_error(err: UserPersistenceError) -> Error {
    match err {
        UserPersistenceError::Connection { message } => {
            error!(%message, "user repository unavailable");
            Error::internal(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            error!(%message, "user repository query failed");
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Conflict { .. } => Error::conflict(ACCOUNT_CONFLICT_MESSAGE),
    }
}

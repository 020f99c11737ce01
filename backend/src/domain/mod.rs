//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, and the services that enforce the blog's rules behind
//! the driving ports in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Email, Username, AuthorSummary: account identity.
//! - Article, ArticleDraft, ArticleChanges, Slug: publish and slug workflow.
//! - Comment, CommentContent: reader comments.
//! - ArticleService, CommentService, AccountService: port implementations.

mod account_service;
mod article;
mod article_service;
mod auth;
mod comment;
mod comment_service;
pub mod error;
mod password;
pub mod ports;
mod repository_errors;
mod slug;
mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::article::{
    Article, ArticleChanges, ArticleDetails, ArticleDraft, ArticleId, ArticleParts,
    ArticleSummary, ArticleValidationError, LikeToggle,
};
pub use self::article_service::ArticleService;
pub use self::auth::{CredentialsValidationError, LoginCredentials, PASSWORD_MIN, Registration};
pub use self::comment::{Comment, CommentContent, CommentId, EmptyCommentError};
pub use self::comment_service::CommentService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::password::{PasswordHash, PasswordHashError};
pub use self::repository_errors::{ACCOUNT_CONFLICT_MESSAGE, SLUG_CONFLICT_MESSAGE};
pub use self::slug::{Slug, SlugError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{AuthorSummary, Email, User, UserId, UserValidationError, Username};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;

//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters; driving
//! ports (`*Command`, `*Query`, `*Service`) are implemented by domain services
//! and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod article_repository;
mod articles_command;
mod articles_query;
mod comment_repository;
mod comments;
mod login_service;
mod registration_service;
mod user_profile_query;
mod user_repository;

#[cfg(test)]
pub use article_repository::MockArticleRepository;
pub use article_repository::{ArticlePersistenceError, ArticleRepository};
#[cfg(test)]
pub use articles_command::MockArticlesCommand;
pub use articles_command::{ArticlesCommand, CreateArticleRequest, UpdateArticleRequest};
#[cfg(test)]
pub use articles_query::MockArticlesQuery;
pub use articles_query::ArticlesQuery;
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentPersistenceError, CommentRepository};
#[cfg(test)]
pub use comments::{MockCommentsCommand, MockCommentsQuery};
pub use comments::{CommentsCommand, CommentsQuery, CreateCommentRequest};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use registration_service::MockRegistrationService;
pub use registration_service::RegistrationService;
#[cfg(test)]
pub use user_profile_query::MockUserProfileQuery;
pub use user_profile_query::UserProfileQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserCredentials, UserPersistenceError, UserRepository};

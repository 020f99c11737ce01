//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod articles;
pub mod cache_control;
pub mod comments;
pub mod envelope;
pub mod error;
pub mod health;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register every API handler; callers mount this under `/api/v1`.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use backend::inbound::http::api_routes;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(api_routes));
/// ```
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(articles::list_articles)
        .service(articles::create_article)
        .service(articles::get_article_by_slug)
        .service(articles::get_article)
        .service(articles::update_article)
        .service(articles::delete_article)
        .service(articles::toggle_like)
        .service(comments::list_comments)
        .service(comments::create_comment)
        .service(users::register)
        .service(users::login)
        .service(users::logout)
        .service(users::current_session);
}

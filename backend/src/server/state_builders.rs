//! Builders wiring repositories into the driving ports held by `HttpState`.
//!
//! The same three services back every deployment; only the repositories
//! change. With a database pool they are the Diesel adapters, otherwise one
//! shared in-memory store plays every repository role.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{ArticleRepository, CommentRepository, UserRepository};
use crate::domain::{AccountService, ArticleService, CommentService};
use crate::inbound::http::state::HttpStatePorts;
use crate::outbound::memory::InMemoryBlogStore;
use crate::outbound::persistence::{
    DbPool, DieselArticleRepository, DieselCommentRepository, DieselUserRepository,
};

/// Build the driving ports over any repository triple.
fn ports_over<U, A, C>(
    users: Arc<U>,
    articles: Arc<A>,
    comments: Arc<C>,
    clock: Arc<dyn Clock>,
) -> HttpStatePorts
where
    U: UserRepository + 'static,
    A: ArticleRepository + 'static,
    C: CommentRepository + 'static,
{
    let article_service = Arc::new(ArticleService::new(
        articles.clone(),
        comments.clone(),
        users.clone(),
        clock.clone(),
    ));
    let comment_service = Arc::new(CommentService::new(
        comments,
        articles,
        users.clone(),
        clock.clone(),
    ));
    let account_service = Arc::new(AccountService::new(users, clock));

    HttpStatePorts {
        articles: article_service.clone(),
        articles_query: article_service,
        comments: comment_service.clone(),
        comments_query: comment_service,
        registration: account_service.clone(),
        login: account_service.clone(),
        profile: account_service,
    }
}

/// Ports backed by a process-local store.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use backend::outbound::memory::InMemoryBlogStore;
/// use backend::server::in_memory_ports;
///
/// let ports = in_memory_ports(
///     Arc::new(InMemoryBlogStore::new()),
///     Arc::new(mockable::DefaultClock),
/// );
/// let _login = ports.login.clone();
/// ```
pub fn in_memory_ports(store: Arc<InMemoryBlogStore>, clock: Arc<dyn Clock>) -> HttpStatePorts {
    ports_over(store.clone(), store.clone(), store, clock)
}

/// Ports backed by PostgreSQL through a shared pool.
pub fn diesel_ports(pool: &DbPool, clock: Arc<dyn Clock>) -> HttpStatePorts {
    ports_over(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselArticleRepository::new(pool.clone())),
        Arc::new(DieselCommentRepository::new(pool.clone())),
        clock,
    )
}

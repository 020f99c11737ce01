//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    ArticlesCommand, ArticlesQuery, CommentsCommand, CommentsQuery, LoginService,
    RegistrationService, UserProfileQuery,
};

/// Parameter object bundling every driving port the handlers call.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub articles: Arc<dyn ArticlesCommand>,
    pub articles_query: Arc<dyn ArticlesQuery>,
    pub comments: Arc<dyn CommentsCommand>,
    pub comments_query: Arc<dyn CommentsQuery>,
    pub registration: Arc<dyn RegistrationService>,
    pub login: Arc<dyn LoginService>,
    pub profile: Arc<dyn UserProfileQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub articles: Arc<dyn ArticlesCommand>,
    pub articles_query: Arc<dyn ArticlesQuery>,
    pub comments: Arc<dyn CommentsCommand>,
    pub comments_query: Arc<dyn CommentsQuery>,
    pub registration: Arc<dyn RegistrationService>,
    pub login: Arc<dyn LoginService>,
    pub profile: Arc<dyn UserProfileQuery>,
    /// Page size applied when a listing request omits `limit`.
    pub default_page_size: u32,
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::inbound::http::state::HttpState;
    /// use backend::outbound::memory::InMemoryBlogStore;
    /// use backend::server::in_memory_ports;
    ///
    /// let store = Arc::new(InMemoryBlogStore::new());
    /// let state = HttpState::new(in_memory_ports(store, Arc::new(mockable::DefaultClock)), 10);
    /// let _articles = state.articles.clone();
    /// ```
    pub fn new(ports: HttpStatePorts, default_page_size: u32) -> Self {
        let HttpStatePorts {
            articles,
            articles_query,
            comments,
            comments_query,
            registration,
            login,
            profile,
        } = ports;
        Self {
            articles,
            articles_query,
            comments,
            comments_query,
            registration,
            login,
            profile,
            default_page_size,
        }
    }
}

//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::domain::ports::CreateArticleRequest;
use crate::domain::{Article, ArticleDraft, User};
use crate::inbound::http::envelope::Envelope;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{api_routes, validation};
use crate::outbound::memory::InMemoryBlogStore;
use crate::server::in_memory_ports;
use crate::test_support::{MutableClock, fixture_now, seed_user};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// In-memory blog wired the way the server wires it, with a controllable
/// clock.
pub struct TestBlog {
    pub store: Arc<InMemoryBlogStore>,
    pub clock: Arc<MutableClock>,
    pub state: HttpState,
}

impl TestBlog {
    /// Empty in-memory blog with the clock at the fixture time.
    pub fn new() -> Self {
        let store = Arc::new(InMemoryBlogStore::new());
        let clock = Arc::new(MutableClock::new(fixture_now()));
        let state = HttpState::new(in_memory_ports(store.clone(), clock.clone()), 10);
        Self {
            store,
            clock,
            state,
        }
    }

    /// Register `<username>@example.com` with password `secret1`.
    pub async fn seed_user(&self, username: &str) -> User {
        seed_user(&self.store, username).await
    }

    /// Create an article through the service so slug and timestamps are real.
    pub async fn seed_article(&self, author: &User, title: &str, published: bool) -> Article {
        let draft = ArticleDraft::try_new(title, "Body text", "Teaser", published)
            .expect("fixture draft");
        self.state
            .articles
            .create(CreateArticleRequest {
                author: author.id().clone(),
                draft,
            })
            .await
            .expect("fixture article")
    }

    /// Application under test: session cookies plus every `/api/v1` route.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .wrap(test_session_middleware())
            .app_data(web::Data::new(self.state.clone()))
            .app_data(validation::json_config())
            .app_data(validation::query_config())
            .service(web::scope("/api/v1").configure(api_routes))
    }
}

/// Log in through the real endpoint and return the session cookie.
pub async fn login_cookie<S, B>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": email, "password": "secret1"}))
            .to_request(),
    )
    .await;
    assert!(res.status().is_success(), "login failed: {}", res.status());
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Read a success envelope and return its `data`.
pub async fn read_envelope<B, T>(res: ServiceResponse<B>) -> T
where
    B: MessageBody,
    T: DeserializeOwned,
{
    let envelope: Envelope<T> = test::read_body_json(res).await;
    assert!(envelope.success);
    envelope.data
}

//! Server harness and shared world for the blog behaviour suite.
//!
//! The harness owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix uses `spawn_local` internally. The server runs over a real listener
//! with the in-memory store; `WorldFixture` stops it even if a step panics.

use std::cell::RefCell;
use std::collections::HashMap;
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::Arc;

use actix_web::cookie::Key;
use actix_web::dev::ServerHandle;
use actix_web::http::{Method, header};
use actix_web::{App, HttpServer, web};
use awc::Client;
use backend::Trace;
use backend::domain::TRACE_ID_HEADER;
use backend::inbound::http::session_config::{SessionSettings, session_middleware};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::{api_routes, validation};
use backend::outbound::memory::InMemoryBlogStore;
use backend::server::in_memory_ports;
use serde_json::{Value, json};
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

/// Password every scenario user registers with.
pub(crate) const PASSWORD: &str = "secret1";

/// What the last request returned.
#[derive(Debug, Default)]
pub(crate) struct LastResponse {
    pub(crate) status: u16,
    pub(crate) trace_id: Option<String>,
    pub(crate) body: Value,
}

impl LastResponse {
    /// `data` of a success envelope.
    pub(crate) fn data(&self) -> &Value {
        assert_eq!(
            self.body.get("success").and_then(Value::as_bool),
            Some(true),
            "expected success envelope, got {}",
            self.body
        );
        self.body.get("data").expect("data")
    }
}

pub(crate) struct BlogWorld {
    runtime: Runtime,
    local: LocalSet,
    base_url: String,
    server: ServerHandle,
    /// Cookie pair (`session=...`) per logged-in username.
    pub(crate) sessions: HashMap<String, String>,
    /// Article id per title used in the scenario.
    pub(crate) articles: HashMap<String, String>,
    pub(crate) first_published_at: Option<String>,
    pub(crate) last: LastResponse,
}

pub(crate) type SharedWorld = Rc<RefCell<BlogWorld>>;

pub(crate) struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        let ctx = self.world.borrow();
        let server = ctx.server.clone();
        ctx.local.block_on(&ctx.runtime, async move {
            server.stop(true).await;
        });
    }
}

async fn spawn_blog_server() -> Result<(String, ServerHandle), String> {
    let key = Key::generate();
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;
    let state = web::Data::new(HttpState::new(
        in_memory_ports(
            Arc::new(InMemoryBlogStore::new()),
            Arc::new(mockable::DefaultClock),
        ),
        10,
    ));

    let server = HttpServer::new(move || {
        let session = session_middleware(&SessionSettings {
            key: key.clone(),
            cookie_secure: false,
        });
        App::new()
            .app_data(state.clone())
            .app_data(validation::json_config())
            .app_data(validation::query_config())
            .wrap(Trace)
            .service(web::scope("/api/v1").wrap(session).configure(api_routes))
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);

    Ok((format!("http://{addr}"), handle))
}

pub(crate) fn world() -> WorldFixture {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();
    let (base_url, server) = local
        .block_on(&runtime, spawn_blog_server())
        .expect("server should start");

    WorldFixture {
        world: Rc::new(RefCell::new(BlogWorld {
            runtime,
            local,
            base_url,
            server,
            sessions: HashMap::new(),
            articles: HashMap::new(),
            first_published_at: None,
            last: LastResponse::default(),
        })),
    }
}

/// One JSON request against the running server.
pub(crate) struct Call<'a> {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) body: Option<Value>,
    /// Username whose session cookie is attached, if any.
    pub(crate) as_user: Option<&'a str>,
}

/// Perform `call`, record the response, and return the `Set-Cookie` pair.
pub(crate) fn send(world: &SharedWorld, call: Call<'_>) -> Option<String> {
    let cookie = call
        .as_user
        .map(|user| world.borrow().sessions.get(user).cloned().expect("logged in"));
    let (last, set_cookie) = {
        let ctx = world.borrow();
        let url = format!("{}{}", ctx.base_url, call.path);
        ctx.local.block_on(&ctx.runtime, async move {
            let mut request = Client::default().request(call.method, url);
            if let Some(cookie) = cookie {
                request = request.insert_header((header::COOKIE, cookie));
            }
            let mut response = match call.body {
                Some(body) => request.send_json(&body).await.expect("request"),
                None => request.send().await.expect("request"),
            };
            let set_cookie = response
                .headers()
                .get(header::SET_COOKIE)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.split(';').next())
                .map(str::to_owned);
            let trace_id = response
                .headers()
                .get(TRACE_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let status = response.status().as_u16();
            let bytes = response.body().await.expect("body");
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).expect("json body")
            };
            (
                LastResponse {
                    status,
                    trace_id,
                    body,
                },
                set_cookie,
            )
        })
    };
    world.borrow_mut().last = last;
    set_cookie
}

/// Register `<username>@example.com` and keep its session cookie.
pub(crate) fn log_in(world: &SharedWorld, username: &str) {
    let email = format!("{username}@example.com");
    send(
        world,
        Call {
            method: Method::POST,
            path: "/api/v1/auth/register".to_owned(),
            body: Some(json!({"email": email, "username": username, "password": PASSWORD})),
            as_user: None,
        },
    );
    assert_eq!(world.borrow().last.status, 201, "register {username}");

    let cookie = send(
        world,
        Call {
            method: Method::POST,
            path: "/api/v1/auth/login".to_owned(),
            body: Some(json!({"email": email, "password": PASSWORD})),
            as_user: None,
        },
    )
    .expect("session cookie");
    assert_eq!(world.borrow().last.status, 200, "login {username}");
    world
        .borrow_mut()
        .sessions
        .insert(username.to_owned(), cookie);
}

/// Id of the article created under `title` earlier in the scenario.
pub(crate) fn article_id(world: &SharedWorld, title: &str) -> String {
    world
        .borrow()
        .articles
        .get(title)
        .cloned()
        .unwrap_or_else(|| panic!("no article titled {title:?}"))
}

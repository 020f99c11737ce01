//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::{ServerConfig, ServerSettings, SettingsError, Toggles};
#[cfg(feature = "metrics")]
pub use metrics::build_prometheus;
pub use state_builders::{diesel_ports, in_memory_ports};

use std::sync::Arc;

use actix_web::cookie::Key;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::Trace;
#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::session_config::{SessionSettings, session_middleware};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{api_routes, validation};
use crate::outbound::memory::InMemoryBlogStore;
use config::Listen;
#[cfg(feature = "metrics")]
use metrics::MetricsLayer;

const SHUTDOWN_GRACE_SECS: u64 = 30;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
    } = deps;

    let session = session_middleware(&SessionSettings { key, cookie_secure });
    let api = web::scope("/api/v1").wrap(session).configure(api_routes);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(validation::json_config())
        .app_data(validation::query_config())
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Build handler state for the configured storage.
fn build_http_state(config: &ServerConfig) -> HttpState {
    let clock = Arc::new(DefaultClock);
    let ports = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            diesel_ports(pool, clock)
        }
        None => {
            info!("no database configured; using in-memory store");
            in_memory_ports(Arc::new(InMemoryBlogStore::new()), clock)
        }
    };
    HttpState::new(ports, config.default_page_size)
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// Readiness flips to healthy once the socket is bound. OS signals are not
/// handled here; the caller owns shutdown through [`Server::handle`].
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config));
    let ServerConfig {
        key,
        cookie_secure,
        listen,
        db_pool: _,
        default_page_size: _,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from_option(prometheus);

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .disable_signals()
    .shutdown_timeout(SHUTDOWN_GRACE_SECS);

    let server = match listen {
        Listen::Addr(addr) => server.bind(addr)?,
        Listen::Listener(listener) => server.listen(listener)?,
    }
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    //! App wiring checks through the full middleware stack.
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;

    fn deps() -> AppDependencies {
        let clock = Arc::new(DefaultClock);
        AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            http_state: web::Data::new(HttpState::new(
                in_memory_ports(Arc::new(InMemoryBlogStore::new()), clock),
                10,
            )),
            key: Key::generate(),
            cookie_secure: false,
        }
    }

    #[rstest]
    #[case("/api/v1/articles", StatusCode::OK)]
    #[case("/api/v1/auth/session", StatusCode::UNAUTHORIZED)]
    #[case("/health/live", StatusCode::OK)]
    #[case("/health/ready", StatusCode::SERVICE_UNAVAILABLE)]
    #[case("/api/v1/nothing-here", StatusCode::NOT_FOUND)]
    #[actix_web::test]
    async fn routes_are_mounted(#[case] uri: &str, #[case] expected: StatusCode) {
        let app = test::init_service(build_app(deps())).await;
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), expected);
        assert!(res.headers().contains_key(crate::domain::TRACE_ID_HEADER));
    }

    #[cfg(debug_assertions)]
    #[rstest]
    #[actix_web::test]
    async fn openapi_document_is_served_in_debug_builds() {
        let app = test::init_service(build_app(deps())).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api-docs/openapi.json")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }
}

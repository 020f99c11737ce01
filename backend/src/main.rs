//! Backend entry-point: loads settings, prepares storage, and serves the API.

use actix_web::dev::ServerHandle;
use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[cfg(feature = "metrics")]
use backend::server::build_prometheus;
use backend::inbound::http::health::HealthState;
use backend::inbound::http::session_config::{BuildMode, session_settings};
use backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use backend::server::{ServerConfig, ServerSettings, Toggles, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let default_page_size = settings.default_page_size().map_err(std::io::Error::other)?;
    let toggles = Toggles::from_env(&DefaultEnv::new()).map_err(std::io::Error::other)?;
    let session = session_settings(
        &settings.session_options(&toggles),
        BuildMode::from_debug_assertions(),
    )
    .map_err(std::io::Error::other)?;

    let mut config = ServerConfig::new(session, bind_addr).with_default_page_size(default_page_size);

    if let Some(url) = settings.database_url() {
        if toggles.run_migrations {
            let applied = run_migrations(url).await.map_err(std::io::Error::other)?;
            info!(applied, "database migrations complete");
        }
        let pool = DbPool::new(PoolConfig::new(url))
            .await
            .map_err(std::io::Error::other)?;
        config = config.with_db_pool(pool);
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(build_prometheus());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    actix_web::rt::spawn(drain_on_interrupt(health_state, server.handle()));
    info!(%bind_addr, "blog server listening");
    server.await
}

/// Fail liveness first so the load balancer stops routing, then let in-flight
/// requests finish.
async fn drain_on_interrupt(health_state: web::Data<HealthState>, handle: ServerHandle) {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "cannot listen for interrupt; graceful drain disabled");
        return;
    }
    info!("interrupt received; draining");
    health_state.mark_unhealthy();
    handle.stop(true).await;
}

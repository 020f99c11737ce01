//! Server settings and the runtime configuration built from them.
//!
//! [`ServerSettings`] is loaded by OrthoConfig from CLI flags, `BLOG_*`
//! environment variables, and an optional config file. On/off switches are
//! read separately into [`Toggles`] through [`mockable::Env`] so an unset
//! variable keeps its default. [`ServerConfig`] is the resolved form
//! `create_server` consumes: a session key, a socket, and an optional
//! database pool.

use std::net::{SocketAddr, TcpListener};
use std::path::PathBuf;

use actix_web::cookie::Key;
use mockable::Env;
use ortho_config::OrthoConfig;
use serde::Deserialize;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

use crate::inbound::http::session_config::{SessionOptions, SessionSettings};
use crate::outbound::persistence::DbPool;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_PAGE_SIZE: u32 = 10;
const ALLOW_EPHEMERAL_ENV: &str = "BLOG_SESSION_ALLOW_EPHEMERAL";
const COOKIE_SECURE_ENV: &str = "BLOG_COOKIE_SECURE";
const RUN_MIGRATIONS_ENV: &str = "BLOG_RUN_MIGRATIONS";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` is not a socket address.
    #[error("invalid bind address {value:?}: {message}")]
    BindAddr { value: String, message: String },
    /// `default_page_size` is outside 1..=100.
    #[error("default page size must be between 1 and {max}, got {value}")]
    PageSize { value: u32, max: u32 },
    /// A boolean switch holds something other than a recognised flag.
    #[error("invalid {name}={value:?}; expected {expected}")]
    Toggle {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Configuration values controlling the HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BLOG")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Path of the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Page size for listings that omit `limit`.
    pub default_page_size: Option<u32>,
}

impl ServerSettings {
    /// Return the listen address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: value.to_owned(),
            message: err.to_string(),
        })
    }

    /// Return the database URL, treating a blank value as unset.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Return the validated default page size.
    pub fn default_page_size(&self) -> Result<u32, SettingsError> {
        let value = self.default_page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if value == 0 || value > pagination::MAX_LIMIT {
            return Err(SettingsError::PageSize {
                value,
                max: pagination::MAX_LIMIT,
            });
        }
        Ok(value)
    }

    /// Session key inputs derived from these settings and `toggles`.
    pub fn session_options(&self, toggles: &Toggles) -> SessionOptions {
        SessionOptions {
            key_file: self
                .session_key_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE)),
            allow_ephemeral: toggles.session_allow_ephemeral,
            cookie_secure: toggles.cookie_secure,
        }
    }
}

/// Boolean switches read from `BLOG_SESSION_ALLOW_EPHEMERAL`,
/// `BLOG_COOKIE_SECURE`, and `BLOG_RUN_MIGRATIONS`.
///
/// # Examples
///
/// ```
/// use backend::server::Toggles;
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| {
///     (name == "BLOG_RUN_MIGRATIONS").then(|| "no".to_owned())
/// });
/// let toggles = Toggles::from_env(&env).expect("valid flags");
/// assert!(!toggles.run_migrations);
/// assert!(toggles.cookie_secure);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggles {
    /// Generate a throwaway session key when the key file is missing.
    pub session_allow_ephemeral: bool,
    /// Mark session cookies `Secure`.
    pub cookie_secure: bool,
    /// Apply embedded migrations before serving.
    pub run_migrations: bool,
}

impl Default for Toggles {
    fn default() -> Self {
        Self {
            session_allow_ephemeral: false,
            cookie_secure: true,
            run_migrations: true,
        }
    }
}

impl Toggles {
    /// Read every switch from `env`, keeping the default for unset ones.
    ///
    /// # Errors
    ///
    /// [`SettingsError::Toggle`] when a variable is set to an unrecognised
    /// value.
    pub fn from_env<E: Env>(env: &E) -> Result<Self, SettingsError> {
        let defaults = Self::default();
        Ok(Self {
            session_allow_ephemeral: toggle_from_env(
                env,
                ALLOW_EPHEMERAL_ENV,
                defaults.session_allow_ephemeral,
            )?,
            cookie_secure: toggle_from_env(env, COOKIE_SECURE_ENV, defaults.cookie_secure)?,
            run_migrations: toggle_from_env(env, RUN_MIGRATIONS_ENV, defaults.run_migrations)?,
        })
    }
}

fn toggle_from_env<E: Env>(env: &E, name: &'static str, default: bool) -> Result<bool, SettingsError> {
    match env.string(name) {
        Some(value) => parse_bool(&value).ok_or(SettingsError::Toggle {
            name,
            value,
            expected: BOOL_EXPECTED,
        }),
        None => Ok(default),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

/// Where the server accepts connections.
pub(crate) enum Listen {
    Addr(SocketAddr),
    Listener(TcpListener),
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) listen: Listen,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) default_page_size: u32,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a server configuration from resolved session settings.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            key: session.key,
            cookie_secure: session.cookie_secure,
            listen: Listen::Addr(bind_addr),
            db_pool: None,
            default_page_size: DEFAULT_PAGE_SIZE,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Serve on an already bound listener instead of binding `bind_addr`.
    #[must_use]
    pub fn with_listener(mut self, listener: TcpListener) -> Self {
        self.listen = Listen::Listener(listener);
        self
    }

    /// Attach a database connection pool; every port then uses Diesel.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Override the listing page size used when `limit` is omitted.
    #[must_use]
    pub fn with_default_page_size(mut self, default_page_size: u32) -> Self {
        self.default_page_size = default_page_size;
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }

    /// Return the configured address, or the listener's local address.
    pub fn bind_addr(&self) -> std::io::Result<SocketAddr> {
        match &self.listen {
            Listen::Addr(addr) => Ok(*addr),
            Listen::Listener(listener) => listener.local_addr(),
        }
    }
}

//! Session cookie configuration.
//!
//! Resolves the cookie signing key from the configured key file and builds
//! the session middleware. Debug builds fall back to an ephemeral key so a
//! fresh checkout runs without secrets; release builds refuse to.

use std::path::{Path, PathBuf};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite};
use tracing::warn;
use zeroize::Zeroize;

/// Cookie carrying the signed, encrypted session.
pub const SESSION_COOKIE_NAME: &str = "session";

const SESSION_KEY_MIN_LEN: usize = 64;

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Missing key files are tolerated with a warning.
    Debug,
    /// Key files must exist and be long enough.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use backend::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Inputs taken from server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub key_file: PathBuf,
    pub allow_ephemeral: bool,
    pub cookie_secure: bool,
}

/// Resolved session settings.
pub struct SessionSettings {
    /// Signing and encryption key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
}

/// Errors raised while resolving session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// Reading the session key file failed and no fallback is allowed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The key file is too short for release builds.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// Release builds must not allow ephemeral session keys.
    #[error("ephemeral session keys are not allowed in release builds")]
    EphemeralNotAllowed,
}

/// Resolve [`SessionSettings`] for `mode`.
///
/// # Examples
///
/// ```rust
/// use backend::inbound::http::session_config::{BuildMode, SessionOptions, session_settings};
///
/// let options = SessionOptions {
///     key_file: "/nonexistent/session_key".into(),
///     allow_ephemeral: true,
///     cookie_secure: false,
/// };
/// let settings = session_settings(&options, BuildMode::Debug).unwrap();
/// assert!(!settings.cookie_secure);
/// ```
pub fn session_settings(
    options: &SessionOptions,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    if mode == BuildMode::Release && options.allow_ephemeral {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    if mode == BuildMode::Release && !options.cookie_secure {
        warn!("session cookies are not marked Secure in a release build");
    }
    let key = load_key(&options.key_file, mode, options.allow_ephemeral)?;
    Ok(SessionSettings {
        key,
        cookie_secure: options.cookie_secure,
    })
}

fn load_key(path: &Path, mode: BuildMode, allow_ephemeral: bool) -> Result<Key, SessionConfigError> {
    match std::fs::read(path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                if mode == BuildMode::Debug {
                    warn!(
                        path = %path.display(),
                        length,
                        "session key too short; using temporary key (dev only)"
                    );
                    return Ok(Key::generate());
                }
                return Err(SessionConfigError::KeyTooShort {
                    path: path.to_path_buf(),
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode == BuildMode::Debug || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(error) => Err(SessionConfigError::KeyRead {
            path: path.to_path_buf(),
            source: error,
        }),
    }
}

/// Cookie session middleware for the resolved settings.
pub fn session_middleware(settings: &SessionSettings) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), settings.key.clone())
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_secure(settings.cookie_secure)
        .cookie_same_site(SameSite::Lax)
        .cookie_http_only(true)
        .build()
}

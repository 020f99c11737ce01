//! Per-request correlation identifier.
//!
//! The HTTP middleware puts a [`TraceId`] into Tokio task-local storage for
//! the lifetime of a request; domain errors and log spans read it back via
//! [`TraceId::current`]. Task locals do not follow `tokio::spawn` or
//! `spawn_blocking`, so work moved off the request task must be wrapped in
//! [`TraceId::scope`] or [`TraceId::sync_scope`].

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

/// Header used both to accept an upstream identifier and to echo ours.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static TRACE_ID: TraceId;
}

/// UUID naming one request across logs, error bodies, and response headers.
///
/// # Examples
/// ```
/// use backend::domain::TraceId;
///
/// async fn handler() {
///     if let Some(id) = TraceId::current() {
///         tracing::info!(%id, "handling request");
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Reuse `inbound` when it is a well-formed UUID, otherwise mint one.
    ///
    /// The nil UUID is treated as absent so a misconfigured proxy cannot
    /// collapse every request onto one identifier.
    ///
    /// ```
    /// use backend::domain::TraceId;
    ///
    /// let upstream = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
    /// assert_eq!(TraceId::adopt_or_generate(Some(upstream)).to_string(), upstream);
    /// assert_ne!(TraceId::adopt_or_generate(Some("not-a-uuid")).to_string(), "not-a-uuid");
    /// ```
    #[must_use]
    pub fn adopt_or_generate(inbound: Option<&str>) -> Self {
        inbound
            .and_then(|raw| raw.trim().parse::<Self>().ok())
            .filter(|id| !id.0.is_nil())
            .unwrap_or_else(Self::generate)
    }

    /// Identifier of the request currently being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    /// Drive `fut` with `trace_id` in scope.
    ///
    /// ```
    /// use backend::domain::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let trace_id = TraceId::generate();
    /// let observed = TraceId::scope(trace_id, async { TraceId::current() }).await;
    /// assert_eq!(observed, Some(trace_id));
    /// # });
    /// ```
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }

    /// Run `f` with `trace_id` in scope, for blocking-pool closures.
    pub fn sync_scope<R>(trace_id: Self, f: impl FnOnce() -> R) -> R {
        TRACE_ID.sync_scope(trace_id, f)
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

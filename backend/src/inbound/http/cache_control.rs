//! Shared cache-control policies for HTTP handlers.

use actix_web::http::header::{CACHE_CONTROL, HeaderName};

/// Probe and session responses must never be served from a cache.
pub const NO_STORE: &str = "no-store";

/// Header tuple forbidding any caching of the response.
pub fn no_store_header() -> (HeaderName, &'static str) {
    (CACHE_CONTROL, NO_STORE)
}

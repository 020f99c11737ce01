//! Blog backend: articles with a draft and publish workflow, likes,
//! comments, and cookie-session accounts.
//!
//! The crate is laid out hexagonally: [`domain`] holds entities, services,
//! and ports; [`inbound`] adapts HTTP onto the driving ports; [`outbound`]
//! implements the repository ports in memory and on PostgreSQL; [`server`]
//! wires them together.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
#[cfg(test)]
pub(crate) mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request tracing middleware.
pub use middleware::Trace;

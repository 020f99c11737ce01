//! Success envelope shared by every JSON endpoint.
//!
//! Failures are rendered by [`crate::inbound::http::error`]; this module only
//! covers the `{ "success": true, "data": ... }` side.

use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};

/// Successful response body.
///
/// # Examples
/// ```
/// use backend::inbound::http::envelope::Envelope;
///
/// let body = serde_json::to_value(Envelope::new(42)).unwrap();
/// assert_eq!(body, serde_json::json!({"success": true, "data": 42}));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T> Envelope<T> {
    /// Successful envelope around `data`.
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// `200 OK` with `data` wrapped in the success envelope.
pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(Envelope::new(data))
}

/// `201 Created` with `data` wrapped in the success envelope.
pub fn created<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Created().json(Envelope::new(data))
}

/// Payload for endpoints that only confirm an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    /// Confirmation carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

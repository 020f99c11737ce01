//! Boundary validation: turn malformed requests and domain validation
//! failures into `400 Bad Request` errors with field context.

use actix_web::{HttpRequest, error::JsonPayloadError, error::QueryPayloadError, web};
use pagination::PaginationError;
use serde_json::json;
use tracing::debug;

use crate::domain::{
    ArticleId, ArticleValidationError, CredentialsValidationError, EmptyCommentError, Error,
    SlugError, UserValidationError,
};

/// Largest JSON body accepted by any endpoint.
const JSON_LIMIT_BYTES: usize = 256 * 1024;

/// Validation error codes reported under `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidSlug,
    InvalidEmail,
    InvalidUsername,
    PasswordTooShort,
    OutOfRange,
    MalformedBody,
    MalformedQuery,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidSlug => "invalid_slug",
            ErrorCode::InvalidEmail => "invalid_email",
            ErrorCode::InvalidUsername => "invalid_username",
            ErrorCode::PasswordTooShort => "password_too_short",
            ErrorCode::OutOfRange => "out_of_range",
            ErrorCode::MalformedBody => "malformed_body",
            ErrorCode::MalformedQuery => "malformed_query",
        }
    }
}

fn field_error(message: impl Into<String>, field: &str, code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

fn fields_error(message: impl Into<String>, fields: &[&str], code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "fields": fields,
        "code": code.as_str(),
    }))
}

/// Parse an article id taken from the request path.
pub(crate) fn parse_article_id(raw: &str) -> Result<ArticleId, Error> {
    raw.parse().map_err(|_| {
        Error::invalid_request("Invalid article id").with_details(json!({
            "field": "id",
            "value": raw,
            "code": ErrorCode::InvalidUuid.as_str(),
        }))
    })
}

pub(crate) fn map_article_validation_error(err: ArticleValidationError) -> Error {
    match err {
        ArticleValidationError::MissingFields => fields_error(
            err.to_string(),
            &["title", "content", "excerpt"],
            ErrorCode::MissingField,
        ),
        ArticleValidationError::Slug(slug) => map_slug_error(slug),
    }
}

pub(crate) fn map_slug_error(err: SlugError) -> Error {
    let field = match err {
        SlugError::NoSlugCharacters => "title",
        SlugError::Malformed => "slug",
    };
    field_error(err.to_string(), field, ErrorCode::InvalidSlug)
}

pub(crate) fn map_credentials_error(err: CredentialsValidationError) -> Error {
    match &err {
        CredentialsValidationError::MissingFields => fields_error(
            err.to_string(),
            &["email", "username", "password"],
            ErrorCode::MissingField,
        ),
        CredentialsValidationError::PasswordTooShort { .. } => {
            field_error(err.to_string(), "password", ErrorCode::PasswordTooShort)
        }
        CredentialsValidationError::User(user) => match user {
            UserValidationError::EmptyEmail | UserValidationError::InvalidEmail => {
                field_error(err.to_string(), "email", ErrorCode::InvalidEmail)
            }
            UserValidationError::EmptyUsername | UserValidationError::UsernameTooLong { .. } => {
                field_error(err.to_string(), "username", ErrorCode::InvalidUsername)
            }
            UserValidationError::EmptyId | UserValidationError::InvalidId => {
                field_error(err.to_string(), "id", ErrorCode::InvalidUuid)
            }
        },
    }
}

pub(crate) fn map_comment_content_error(err: EmptyCommentError) -> Error {
    field_error(err.to_string(), "content", ErrorCode::MissingField)
}

pub(crate) fn map_pagination_error(err: PaginationError) -> Error {
    let field = match err {
        PaginationError::PageOutOfRange => "page",
        PaginationError::LimitOutOfRange => "limit",
    };
    field_error(err.to_string(), field, ErrorCode::OutOfRange)
}

fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(path = %req.path(), error = %err, "rejected JSON body");
    let message = match &err {
        JsonPayloadError::ContentType => "Expected an application/json body".to_owned(),
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            "Request body is too large".to_owned()
        }
        JsonPayloadError::Deserialize(inner) => format!("Invalid request body: {inner}"),
        _ => "Invalid request body".to_owned(),
    };
    Error::invalid_request(message)
        .with_details(json!({ "code": ErrorCode::MalformedBody.as_str() }))
        .into()
}

fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(path = %req.path(), error = %err, "rejected query string");
    Error::invalid_request(format!("Invalid query string: {err}"))
        .with_details(json!({ "code": ErrorCode::MalformedQuery.as_str() }))
        .into()
}

/// JSON extractor config rendering payload errors in the failure envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT_BYTES)
        .error_handler(json_error_handler)
}

/// Query extractor config rendering parse errors in the failure envelope.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error_handler)
}

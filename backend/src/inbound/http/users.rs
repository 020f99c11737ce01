//! Account API handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"email":"a@x.com","username":"a","password":"secret1"}
//! POST /api/v1/auth/login    {"email":"a@x.com","password":"secret1"}
//! POST /api/v1/auth/logout
//! GET  /api/v1/auth/session
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::ToSchema;

use crate::domain::{ErrorCode, LoginCredentials, Registration, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::no_store_header;
use crate::inbound::http::envelope::{Envelope, MessageResponse, created, ok};
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::session::{SessionContext, UNAUTHORIZED_MESSAGE};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_credentials_error;

/// Body for `POST /api/v1/auth/register`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    #[schema(example = "a@x.com")]
    pub email: Option<String>,
    #[schema(example = "a")]
    pub username: Option<String>,
    #[schema(example = "secret1")]
    pub password: Option<String>,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = crate::domain::CredentialsValidationError;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Registration::try_from_parts(
            value.email.as_deref().unwrap_or_default(),
            value.username.as_deref().unwrap_or_default(),
            value.password.as_deref().unwrap_or_default(),
        )
    }
}

/// Body for `POST /api/v1/auth/login`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = crate::domain::CredentialsValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        LoginCredentials::try_from_parts(
            value.email.as_deref().unwrap_or_default(),
            value.password.as_deref().unwrap_or_default(),
        )
    }
}

/// Account view. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(value_type = String, format = Uuid)]
    pub id: String,
    pub email: String,
    pub username: String,
    pub avatar: Option<String>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().as_ref().to_owned(),
            username: user.username().as_ref().to_owned(),
            avatar: user.avatar().map(str::to_owned),
        }
    }
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Missing fields or short password", body = ErrorEnvelope),
        (status = 409, description = "Email or username already exists", body = ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner()).map_err(map_credentials_error)?;
    let user = state.registration.register(registration).await?;
    Ok(created(UserResponse::from(&user)))
}

/// Authenticate and establish a session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Missing fields", body = ErrorEnvelope),
        (status = 401, description = "Invalid credentials", body = ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_credentials_error)?;
    let user_id = state.login.authenticate(&credentials).await?;
    let user = state.profile.fetch_profile(&user_id).await?;
    session.persist_user(&user_id)?;
    info!(user_id = %user_id, "session established");
    Ok(ok(UserResponse::from(&user)))
}

/// Drop the session cookie. Succeeds for anonymous callers too.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 200, description = "Session cleared", body = MessageResponse)),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    ok(MessageResponse::new("Logged out"))
}

/// The caller's account, or 401 when there is no live session.
#[utoipa::path(
    get,
    path = "/api/v1/auth/session",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "No session", body = ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "currentSession"
)]
#[get("/auth/session")]
pub async fn current_session(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let user = match state.profile.fetch_profile(&user_id).await {
        Ok(user) => user,
        Err(err) if err.code() == ErrorCode::NotFound => {
            debug!(user_id = %user_id, "session refers to a missing user; clearing");
            session.clear();
            return Err(crate::domain::Error::unauthorized(UNAUTHORIZED_MESSAGE));
        }
        Err(err) => return Err(err),
    };
    Ok(HttpResponse::Ok()
        .insert_header(no_store_header())
        .json(Envelope::new(UserResponse::from(&user))))
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;

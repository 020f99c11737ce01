//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `/api/v1`, the health probes, the
//! request and response DTOs, and the session cookie security scheme. Success
//! bodies are documented unwrapped; at runtime they travel inside
//! `{ "success": true, "data": ... }`.
//!
//! The document is served by Swagger UI in debug builds and printed by the
//! `openapi-dump` binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::AuthorSummary;
use crate::inbound::http::articles::{
    ArticleListItem, ArticleListResponse, ArticleResponse, CreateArticleBody, LikeResponse,
    PaginationResponse, UpdateArticleBody,
};
use crate::inbound::http::comments::{CommentResponse, CreateCommentBody};
use crate::inbound::http::envelope::MessageResponse;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::users::{LoginRequest, RegisterRequest, UserResponse};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the blog API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Blog backend API",
        description = "Articles with a draft and publish workflow, likes, comments, and accounts.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::articles::list_articles,
        crate::inbound::http::articles::get_article,
        crate::inbound::http::articles::get_article_by_slug,
        crate::inbound::http::articles::create_article,
        crate::inbound::http::articles::update_article,
        crate::inbound::http::articles::delete_article,
        crate::inbound::http::articles::toggle_like,
        crate::inbound::http::comments::list_comments,
        crate::inbound::http::comments::create_comment,
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_session,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ArticleResponse,
        ArticleListItem,
        ArticleListResponse,
        PaginationResponse,
        LikeResponse,
        CreateArticleBody,
        UpdateArticleBody,
        CommentResponse,
        CreateCommentBody,
        RegisterRequest,
        LoginRequest,
        UserResponse,
        AuthorSummary,
        MessageResponse,
        ErrorEnvelope,
    )),
    tags(
        (name = "articles", description = "Articles, publishing, and likes"),
        (name = "comments", description = "Reader comments on articles"),
        (name = "auth", description = "Registration and cookie sessions"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

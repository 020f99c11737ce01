//! Comment API handlers.
//!
//! ```text
//! GET  /api/v1/articles/{id}/comments
//! POST /api/v1/articles/{id}/comments {"content":"Nice post"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::CreateCommentRequest;
use crate::domain::{AuthorSummary, Comment, CommentContent};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{created, ok};
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{map_comment_content_error, parse_article_id};

/// Body for `POST /api/v1/articles/{id}/comments`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateCommentBody {
    #[schema(example = "Nice post")]
    pub content: Option<String>,
}

/// Comment view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    #[schema(value_type = String, format = Uuid)]
    pub id: String,
    #[schema(value_type = String, format = Uuid)]
    pub article: String,
    pub author: AuthorSummary,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id.to_string(),
            article: comment.article_id.to_string(),
            author: comment.author,
            content: comment.content.into(),
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

/// List an article's comments, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/articles/{id}/comments",
    params(("id" = String, Path, description = "Article id")),
    responses(
        (status = 200, description = "Comments, possibly empty", body = [CommentResponse]),
        (status = 400, description = "Malformed id", body = ErrorEnvelope),
        (status = 404, description = "Article not found", body = ErrorEnvelope)
    ),
    tags = ["comments"],
    operation_id = "listComments",
    security([])
)]
#[get("/articles/{id}/comments")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let article_id = parse_article_id(&path)?;
    let comments = state.comments_query.list_for_article(article_id).await?;
    Ok(ok(comments
        .into_iter()
        .map(CommentResponse::from)
        .collect::<Vec<_>>()))
}

/// Comment on an article as the caller.
#[utoipa::path(
    post,
    path = "/api/v1/articles/{id}/comments",
    params(("id" = String, Path, description = "Article id")),
    request_body = CreateCommentBody,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Empty comment", body = ErrorEnvelope),
        (status = 401, description = "Login required", body = ErrorEnvelope),
        (status = 404, description = "Article not found", body = ErrorEnvelope)
    ),
    tags = ["comments"],
    operation_id = "createComment"
)]
#[post("/articles/{id}/comments")]
pub async fn create_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CreateCommentBody>,
) -> ApiResult<HttpResponse> {
    let author = session.require_user_id()?;
    let article_id = parse_article_id(&path)?;
    let content = CommentContent::new(payload.into_inner().content.unwrap_or_default())
        .map_err(map_comment_content_error)?;
    let comment = state
        .comments
        .create(CreateCommentRequest {
            article_id,
            author,
            content,
        })
        .await?;
    Ok(created(CommentResponse::from(comment)))
}

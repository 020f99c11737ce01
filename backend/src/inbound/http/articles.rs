//! Article API handlers.
//!
//! ```text
//! GET    /api/v1/articles?page=1&limit=10
//! GET    /api/v1/articles/{id}
//! GET    /api/v1/articles/slug/{slug}
//! POST   /api/v1/articles {"title":"Hello","content":"...","excerpt":"...","published":true}
//! PUT    /api/v1/articles/{id} {"published":false}
//! DELETE /api/v1/articles/{id}
//! POST   /api/v1/articles/{id}/like
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use pagination::{PageInfo, PageParams};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CreateArticleRequest, UpdateArticleRequest};
use crate::domain::{
    Article, ArticleChanges, ArticleDetails, ArticleDraft, ArticleSummary, AuthorSummary,
    LikeToggle, Slug,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{MessageResponse, created, ok};
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    map_article_validation_error, map_pagination_error, map_slug_error, parse_article_id,
};

pub(crate) const DELETED_MESSAGE: &str = "Article deleted successfully";

/// Body for `POST /api/v1/articles`.
///
/// Fields are optional at the JSON level so a missing field yields the same
/// validation message as a blank one.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateArticleBody {
    #[schema(example = "Hello World!")]
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    /// Publish immediately; defaults to `false`.
    pub published: Option<bool>,
}

impl TryFrom<CreateArticleBody> for ArticleDraft {
    type Error = crate::domain::ArticleValidationError;

    fn try_from(value: CreateArticleBody) -> Result<Self, Self::Error> {
        ArticleDraft::try_new(
            value.title.unwrap_or_default(),
            value.content.unwrap_or_default(),
            value.excerpt.unwrap_or_default(),
            value.published.unwrap_or(false),
        )
    }
}

/// Body for `PUT /api/v1/articles/{id}`. Absent or blank fields are left
/// unchanged.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateArticleBody {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub published: Option<bool>,
}

impl From<UpdateArticleBody> for ArticleChanges {
    fn from(value: UpdateArticleBody) -> Self {
        ArticleChanges::new(value.title, value.content, value.excerpt, value.published)
    }
}

/// Full article view returned by single-article endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleResponse {
    #[schema(value_type = String, format = Uuid)]
    pub id: String,
    pub title: String,
    #[schema(example = "hello-world")]
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub author: AuthorSummary,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    /// Ids of the users who liked the article.
    pub likes: Vec<String>,
    pub likes_count: u64,
    /// Present on reads; omitted on create and update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments_count: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Article> for ArticleResponse {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id().to_string(),
            title: article.title().to_owned(),
            slug: article.slug().to_string(),
            content: article.content().to_owned(),
            excerpt: article.excerpt().to_owned(),
            author: article.author().clone(),
            published: article.is_published(),
            published_at: article.published_at(),
            likes: article.likes().iter().map(ToString::to_string).collect(),
            likes_count: article.likes_count(),
            comments_count: None,
            created_at: article.created_at(),
            updated_at: article.updated_at(),
        }
    }
}

impl From<ArticleDetails> for ArticleResponse {
    fn from(details: ArticleDetails) -> Self {
        Self {
            comments_count: Some(details.comments_count),
            ..Self::from(&details.article)
        }
    }
}

/// Listing entry: an article without its body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArticleListItem {
    #[schema(value_type = String, format = Uuid)]
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub author: AuthorSummary,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub likes: Vec<String>,
    pub likes_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ArticleSummary> for ArticleListItem {
    fn from(summary: ArticleSummary) -> Self {
        let likes_count = summary.likes.len() as u64;
        Self {
            id: summary.id.to_string(),
            title: summary.title,
            slug: summary.slug.into(),
            excerpt: summary.excerpt,
            author: summary.author,
            published: summary.published,
            published_at: summary.published_at,
            likes: summary.likes.into_iter().map(String::from).collect(),
            likes_count,
            created_at: summary.created_at,
            updated_at: summary.updated_at,
        }
    }
}

/// Totals accompanying a listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResponse {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

impl From<PageInfo> for PaginationResponse {
    fn from(info: PageInfo) -> Self {
        Self {
            page: info.page,
            limit: info.limit,
            total: info.total,
            total_pages: info.total_pages,
        }
    }
}

/// `data` payload of `GET /api/v1/articles`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ArticleListResponse {
    pub articles: Vec<ArticleListItem>,
    pub pagination: PaginationResponse,
}

/// `data` payload of `POST /api/v1/articles/{id}/like`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub liked: bool,
    pub likes_count: u64,
}

impl From<LikeToggle> for LikeResponse {
    fn from(value: LikeToggle) -> Self {
        Self {
            liked: value.liked,
            likes_count: value.likes_count,
        }
    }
}

/// List published articles, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/articles",
    params(
        ("page" = Option<u32>, Query, description = "One-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size, 1 to 100")
    ),
    responses(
        (status = 200, description = "Published articles without bodies", body = ArticleListResponse),
        (status = 400, description = "Invalid pagination", body = ErrorEnvelope),
        (status = 500, description = "Store failure", body = ErrorEnvelope)
    ),
    tags = ["articles"],
    operation_id = "listArticles",
    security([])
)]
#[get("/articles")]
pub async fn list_articles(
    state: web::Data<HttpState>,
    query: web::Query<PageParams>,
) -> ApiResult<HttpResponse> {
    let request = query
        .into_inner()
        .into_request(state.default_page_size)
        .map_err(map_pagination_error)?;
    let page = state.articles_query.list_published(request).await?;
    let (items, info) = page.into_parts();
    Ok(ok(ArticleListResponse {
        articles: items.into_iter().map(ArticleListItem::from).collect(),
        pagination: info.into(),
    }))
}

/// Fetch one article by id, including drafts, with its comment count.
#[utoipa::path(
    get,
    path = "/api/v1/articles/{id}",
    params(("id" = String, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article", body = ArticleResponse),
        (status = 400, description = "Malformed id", body = ErrorEnvelope),
        (status = 404, description = "Article not found", body = ErrorEnvelope)
    ),
    tags = ["articles"],
    operation_id = "getArticle",
    security([])
)]
#[get("/articles/{id}")]
pub async fn get_article(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_article_id(&path)?;
    let details = state.articles_query.find_by_id(id).await?;
    Ok(ok(ArticleResponse::from(details)))
}

/// Fetch a published article by slug, with its comment count.
#[utoipa::path(
    get,
    path = "/api/v1/articles/slug/{slug}",
    params(("slug" = String, Path, description = "Article slug")),
    responses(
        (status = 200, description = "Article", body = ArticleResponse),
        (status = 400, description = "Malformed slug", body = ErrorEnvelope),
        (status = 404, description = "No published article has this slug", body = ErrorEnvelope)
    ),
    tags = ["articles"],
    operation_id = "getArticleBySlug",
    security([])
)]
#[get("/articles/slug/{slug}")]
pub async fn get_article_by_slug(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let slug = Slug::parse(path.into_inner()).map_err(map_slug_error)?;
    let details = state.articles_query.find_published_by_slug(slug).await?;
    Ok(ok(ArticleResponse::from(details)))
}

/// Create an article authored by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/articles",
    request_body = CreateArticleBody,
    responses(
        (status = 201, description = "Article created", body = ArticleResponse),
        (status = 400, description = "Missing fields", body = ErrorEnvelope),
        (status = 401, description = "Login required", body = ErrorEnvelope),
        (status = 409, description = "Slug already taken", body = ErrorEnvelope)
    ),
    tags = ["articles"],
    operation_id = "createArticle"
)]
#[post("/articles")]
pub async fn create_article(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateArticleBody>,
) -> ApiResult<HttpResponse> {
    let author = session.require_user_id()?;
    let draft = ArticleDraft::try_from(payload.into_inner()).map_err(map_article_validation_error)?;
    let article = state
        .articles
        .create(CreateArticleRequest { author, draft })
        .await?;
    Ok(created(ArticleResponse::from(&article)))
}

/// Apply a partial update. Only the author may edit.
#[utoipa::path(
    put,
    path = "/api/v1/articles/{id}",
    params(("id" = String, Path, description = "Article id")),
    request_body = UpdateArticleBody,
    responses(
        (status = 200, description = "Updated article", body = ArticleResponse),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 401, description = "Login required", body = ErrorEnvelope),
        (status = 403, description = "Caller is not the author", body = ErrorEnvelope),
        (status = 404, description = "Article not found", body = ErrorEnvelope),
        (status = 409, description = "Slug already taken", body = ErrorEnvelope)
    ),
    tags = ["articles"],
    operation_id = "updateArticle"
)]
#[put("/articles/{id}")]
pub async fn update_article(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateArticleBody>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_user_id()?;
    let article_id = parse_article_id(&path)?;
    let article = state
        .articles
        .update(UpdateArticleRequest {
            article_id,
            caller,
            changes: payload.into_inner().into(),
        })
        .await?;
    Ok(ok(ArticleResponse::from(&article)))
}

/// Delete an article and its comments. Only the author may delete.
#[utoipa::path(
    delete,
    path = "/api/v1/articles/{id}",
    params(("id" = String, Path, description = "Article id")),
    responses(
        (status = 200, description = "Article deleted", body = MessageResponse),
        (status = 401, description = "Login required", body = ErrorEnvelope),
        (status = 403, description = "Caller is not the author", body = ErrorEnvelope),
        (status = 404, description = "Article not found", body = ErrorEnvelope)
    ),
    tags = ["articles"],
    operation_id = "deleteArticle"
)]
#[delete("/articles/{id}")]
pub async fn delete_article(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_user_id()?;
    let article_id = parse_article_id(&path)?;
    state.articles.delete(article_id, caller).await?;
    Ok(ok(MessageResponse::new(DELETED_MESSAGE)))
}

/// Flip the caller's like on an article.
#[utoipa::path(
    post,
    path = "/api/v1/articles/{id}/like",
    params(("id" = String, Path, description = "Article id")),
    responses(
        (status = 200, description = "New like state", body = LikeResponse),
        (status = 401, description = "Login required", body = ErrorEnvelope),
        (status = 404, description = "Article not found", body = ErrorEnvelope)
    ),
    tags = ["articles"],
    operation_id = "toggleLike"
)]
#[post("/articles/{id}/like")]
pub async fn toggle_like(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_user_id()?;
    let article_id = parse_article_id(&path)?;
    let toggle = state.articles.toggle_like(article_id, caller).await?;
    Ok(ok(LikeResponse::from(toggle)))
}

#[cfg(test)]
#[path = "articles_tests.rs"]
mod tests;

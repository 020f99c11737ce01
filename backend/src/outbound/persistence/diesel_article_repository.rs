//! PostgreSQL-backed `ArticleRepository` implementation using Diesel ORM.
//!
//! Articles are read joined with their author; the like set lives in
//! `article_likes` and is loaded with one extra query per batch. Like toggles
//! lock the article row so concurrent toggles on the same article serialise.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use pagination::{Page, PageRequest};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{ArticlePersistenceError, ArticleRepository};
use crate::domain::{Article, ArticleId, ArticleSummary, LikeToggle, Slug, UserId};

use super::diesel_helpers::{
    DieselFailure, classify_diesel_error, collect_rows, count_to_u64, pool_error_message,
};
use super::models::{ArticleRow, ArticleUpdate, AuthorRow, NewArticleRow, NewLikeRow};
use super::pool::{DbPool, PoolError};
use super::schema::{article_likes, articles, users};

/// Diesel-backed implementation of the article repository port.
#[derive(Clone)]
pub struct DieselArticleRepository {
    pool: DbPool,
}

impl DieselArticleRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ArticlePersistenceError {
    ArticlePersistenceError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, operation: &str) -> ArticlePersistenceError {
    match classify_diesel_error(error, operation) {
        DieselFailure::Connection(message) => ArticlePersistenceError::connection(message),
        DieselFailure::UniqueViolation(constraint) => {
            ArticlePersistenceError::conflict(constraint)
        }
        DieselFailure::ForeignKeyViolation(constraint) => {
            ArticlePersistenceError::query(format!("foreign key violation: {constraint}"))
        }
        DieselFailure::Query(message) => ArticlePersistenceError::query(message),
    }
}

/// Attach like sets to joined article rows, preserving row order.
async fn hydrate(
    conn: &mut AsyncPgConnection,
    rows: Vec<(ArticleRow, AuthorRow)>,
) -> Result<Vec<Article>, ArticlePersistenceError> {
    let ids: Vec<Uuid> = rows.iter().map(|(article, _)| article.id).collect();
    let like_rows: Vec<(Uuid, Uuid)> = if ids.is_empty() {
        Vec::new()
    } else {
        article_likes::table
            .filter(article_likes::article_id.eq_any(ids))
            .order(article_likes::created_at.asc())
            .select((article_likes::article_id, article_likes::user_id))
            .load(conn)
            .await
            .map_err(|err| map_diesel_error(err, "load likes"))?
    };

    let mut likes: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for (article_id, user_id) in like_rows {
        likes.entry(article_id).or_default().push(user_id);
    }

    collect_rows(
        rows.into_iter().map(|(article, author)| {
            let article_likes = likes.remove(&article.id).unwrap_or_default();
            article.into_article(author, article_likes)
        }),
        ArticlePersistenceError::query,
    )
}

async fn find_one(
    conn: &mut AsyncPgConnection,
    rows: Vec<(ArticleRow, AuthorRow)>,
) -> Result<Option<Article>, ArticlePersistenceError> {
    Ok(hydrate(conn, rows).await?.into_iter().next())
}

#[async_trait]
impl ArticleRepository for DieselArticleRepository {
    async fn insert(&self, article: &Article) -> Result<(), ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(articles::table)
            .values(&NewArticleRow::from(article))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, "insert article"))
    }

    async fn update(&self, article: &Article) -> Result<bool, ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(articles::table.find(*article.id().as_uuid()))
            .set(&ArticleUpdate::from(article))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "update article"))?;
        Ok(updated > 0)
    }

    async fn find_by_id(&self, id: &ArticleId) -> Result<Option<Article>, ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = articles::table
            .inner_join(users::table)
            .filter(articles::id.eq(*id.as_uuid()))
            .select((ArticleRow::as_select(), AuthorRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "find article by id"))?;
        find_one(&mut conn, rows).await
    }

    async fn find_published_by_slug(
        &self,
        slug: &Slug,
    ) -> Result<Option<Article>, ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = articles::table
            .inner_join(users::table)
            .filter(articles::slug.eq(slug.as_ref()))
            .filter(articles::published.eq(true))
            .select((ArticleRow::as_select(), AuthorRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "find article by slug"))?;
        find_one(&mut conn, rows).await
    }

    async fn slug_exists(
        &self,
        slug: &Slug,
        exclude: Option<ArticleId>,
    ) -> Result<bool, ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = articles::table
            .filter(articles::slug.eq(slug.as_ref()))
            .into_boxed();
        if let Some(excluded) = exclude {
            query = query.filter(articles::id.ne(*excluded.as_uuid()));
        }
        diesel::select(diesel::dsl::exists(query))
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "check slug"))
    }

    async fn list_published(
        &self,
        request: PageRequest,
    ) -> Result<Page<ArticleSummary>, ArticlePersistenceError> {
        let offset = i64::try_from(request.offset())
            .map_err(|_| ArticlePersistenceError::query("page offset out of range"))?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = articles::table
            .filter(articles::published.eq(true))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "count published articles"))?;

        let rows = articles::table
            .inner_join(users::table)
            .filter(articles::published.eq(true))
            .order((articles::published_at.desc(), articles::created_at.desc()))
            .limit(i64::from(request.limit()))
            .offset(offset)
            .select((ArticleRow::as_select(), AuthorRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "list published articles"))?;

        let items = hydrate(&mut conn, rows)
            .await?
            .iter()
            .map(Article::summary)
            .collect();
        Ok(Page::new(items, request, count_to_u64(total)))
    }

    async fn toggle_like(
        &self,
        id: &ArticleId,
        user: &UserId,
    ) -> Result<Option<LikeToggle>, ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let article_id = *id.as_uuid();
        let user_id = *user.as_uuid();

        conn.transaction(move |conn| {
            async move {
                let locked: Option<Uuid> = articles::table
                    .find(article_id)
                    .select(articles::id)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                if locked.is_none() {
                    return Ok(None);
                }

                let removed = diesel::delete(
                    article_likes::table
                        .filter(article_likes::article_id.eq(article_id))
                        .filter(article_likes::user_id.eq(user_id)),
                )
                .execute(conn)
                .await?;
                if removed == 0 {
                    diesel::insert_into(article_likes::table)
                        .values(&NewLikeRow {
                            article_id,
                            user_id,
                        })
                        .execute(conn)
                        .await?;
                }

                let likes: i64 = article_likes::table
                    .filter(article_likes::article_id.eq(article_id))
                    .count()
                    .get_result(conn)
                    .await?;
                Ok(Some(LikeToggle {
                    liked: removed == 0,
                    likes_count: count_to_u64(likes),
                }))
            }
            .scope_boxed()
        })
        .await
        .map_err(|err: diesel::result::Error| map_diesel_error(err, "toggle like"))
    }

    async fn delete(&self, id: &ArticleId) -> Result<bool, ArticlePersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(articles::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "delete article"))?;
        if deleted == 0 {
            debug!(article_id = %id, "delete matched no article");
        }
        Ok(deleted > 0)
    }
}

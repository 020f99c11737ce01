//! Article domain service implementing the article driving ports.
//!
//! Every mutation checks existence first, then ownership, then slug
//! uniqueness. The repository enforces uniqueness again at write time, so a
//! concurrent writer that slips past the pre-check still gets a conflict.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::join;
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::{debug, error, info};

use crate::domain::ports::{
    ArticleRepository, ArticlesCommand, ArticlesQuery, CommentRepository, CreateArticleRequest,
    UpdateArticleRequest, UserRepository,
};
use crate::domain::repository_errors::{
    ARTICLE_NOT_FOUND_MESSAGE, SLUG_CONFLICT_MESSAGE, map_article_error, map_comment_error,
    map_user_error,
};
use crate::domain::{
    Article, ArticleDetails, ArticleId, ArticleSummary, AuthorSummary, Error, LikeToggle, Slug,
    UserId,
};

/// Article service implementing [`ArticlesCommand`] and [`ArticlesQuery`].
#[derive(Clone)]
pub struct ArticleService<A, C, U> {
    articles: Arc<A>,
    comments: Arc<C>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<A, C, U> ArticleService<A, C, U> {
    /// Create a service over the article, comment, and user repositories.
    pub fn new(articles: Arc<A>, comments: Arc<C>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            articles,
            comments,
            users,
            clock,
        }
    }
}

impl<A, C, U> ArticleService<A, C, U>
where
    A: ArticleRepository,
    C: CommentRepository,
    U: UserRepository,
{
    async fn load(&self, article_id: &ArticleId) -> Result<Article, Error> {
        self.articles
            .find_by_id(article_id)
            .await
            .map_err(map_article_error)?
            .ok_or_else(|| Error::not_found(ARTICLE_NOT_FOUND_MESSAGE))
    }

    async fn load_owned(
        &self,
        article_id: &ArticleId,
        caller: &UserId,
        action: &str,
    ) -> Result<Article, Error> {
        let article = self.load(article_id).await?;
        if !article.is_authored_by(caller) {
            debug!(%article_id, %caller, action, "refused non-author article mutation");
            return Err(Error::forbidden(format!(
                "Forbidden - You can only {action} your own articles"
            )));
        }
        Ok(article)
    }

    async fn author_summary(&self, user_id: &UserId) -> Result<AuthorSummary, Error> {
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("Unauthorized"))?;
        Ok(user.summary())
    }

    async fn ensure_slug_free(&self, slug: &Slug, exclude: Option<ArticleId>) -> Result<(), Error> {
        let taken = self
            .articles
            .slug_exists(slug, exclude)
            .await
            .map_err(map_article_error)?;
        if taken {
            debug!(%slug, "slug already in use");
            return Err(Error::conflict(SLUG_CONFLICT_MESSAGE));
        }
        Ok(())
    }

    async fn with_comment_count(&self, article: Article) -> Result<ArticleDetails, Error> {
        let comments_count = self
            .comments
            .count_for_article(&article.id())
            .await
            .map_err(map_comment_error)?;
        Ok(ArticleDetails {
            article,
            comments_count,
        })
    }
}

#[async_trait]
impl<A, C, U> ArticlesCommand for ArticleService<A, C, U>
where
    A: ArticleRepository,
    C: CommentRepository,
    U: UserRepository,
{
    async fn create(&self, request: CreateArticleRequest) -> Result<Article, Error> {
        let CreateArticleRequest { author, draft } = request;
        let author = self.author_summary(&author).await?;
        self.ensure_slug_free(draft.slug(), None).await?;

        let article = Article::create(ArticleId::random(), author, draft, self.clock.utc());
        self.articles
            .insert(&article)
            .await
            .map_err(map_article_error)?;
        info!(article_id = %article.id(), slug = %article.slug(), "article created");
        Ok(article)
    }

    async fn update(&self, request: UpdateArticleRequest) -> Result<Article, Error> {
        let UpdateArticleRequest {
            article_id,
            caller,
            changes,
        } = request;
        let mut article = self.load_owned(&article_id, &caller, "edit").await?;

        let new_slug = article
            .slug_for(&changes)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        if let Some(slug) = new_slug {
            self.ensure_slug_free(&slug, Some(article_id)).await?;
        }

        article
            .apply_changes(changes, self.clock.utc())
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let updated = self
            .articles
            .update(&article)
            .await
            .map_err(map_article_error)?;
        if !updated {
            return Err(Error::not_found(ARTICLE_NOT_FOUND_MESSAGE));
        }
        Ok(article)
    }

    async fn delete(&self, article_id: ArticleId, caller: UserId) -> Result<(), Error> {
        self.load_owned(&article_id, &caller, "delete").await?;

        let (article_result, comments_result) = join(
            self.articles.delete(&article_id),
            self.comments.delete_for_article(&article_id),
        )
        .await;

        match (article_result, comments_result) {
            (Ok(true), Ok(removed)) => {
                info!(%article_id, comments_removed = removed, "article deleted");
                Ok(())
            }
            (Ok(false), Ok(_)) => Err(Error::not_found(ARTICLE_NOT_FOUND_MESSAGE)),
            (article_result, comments_result) => {
                error!(
                    %article_id,
                    article_deleted = article_result.is_ok(),
                    comments_deleted = comments_result.is_ok(),
                    "article cascade delete incomplete"
                );
                match (article_result, comments_result) {
                    (Err(err), _) => Err(map_article_error(err)),
                    (_, Err(err)) => Err(map_comment_error(err)),
                    _ => Err(Error::internal("article cascade delete incomplete")),
                }
            }
        }
    }

    async fn toggle_like(&self, article_id: ArticleId, caller: UserId) -> Result<LikeToggle, Error> {
        self.articles
            .toggle_like(&article_id, &caller)
            .await
            .map_err(map_article_error)?
            .ok_or_else(|| Error::not_found(ARTICLE_NOT_FOUND_MESSAGE))
    }
}

#[async_trait]
impl<A, C, U> ArticlesQuery for ArticleService<A, C, U>
where
    A: ArticleRepository,
    C: CommentRepository,
    U: UserRepository,
{
    async fn list_published(&self, request: PageRequest) -> Result<Page<ArticleSummary>, Error> {
        self.articles
            .list_published(request)
            .await
            .map_err(map_article_error)
    }

    async fn find_by_id(&self, article_id: ArticleId) -> Result<ArticleDetails, Error> {
        let article = self.load(&article_id).await?;
        self.with_comment_count(article).await
    }

    async fn find_published_by_slug(&self, slug: Slug) -> Result<ArticleDetails, Error> {
        let article = self
            .articles
            .find_published_by_slug(&slug)
            .await
            .map_err(map_article_error)?
            .ok_or_else(|| Error::not_found(ARTICLE_NOT_FOUND_MESSAGE))?;
        self.with_comment_count(article).await
    }
}

#[cfg(test)]
#[path = "article_service_tests.rs"]
mod tests;

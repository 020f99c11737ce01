//! Comment domain service implementing the comment driving ports.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    ArticleRepository, CommentRepository, CommentsCommand, CommentsQuery, CreateCommentRequest,
    UserRepository,
};
use crate::domain::repository_errors::{
    ARTICLE_NOT_FOUND_MESSAGE, map_article_error, map_comment_error, map_user_error,
};
use crate::domain::{ArticleId, Comment, Error};

/// Comment service backed by comment, article, and user repositories.
#[derive(Clone)]
pub struct CommentService<C, A, U> {
    comments: Arc<C>,
    articles: Arc<A>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<C, A, U> CommentService<C, A, U> {
    /// Build the service over its three stores and a clock.
    pub fn new(comments: Arc<C>, articles: Arc<A>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            comments,
            articles,
            users,
            clock,
        }
    }
}

impl<C, A, U> CommentService<C, A, U>
where
    C: CommentRepository,
    A: ArticleRepository,
    U: UserRepository,
{
    async fn ensure_article_exists(&self, article_id: &ArticleId) -> Result<(), Error> {
        self.articles
            .find_by_id(article_id)
            .await
            .map_err(map_article_error)?
            .map(|_| ())
            .ok_or_else(|| Error::not_found(ARTICLE_NOT_FOUND_MESSAGE))
    }
}

#[async_trait]
impl<C, A, U> CommentsCommand for CommentService<C, A, U>
where
    C: CommentRepository,
    A: ArticleRepository,
    U: UserRepository,
{
    async fn create(&self, request: CreateCommentRequest) -> Result<Comment, Error> {
        let CreateCommentRequest {
            article_id,
            author,
            content,
        } = request;
        self.ensure_article_exists(&article_id).await?;
        let author = self
            .users
            .find_by_id(&author)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("Unauthorized"))?;

        let comment = Comment::new(article_id, author.summary(), content, self.clock.utc());
        self.comments
            .insert(&comment)
            .await
            .map_err(map_comment_error)?;
        Ok(comment)
    }
}

#[async_trait]
impl<C, A, U> CommentsQuery for CommentService<C, A, U>
where
    C: CommentRepository,
    A: ArticleRepository,
    U: UserRepository,
{
    async fn list_for_article(&self, article_id: ArticleId) -> Result<Vec<Comment>, Error> {
        self.ensure_article_exists(&article_id).await?;
        self.comments
            .list_for_article(&article_id)
            .await
            .map_err(map_comment_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{ArticlesCommand, CreateArticleRequest};
    use crate::domain::{ArticleDraft, ArticleService, CommentContent, ErrorCode};
    use crate::outbound::memory::InMemoryBlogStore;
    use crate::test_support::{MutableClock, fixture_now, seed_user};
    use rstest::rstest;

    fn content(text: &str) -> CommentContent {
        CommentContent::new(text).expect("content")
    }

    #[rstest]
    #[tokio::test]
    async fn comments_are_listed_newest_first_with_authors() {
        let store = Arc::new(InMemoryBlogStore::new());
        let clock = Arc::new(MutableClock::new(fixture_now()));
        let articles = ArticleService::new(store.clone(), store.clone(), store.clone(), clock.clone());
        let service = CommentService::new(store.clone(), store.clone(), store.clone(), clock.clone());
        let a = seed_user(&store, "a").await;
        let b = seed_user(&store, "b").await;
        let article = articles
            .create(CreateArticleRequest {
                author: a.id().clone(),
                draft: ArticleDraft::try_new("Thread", "Body", "Teaser", false).expect("draft"),
            })
            .await
            .expect("article");

        let empty = service
            .list_for_article(article.id())
            .await
            .expect("existing article without comments");
        assert!(empty.is_empty());

        for (author, text) in [(&a, "first"), (&b, "  second  ")] {
            service
                .create(CreateCommentRequest {
                    article_id: article.id(),
                    author: author.id().clone(),
                    content: content(text),
                })
                .await
                .expect("comment");
            clock.advance_minutes(1);
        }

        let listed = service.list_for_article(article.id()).await.expect("list");
        let rendered: Vec<(&str, &str)> = listed
            .iter()
            .map(|c| (c.author.username.as_ref(), c.content.as_ref()))
            .collect();
        assert_eq!(rendered, vec![("b", "second"), ("a", "first")]);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_article_is_not_found_for_reads_and_writes() {
        let store = Arc::new(InMemoryBlogStore::new());
        let clock = Arc::new(MutableClock::new(fixture_now()));
        let service = CommentService::new(store.clone(), store.clone(), store.clone(), clock);
        let a = seed_user(&store, "a").await;
        let missing = ArticleId::random();

        let read = service.list_for_article(missing).await.expect_err("missing");
        assert_eq!(read.code(), ErrorCode::NotFound);

        let write = service
            .create(CreateCommentRequest {
                article_id: missing,
                author: a.id().clone(),
                content: content("hello"),
            })
            .await
            .expect_err("missing");
        assert_eq!(write.code(), ErrorCode::NotFound);
        assert_eq!(write.message(), "Article not found");
    }
}

//! In-memory store implementing every repository port.
//!
//! Used when no database URL is configured, and by service and HTTP tests.
//! All state sits behind one mutex, so each port operation is atomic: slug
//! and account uniqueness are checked and written under the same lock, and a
//! like toggle is a single add-or-remove.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::ports::{
    ArticlePersistenceError, ArticleRepository, CommentPersistenceError, CommentRepository,
    UserCredentials, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Article, ArticleId, ArticleSummary, Comment, Email, LikeToggle, PasswordHash, Slug, User,
    UserId, Username,
};

#[derive(Default)]
struct State {
    users: HashMap<UserId, UserCredentials>,
    articles: HashMap<ArticleId, Article>,
    /// Insertion order; listing reverses it to break timestamp ties.
    comments: Vec<Comment>,
}

impl State {
    fn slug_taken(&self, slug: &Slug, exclude: Option<ArticleId>) -> bool {
        self.articles
            .values()
            .any(|article| article.slug() == slug && Some(article.id()) != exclude)
    }
}

/// Process-local blog store.
#[derive(Default)]
pub struct InMemoryBlogStore {
    state: Mutex<State>,
}

impl InMemoryBlogStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserRepository for InMemoryBlogStore {
    async fn create(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut state = self.state();
        let collides = state.users.values().any(|stored| {
            stored.user.email() == user.email() || stored.user.username() == user.username()
        });
        if collides {
            return Err(UserPersistenceError::conflict(user.email().as_ref()));
        }
        state.users.insert(
            user.id().clone(),
            UserCredentials {
                user: user.clone(),
                password_hash: password_hash.clone(),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.state().users.get(id).map(|stored| stored.user.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        Ok(self
            .state()
            .users
            .values()
            .find(|stored| stored.user.email() == email)
            .cloned())
    }

    async fn email_or_username_taken(
        &self,
        email: &Email,
        username: &Username,
    ) -> Result<bool, UserPersistenceError> {
        Ok(self
            .state()
            .users
            .values()
            .any(|stored| stored.user.email() == email || stored.user.username() == username))
    }
}

#[async_trait]
impl ArticleRepository for InMemoryBlogStore {
    async fn insert(&self, article: &Article) -> Result<(), ArticlePersistenceError> {
        let mut state = self.state();
        if state.slug_taken(article.slug(), None) {
            return Err(ArticlePersistenceError::conflict(article.slug().as_ref()));
        }
        state.articles.insert(article.id(), article.clone());
        Ok(())
    }

    async fn update(&self, article: &Article) -> Result<bool, ArticlePersistenceError> {
        let mut state = self.state();
        if state.slug_taken(article.slug(), Some(article.id())) {
            return Err(ArticlePersistenceError::conflict(article.slug().as_ref()));
        }
        let Some(stored) = state.articles.get_mut(&article.id()) else {
            return Ok(false);
        };
        let mut parts = article.clone().into_parts();
        parts.likes = stored.likes().to_vec();
        *stored = Article::from_parts(parts);
        Ok(true)
    }

    async fn find_by_id(&self, id: &ArticleId) -> Result<Option<Article>, ArticlePersistenceError> {
        Ok(self.state().articles.get(id).cloned())
    }

    async fn find_published_by_slug(
        &self,
        slug: &Slug,
    ) -> Result<Option<Article>, ArticlePersistenceError> {
        Ok(self
            .state()
            .articles
            .values()
            .find(|article| article.is_published() && article.slug() == slug)
            .cloned())
    }

    async fn slug_exists(
        &self,
        slug: &Slug,
        exclude: Option<ArticleId>,
    ) -> Result<bool, ArticlePersistenceError> {
        Ok(self.state().slug_taken(slug, exclude))
    }

    async fn list_published(
        &self,
        request: PageRequest,
    ) -> Result<Page<ArticleSummary>, ArticlePersistenceError> {
        let state = self.state();
        let mut published: Vec<&Article> = state
            .articles
            .values()
            .filter(|article| article.is_published())
            .collect();
        published.sort_by(|a, b| {
            b.published_at()
                .cmp(&a.published_at())
                .then_with(|| b.created_at().cmp(&a.created_at()))
        });

        let total = published.len() as u64;
        let skip = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let items = published
            .into_iter()
            .skip(skip)
            .take(request.limit() as usize)
            .map(Article::summary)
            .collect();
        Ok(Page::new(items, request, total))
    }

    async fn toggle_like(
        &self,
        id: &ArticleId,
        user: &UserId,
    ) -> Result<Option<LikeToggle>, ArticlePersistenceError> {
        Ok(self
            .state()
            .articles
            .get_mut(id)
            .map(|article| article.toggle_like(user)))
    }

    async fn delete(&self, id: &ArticleId) -> Result<bool, ArticlePersistenceError> {
        Ok(self.state().articles.remove(id).is_some())
    }
}

#[async_trait]
impl CommentRepository for InMemoryBlogStore {
    async fn insert(&self, comment: &Comment) -> Result<(), CommentPersistenceError> {
        let mut state = self.state();
        if !state.articles.contains_key(&comment.article_id) {
            return Err(CommentPersistenceError::missing_article(
                comment.article_id.to_string(),
            ));
        }
        state.comments.push(comment.clone());
        Ok(())
    }

    async fn list_for_article(
        &self,
        article_id: &ArticleId,
    ) -> Result<Vec<Comment>, CommentPersistenceError> {
        let state = self.state();
        let mut comments: Vec<Comment> = state
            .comments
            .iter()
            .rev()
            .filter(|comment| &comment.article_id == article_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }

    async fn count_for_article(
        &self,
        article_id: &ArticleId,
    ) -> Result<u64, CommentPersistenceError> {
        let state = self.state();
        let count = state
            .comments
            .iter()
            .filter(|comment| &comment.article_id == article_id)
            .count();
        Ok(count as u64)
    }

    async fn delete_for_article(
        &self,
        article_id: &ArticleId,
    ) -> Result<u64, CommentPersistenceError> {
        let mut state = self.state();
        let before = state.comments.len();
        state
            .comments
            .retain(|comment| &comment.article_id != article_id);
        Ok((before - state.comments.len()) as u64)
    }
}

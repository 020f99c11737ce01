//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types re-validate
//! stored values and report corrupt rows as plain messages.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Article, ArticleId, ArticleParts, AuthorSummary, Comment, CommentContent, CommentId, Email,
    PasswordHash, Slug, User, UserId, Username,
};
use crate::domain::ports::UserCredentials;

use super::schema::{article_likes, articles, comments, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub(crate) fn into_credentials(self) -> Result<UserCredentials, String> {
        let password_hash = PasswordHash::from_phc(self.password_hash.as_str())
            .map_err(|err| format!("user {}: {err}", self.id))?;
        let user = User::from_parts(
            UserId::from_uuid(self.id),
            Email::new(&self.email).map_err(|err| format!("user {}: {err}", self.id))?,
            Username::new(&self.username).map_err(|err| format!("user {}: {err}", self.id))?,
            self.avatar,
            self.created_at,
            self.updated_at,
        );
        Ok(UserCredentials {
            user,
            password_hash,
        })
    }

    pub(crate) fn into_user(self) -> Result<User, String> {
        self.into_credentials().map(|credentials| credentials.user)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub username: &'a str,
    pub password_hash: &'a str,
    pub avatar: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Author columns joined onto articles and comments.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AuthorRow {
    pub id: Uuid,
    pub username: String,
    pub avatar: Option<String>,
}

impl AuthorRow {
    pub(crate) fn into_summary(self) -> Result<AuthorSummary, String> {
        Ok(AuthorSummary {
            id: UserId::from_uuid(self.id),
            username: Username::new(&self.username)
                .map_err(|err| format!("user {}: {err}", self.id))?,
            avatar: self.avatar,
        })
    }
}

// ---------------------------------------------------------------------------
// Articles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = articles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ArticleRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ArticleRow {
    /// Rebuild the aggregate from its row, joined author, and like set.
    pub(crate) fn into_article(self, author: AuthorRow, likes: Vec<Uuid>) -> Result<Article, String> {
        if author.id != self.author_id {
            return Err(format!("article {}: author join mismatch", self.id));
        }
        Ok(Article::from_parts(ArticleParts {
            id: ArticleId::from_uuid(self.id),
            author: author.into_summary()?,
            title: self.title,
            slug: Slug::parse(self.slug).map_err(|err| format!("article {}: {err}", self.id))?,
            content: self.content,
            excerpt: self.excerpt,
            published: self.published,
            published_at: self.published_at,
            likes: likes.into_iter().map(UserId::from_uuid).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = articles)]
pub(crate) struct NewArticleRow<'a> {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: &'a str,
    pub slug: &'a str,
    pub content: &'a str,
    pub excerpt: &'a str,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Article> for NewArticleRow<'a> {
    fn from(article: &'a Article) -> Self {
        Self {
            id: *article.id().as_uuid(),
            author_id: *article.author().id.as_uuid(),
            title: article.title(),
            slug: article.slug().as_ref(),
            content: article.content(),
            excerpt: article.excerpt(),
            published: article.is_published(),
            published_at: article.published_at(),
            created_at: article.created_at(),
            updated_at: article.updated_at(),
        }
    }
}

/// Editable columns. Likes live in `article_likes` and are never written
/// through this changeset.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = articles)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ArticleUpdate<'a> {
    pub title: &'a str,
    pub slug: &'a str,
    pub content: &'a str,
    pub excerpt: &'a str,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Article> for ArticleUpdate<'a> {
    fn from(article: &'a Article) -> Self {
        Self {
            title: article.title(),
            slug: article.slug().as_ref(),
            content: article.content(),
            excerpt: article.excerpt(),
            published: article.is_published(),
            published_at: article.published_at(),
            updated_at: article.updated_at(),
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = article_likes)]
pub(crate) struct NewLikeRow {
    pub article_id: Uuid,
    pub user_id: Uuid,
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: Uuid,
    pub article_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommentRow {
    pub(crate) fn into_comment(self, author: AuthorRow) -> Result<Comment, String> {
        if author.id != self.author_id {
            return Err(format!("comment {}: author join mismatch", self.id));
        }
        Ok(Comment {
            id: CommentId::from_uuid(self.id),
            article_id: ArticleId::from_uuid(self.article_id),
            author: author.into_summary()?,
            content: CommentContent::new(&self.content)
                .map_err(|err| format!("comment {}: {err}", self.id))?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub id: Uuid,
    pub article_id: Uuid,
    pub author_id: Uuid,
    pub content: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Comment> for NewCommentRow<'a> {
    fn from(comment: &'a Comment) -> Self {
        Self {
            id: *comment.id.as_uuid(),
            article_id: *comment.article_id.as_uuid(),
            author_id: *comment.author.id.as_uuid(),
            content: comment.content.as_ref(),
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

//! Article aggregate: draft/publish lifecycle, slug identity, and likes.
//!
//! ## Invariants
//! - `slug` is always derived from the current `title`.
//! - `published_at` is unset until the first transition to published and is
//!   never cleared afterwards, even when the article is unpublished again.
//! - `likes` holds each user at most once.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slug::{Slug, SlugError};
use super::user::{AuthorSummary, UserId};

/// Validation errors raised while building drafts or applying changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleValidationError {
    /// Title, content, or excerpt was missing or blank.
    MissingFields,
    /// The title produced no usable slug.
    Slug(SlugError),
}

impl fmt::Display for ArticleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFields => write!(f, "Title, content, and excerpt are required"),
            Self::Slug(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ArticleValidationError {}

impl From<SlugError> for ArticleValidationError {
    fn from(value: SlugError) -> Self {
        Self::Slug(value)
    }
}

/// Article identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleId(Uuid);

impl ArticleId {
    /// Generate a new random [`ArticleId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ArticleId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Validated input for a new article.
///
/// # Examples
/// ```
/// use backend::domain::ArticleDraft;
///
/// let draft = ArticleDraft::try_new("Hello World!", "Body", "Teaser", false).unwrap();
/// assert_eq!(draft.slug().as_ref(), "hello-world");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDraft {
    title: String,
    slug: Slug,
    content: String,
    excerpt: String,
    published: bool,
}

impl ArticleDraft {
    /// Validate the required fields and derive the slug.
    pub fn try_new(
        title: impl Into<String>,
        content: impl Into<String>,
        excerpt: impl Into<String>,
        published: bool,
    ) -> Result<Self, ArticleValidationError> {
        let title = title.into();
        let content = content.into();
        let excerpt = excerpt.into();
        if [&title, &content, &excerpt]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(ArticleValidationError::MissingFields);
        }
        let slug = Slug::from_title(&title)?;
        Ok(Self {
            title,
            slug,
            content,
            excerpt,
            published,
        })
    }

    /// Slug derived from the title.
    pub fn slug(&self) -> &Slug {
        &self.slug
    }
}

/// Partial update. Absent or blank fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleChanges {
    title: Option<String>,
    content: Option<String>,
    excerpt: Option<String>,
    published: Option<bool>,
}

impl ArticleChanges {
    /// Collect a partial update, discarding blank strings.
    pub fn new(
        title: Option<String>,
        content: Option<String>,
        excerpt: Option<String>,
        published: Option<bool>,
    ) -> Self {
        let keep_non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        Self {
            title: keep_non_blank(title),
            content: keep_non_blank(content),
            excerpt: keep_non_blank(excerpt),
            published,
        }
    }

    /// New title, if one was supplied.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Requested publish state, if any.
    pub fn published(&self) -> Option<bool> {
        self.published
    }
}

/// Result of flipping a user's like on an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggle {
    pub liked: bool,
    pub likes_count: u64,
}

/// Stored field values used to rehydrate an [`Article`].
#[derive(Debug, Clone)]
pub struct ArticleParts {
    pub id: ArticleId,
    pub author: AuthorSummary,
    pub title: String,
    pub slug: Slug,
    pub content: String,
    pub excerpt: String,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub likes: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Blog article owned by exactly one author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    id: ArticleId,
    author: AuthorSummary,
    title: String,
    slug: Slug,
    content: String,
    excerpt: String,
    published: bool,
    published_at: Option<DateTime<Utc>>,
    likes: Vec<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Article {
    /// Create an article from a draft. Publishing on creation stamps `now`.
    pub fn create(
        id: ArticleId,
        author: AuthorSummary,
        draft: ArticleDraft,
        now: DateTime<Utc>,
    ) -> Self {
        let ArticleDraft {
            title,
            slug,
            content,
            excerpt,
            published,
        } = draft;
        Self {
            id,
            author,
            title,
            slug,
            content,
            excerpt,
            published,
            published_at: published.then_some(now),
            likes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rehydrate a stored article.
    pub fn from_parts(parts: ArticleParts) -> Self {
        let ArticleParts {
            id,
            author,
            title,
            slug,
            content,
            excerpt,
            published,
            published_at,
            likes,
            created_at,
            updated_at,
        } = parts;
        Self {
            id,
            author,
            title,
            slug,
            content,
            excerpt,
            published,
            published_at,
            likes,
            created_at,
            updated_at,
        }
    }

    /// Split into stored field values.
    pub fn into_parts(self) -> ArticleParts {
        ArticleParts {
            id: self.id,
            author: self.author,
            title: self.title,
            slug: self.slug,
            content: self.content,
            excerpt: self.excerpt,
            published: self.published,
            published_at: self.published_at,
            likes: self.likes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Stable article identifier.
    pub fn id(&self) -> ArticleId {
        self.id
    }

    /// Author shown alongside the article.
    pub fn author(&self) -> &AuthorSummary {
        &self.author
    }

    /// Article title.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// URL slug derived from the title.
    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    /// Full body text.
    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    /// Short teaser shown in listings.
    pub fn excerpt(&self) -> &str {
        self.excerpt.as_str()
    }

    /// Whether readers can see the article.
    pub fn is_published(&self) -> bool {
        self.published
    }

    /// First publication time; `None` while a draft.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.published_at
    }

    /// Users who currently like the article.
    pub fn likes(&self) -> &[UserId] {
        &self.likes
    }

    /// Number of likes.
    pub fn likes_count(&self) -> u64 {
        self.likes.len() as u64
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Return `true` when `user` wrote this article.
    pub fn is_authored_by(&self, user: &UserId) -> bool {
        &self.author.id == user
    }

    /// Slug the article would take after `changes`, when the title changes.
    pub fn slug_for(&self, changes: &ArticleChanges) -> Result<Option<Slug>, SlugError> {
        match changes.title() {
            Some(title) if title != self.title => Slug::from_title(title).map(Some),
            _ => Ok(None),
        }
    }

    /// Apply a partial update at `now`.
    pub fn apply_changes(
        &mut self,
        changes: ArticleChanges,
        now: DateTime<Utc>,
    ) -> Result<(), ArticleValidationError> {
        if let Some(slug) = self.slug_for(&changes)? {
            self.slug = slug;
        }
        let ArticleChanges {
            title,
            content,
            excerpt,
            published,
        } = changes;
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(content) = content {
            self.content = content;
        }
        if let Some(excerpt) = excerpt {
            self.excerpt = excerpt;
        }
        if let Some(published) = published {
            self.set_published(published, now);
        }
        self.updated_at = now;
        Ok(())
    }

    fn set_published(&mut self, published: bool, now: DateTime<Utc>) {
        self.published = published;
        if published && self.published_at.is_none() {
            self.published_at = Some(now);
        }
    }

    /// Add `user` to the like set, or remove them if already present.
    pub fn toggle_like(&mut self, user: &UserId) -> LikeToggle {
        let before = self.likes.len();
        self.likes.retain(|liker| liker != user);
        let liked = self.likes.len() == before;
        if liked {
            self.likes.push(user.clone());
        }
        LikeToggle {
            liked,
            likes_count: self.likes_count(),
        }
    }

    /// Listing projection without the body text.
    pub fn summary(&self) -> ArticleSummary {
        ArticleSummary {
            id: self.id,
            author: self.author.clone(),
            title: self.title.clone(),
            slug: self.slug.clone(),
            excerpt: self.excerpt.clone(),
            published: self.published,
            published_at: self.published_at,
            likes: self.likes.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Article fields served by listing views; `content` is omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleSummary {
    pub id: ArticleId,
    pub author: AuthorSummary,
    pub title: String,
    pub slug: Slug,
    pub excerpt: String,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub likes: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A full article plus the number of comments attached to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDetails {
    pub article: Article,
    pub comments_count: u64,
}

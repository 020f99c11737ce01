//! URL-safe article slugs.
//!
//! Slugs are trimmed, non-empty identifiers composed of lowercase ASCII
//! letters, digits, and single hyphens between them. They are derived from an
//! article title and must be unique across all articles; uniqueness is the
//! repository's concern, shape is enforced here.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Errors raised while deriving or parsing a [`Slug`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// The title contained no ASCII letters or digits.
    NoSlugCharacters,
    /// The value is not a well-formed slug.
    Malformed,
}

impl fmt::Display for SlugError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSlugCharacters => {
                write!(f, "title must contain at least one letter or digit")
            }
            Self::Malformed => write!(
                f,
                "slug may only contain lowercase letters, digits, and hyphens"
            ),
        }
    }
}

impl std::error::Error for SlugError {}

/// URL-safe identifier derived from an article title.
///
/// # Examples
/// ```
/// use backend::domain::Slug;
///
/// let slug = Slug::from_title("Hello, World!").unwrap();
/// assert_eq!(slug.as_ref(), "hello-world");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Derive a slug from a title.
    ///
    /// The title is lower-cased, every run of characters other than ASCII
    /// letters and digits collapses to one hyphen, and leading or trailing
    /// hyphens are stripped.
    pub fn from_title(title: &str) -> Result<Self, SlugError> {
        let mut slug = String::with_capacity(title.len());
        let mut pending_hyphen = false;
        for ch in title.chars().flat_map(char::to_lowercase) {
            if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push(ch);
            } else {
                pending_hyphen = true;
            }
        }
        if slug.is_empty() {
            return Err(SlugError::NoSlugCharacters);
        }
        Ok(Self(slug))
    }

    /// Validate an existing slug, e.g. one supplied in a URL path.
    pub fn parse(value: impl Into<String>) -> Result<Self, SlugError> {
        let value = value.into();
        if is_valid_slug(&value) {
            Ok(Self(value))
        } else {
            Err(SlugError::Malformed)
        }
    }
}

/// Return `true` when `value` is a valid slug.
pub(crate) fn is_valid_slug(value: &str) -> bool {
    is_trimmed_non_empty(value) && has_allowed_slug_chars(value) && has_interior_hyphens(value)
}

fn is_trimmed_non_empty(value: &str) -> bool {
    !value.is_empty() && value.trim() == value
}

fn has_allowed_slug_chars(value: &str) -> bool {
    value
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
}

fn has_interior_hyphens(value: &str) -> bool {
    !value.starts_with('-') && !value.ends_with('-') && !value.contains("--")
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Slug> for String {
    fn from(value: Slug) -> Self {
        value.0
    }
}

impl TryFrom<String> for Slug {
    type Error = SlugError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for slug derivation.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Hello World!", "hello-world")]
    #[case("Hello, World", "hello-world")]
    #[case("  --Rust 2024: what's new?--  ", "rust-2024-what-s-new")]
    #[case("Café au lait", "caf-au-lait")]
    #[case("already-a-slug", "already-a-slug")]
    #[case("MiXeD   CaSe___Title", "mixed-case-title")]
    fn derives_expected_slug(#[case] title: &str, #[case] expected: &str) {
        let slug = Slug::from_title(title).expect("title has slug characters");
        assert_eq!(slug.as_ref(), expected);
    }

    #[rstest]
    #[case("Hello World!", "Hello, World")]
    #[case("hello world", "HELLO -- WORLD")]
    fn distinct_titles_can_share_a_slug(#[case] first: &str, #[case] second: &str) {
        assert_ne!(first, second);
        assert_eq!(Slug::from_title(first), Slug::from_title(second));
    }

    #[rstest]
    #[case("")]
    #[case("!!!")]
    #[case("日本語")]
    fn rejects_titles_without_slug_characters(#[case] title: &str) {
        assert_eq!(Slug::from_title(title), Err(SlugError::NoSlugCharacters));
    }

    #[rstest]
    #[case("hello-world", true)]
    #[case("a1", true)]
    #[case("", false)]
    #[case("-hello", false)]
    #[case("hello-", false)]
    #[case("hello--world", false)]
    #[case("Hello", false)]
    #[case(" hello", false)]
    fn validates_existing_slugs(#[case] value: &str, #[case] valid: bool) {
        assert_eq!(Slug::parse(value).is_ok(), valid);
    }
}

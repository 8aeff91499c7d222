//! Article data model and editorial status.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::UserId;

/// Validation errors raised when creating or editing articles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleValidationError {
    EmptyTitle,
    EmptyContent,
    EmptyCategory,
}

impl fmt::Display for ArticleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EmptyContent => write!(f, "content must not be empty"),
            Self::EmptyCategory => write!(f, "category must not be empty"),
        }
    }
}

impl std::error::Error for ArticleValidationError {}

/// Stable article identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ArticleId(Uuid);

impl ArticleId {
    /// Generate a new random [`ArticleId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ArticleId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Editorial state of an article.
///
/// `Draft` is the initial state; there is no terminal state — a published
/// article can be withdrawn back to `Draft`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    Draft,
    Submitted,
    Published,
}

impl ArticleStatus {
    /// Lowercase label used in log lines and error messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Published => "published",
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain article.
///
/// `category` is a denormalized [`Category`](super::Category) *name*, not an
/// enforced foreign key; category renames cascade over it explicitly.
/// `author_name` and `author_avatar` are snapshots taken when the draft was
/// created and are not live-synced to the author's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub author_id: UserId,
    pub author_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_avatar: Option<String>,
    pub status: ArticleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub(crate) fn validate_title(title: &str) -> Result<(), ArticleValidationError> {
    if title.trim().is_empty() {
        return Err(ArticleValidationError::EmptyTitle);
    }
    Ok(())
}

pub(crate) fn validate_content(content: &str) -> Result<(), ArticleValidationError> {
    if content.trim().is_empty() {
        return Err(ArticleValidationError::EmptyContent);
    }
    Ok(())
}

pub(crate) fn validate_category_name(category: &str) -> Result<(), ArticleValidationError> {
    if category.trim().is_empty() {
        return Err(ArticleValidationError::EmptyCategory);
    }
    Ok(())
}

//! Ad data model.
//!
//! Ads sit outside the editorial workflow; they exist so the admin surface
//! can manage the inventory the display layer consumes.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors raised when creating or editing ads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdValidationError {
    EmptyTitle,
    EmptyContent,
}

impl fmt::Display for AdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "ad title must not be empty"),
            Self::EmptyContent => write!(f, "ad content must not be empty"),
        }
    }
}

impl std::error::Error for AdValidationError {}

/// Stable ad identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct AdId(Uuid);

impl AdId {
    /// Generate a new random [`AdId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for AdId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for AdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Page slot an ad occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AdPlacement {
    HeaderLeaderboard,
    SidebarSquare,
    SidebarSkyscraper,
}

/// How the ad's `content` field is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AdFormat {
    /// `content` is an image URL.
    Image,
    /// `content` is a video URL.
    Video,
    /// `content` is raw markup injected by the display layer.
    Script,
}

/// Domain ad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ad {
    pub id: AdId,
    pub title: String,
    pub placement: AdPlacement,
    pub format: AdFormat,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    pub active: bool,
}

pub(crate) fn validate_ad_fields(title: &str, content: &str) -> Result<(), AdValidationError> {
    if title.trim().is_empty() {
        return Err(AdValidationError::EmptyTitle);
    }
    if content.trim().is_empty() {
        return Err(AdValidationError::EmptyContent);
    }
    Ok(())
}

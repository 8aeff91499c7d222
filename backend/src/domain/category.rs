//! Category data model.
//!
//! `name` is the join key articles reference; `id` stays stable across
//! renames so the taxonomy service can cascade a rename over every
//! referencing article.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::slug::slugify;

/// Validation errors raised when creating or renaming categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    UnusableName,
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "category name must not be empty"),
            Self::UnusableName => {
                write!(f, "category name must contain at least one letter or digit")
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}

/// Stable category identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryId(Uuid);

impl CategoryId {
    /// Generate a new random [`CategoryId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for CategoryId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Domain category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

impl Category {
    /// Validate the name and construct a category with a derived slug.
    pub fn try_new(name: impl Into<String>) -> Result<Self, CategoryValidationError> {
        let name = name.into();
        let slug = derive_slug(&name)?;
        Ok(Self {
            id: CategoryId::random(),
            name,
            slug,
        })
    }

    /// Apply a new name, re-deriving the slug. The id is untouched.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), CategoryValidationError> {
        let name = name.into();
        self.slug = derive_slug(&name)?;
        self.name = name;
        Ok(())
    }
}

fn derive_slug(name: &str) -> Result<String, CategoryValidationError> {
    if name.trim().is_empty() {
        return Err(CategoryValidationError::EmptyName);
    }
    slugify(name).ok_or(CategoryValidationError::UnusableName)
}

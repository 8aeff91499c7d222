//! Port abstraction for category persistence adapters.

use async_trait::async_trait;

use crate::domain::{Category, CategoryId};

use super::StorageError;

/// Port for category storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// List every stored category.
    async fn list(&self) -> Result<Vec<Category>, StorageError>;

    /// Fetch a category by identifier.
    async fn find_by_id(&self, id: &CategoryId) -> Result<Option<Category>, StorageError>;

    /// Fetch a category by its join-key name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, StorageError>;

    /// Insert or update a category record.
    async fn save(&self, category: &Category) -> Result<(), StorageError>;

    /// Delete a category. Returns `false` when no record existed.
    async fn delete(&self, id: &CategoryId) -> Result<bool, StorageError>;
}

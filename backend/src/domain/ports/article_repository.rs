//! Port abstraction for article persistence adapters.

use async_trait::async_trait;

use crate::domain::{Article, ArticleId};

use super::StorageError;

/// Port for article storage.
///
/// `count_by_category` and `reassign_category` exist so the taxonomy
/// service can run its rename/delete cascade as bulk operations inside the
/// adapter rather than read-modify-writing every row through the domain.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// List every stored article.
    async fn list(&self) -> Result<Vec<Article>, StorageError>;

    /// Fetch an article by identifier.
    async fn find_by_id(&self, id: &ArticleId) -> Result<Option<Article>, StorageError>;

    /// Insert or update an article record.
    async fn save(&self, article: &Article) -> Result<(), StorageError>;

    /// Delete an article. Returns `false` when no record existed.
    async fn delete(&self, id: &ArticleId) -> Result<bool, StorageError>;

    /// Count articles whose denormalized category name matches.
    async fn count_by_category(&self, category_name: &str) -> Result<u64, StorageError>;

    /// Rewrite the category name on every matching article.
    ///
    /// Returns the number of articles updated. Must complete (or fail) as a
    /// single bulk step so the caller can report partial cascades.
    async fn reassign_category(&self, from: &str, to: &str) -> Result<u64, StorageError>;
}

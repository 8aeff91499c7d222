//! Port abstraction for ad persistence adapters.

use async_trait::async_trait;

use crate::domain::{Ad, AdId};

use super::StorageError;

/// Port for ad storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdRepository: Send + Sync {
    /// List every stored ad.
    async fn list(&self) -> Result<Vec<Ad>, StorageError>;

    /// Fetch an ad by identifier.
    async fn find_by_id(&self, id: &AdId) -> Result<Option<Ad>, StorageError>;

    /// Insert or update an ad record.
    async fn save(&self, ad: &Ad) -> Result<(), StorageError>;

    /// Delete an ad. Returns `false` when no record existed.
    async fn delete(&self, id: &AdId) -> Result<bool, StorageError>;
}

//! Port abstraction for user persistence adapters.

use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::StorageError;

/// Port for user storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// List every stored user.
    async fn list(&self) -> Result<Vec<User>, StorageError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, StorageError>;

    /// Fetch a user by email address, the login key.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StorageError>;

    /// Insert or update a user record.
    async fn save(&self, user: &User) -> Result<(), StorageError>;

    /// Delete a user. Returns `false` when no record existed.
    async fn delete(&self, id: &UserId) -> Result<bool, StorageError>;

    /// Number of stored users. Startup seeding uses this to detect an
    /// empty store.
    async fn count(&self) -> Result<u64, StorageError>;
}

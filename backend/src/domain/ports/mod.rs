//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Services depend on these traits only; adapters in `outbound` implement
//! them. Each port carries a `mockall` automock for unit tests.

mod ad_repository;
mod article_repository;
mod category_repository;
mod media_store;
mod user_repository;

#[cfg(test)]
pub use ad_repository::MockAdRepository;
pub use ad_repository::AdRepository;
#[cfg(test)]
pub use article_repository::MockArticleRepository;
pub use article_repository::ArticleRepository;
#[cfg(test)]
pub use category_repository::MockCategoryRepository;
pub use category_repository::CategoryRepository;
#[cfg(test)]
pub use media_store::MockMediaStore;
pub use media_store::{MediaStore, MediaStoreError, NullMediaStore};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;

/// Persistence errors raised by store adapters.
///
/// All repositories in this crate are implemented by the same store
/// adapters, so they share one failure taxonomy. The domain treats these as
/// opaque collaborator failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// The store could not be reached or opened.
    #[error("store connection failed: {message}")]
    Connection { message: String },
    /// A query or mutation failed during execution.
    #[error("store query failed: {message}")]
    Query { message: String },
    /// A record could not be encoded or decoded.
    #[error("store serialization failed: {message}")]
    Serialization { message: String },
}

impl StorageError {
    /// Construct a [`StorageError::Connection`].
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Construct a [`StorageError::Query`].
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Construct a [`StorageError::Serialization`].
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

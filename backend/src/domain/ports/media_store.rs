//! Port abstraction for the media upload collaborator.

use async_trait::async_trait;

/// Errors raised by media store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MediaStoreError {
    /// The backing store could not be reached or written.
    #[error("media store unavailable: {message}")]
    Unavailable { message: String },
    /// The upload was refused (bad name, empty payload).
    #[error("media upload rejected: {message}")]
    Rejected { message: String },
}

impl MediaStoreError {
    /// Construct a [`MediaStoreError::Unavailable`].
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Construct a [`MediaStoreError::Rejected`].
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

/// Port for binary media uploads.
///
/// Services use this opportunistically: when an upload fails they fall back
/// to storing inline content verbatim, so implementations should fail fast
/// rather than retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store `bytes` under `file_name` and return a URL for the stored
    /// object.
    async fn store(&self, file_name: &str, bytes: &[u8]) -> Result<String, MediaStoreError>;
}

/// Media store used when no media directory is configured.
///
/// Every upload fails as unavailable, which pushes callers onto the
/// inline-content fallback path.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMediaStore;

#[async_trait]
impl MediaStore for NullMediaStore {
    async fn store(&self, _file_name: &str, _bytes: &[u8]) -> Result<String, MediaStoreError> {
        Err(MediaStoreError::unavailable("no media directory configured"))
    }
}

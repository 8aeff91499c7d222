//! Directory-backed media store adapter.

use std::path::Path;

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::Dir;

use crate::domain::ports::{MediaStore, MediaStoreError};

/// Public URL prefix the HTTP layer serves uploads under.
pub const MEDIA_URL_PREFIX: &str = "/api/v1/media";

/// Media store writing uploads into a capability-scoped directory.
pub struct DirMediaStore {
    dir: Dir,
}

impl DirMediaStore {
    /// Open a media store rooted at `path`. The directory must exist.
    pub fn open(path: &Path) -> Result<Self, MediaStoreError> {
        let dir = Dir::open_ambient_dir(path, ambient_authority()).map_err(|error| {
            MediaStoreError::unavailable(format!(
                "cannot open media directory {}: {error}",
                path.display()
            ))
        })?;
        Ok(Self { dir })
    }

    /// Read a previously stored object back for serving.
    pub fn load(&self, file_name: &str) -> Result<Vec<u8>, MediaStoreError> {
        validate_file_name(file_name)?;
        self.dir.read(file_name).map_err(|error| {
            MediaStoreError::unavailable(format!("cannot read {file_name}: {error}"))
        })
    }
}

/// Names must stay inside the media directory: a single normal path
/// component, no hidden files.
fn validate_file_name(file_name: &str) -> Result<(), MediaStoreError> {
    let valid = !file_name.is_empty()
        && !file_name.starts_with('.')
        && file_name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'));
    if !valid {
        return Err(MediaStoreError::rejected(format!(
            "invalid media file name: {file_name}"
        )));
    }
    Ok(())
}

#[async_trait]
impl MediaStore for DirMediaStore {
    async fn store(&self, file_name: &str, bytes: &[u8]) -> Result<String, MediaStoreError> {
        validate_file_name(file_name)?;
        if bytes.is_empty() {
            return Err(MediaStoreError::rejected("empty media payload"));
        }
        self.dir.write(file_name, bytes).map_err(|error| {
            MediaStoreError::unavailable(format!("cannot write {file_name}: {error}"))
        })?;
        Ok(format!("{MEDIA_URL_PREFIX}/{file_name}"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn stores_and_loads_bytes() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let store = DirMediaStore::open(tmp.path()).expect("opens");
        let url = store.store("pic.png", b"bytes").await.expect("stores");
        assert_eq!(url, "/api/v1/media/pic.png");
        assert_eq!(store.load("pic.png").expect("loads"), b"bytes");
    }

    #[rstest]
    #[case("")]
    #[case(".hidden")]
    #[case("../escape.png")]
    #[case("a/b.png")]
    fn rejects_unsafe_names(#[case] name: &str) {
        assert!(validate_file_name(name).is_err());
    }

    #[tokio::test]
    async fn rejects_empty_payloads() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let store = DirMediaStore::open(tmp.path()).expect("opens");
        let result = store.store("pic.png", b"").await;
        assert!(matches!(result, Err(MediaStoreError::Rejected { .. })));
    }
}

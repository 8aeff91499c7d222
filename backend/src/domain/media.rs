//! Inline media payload handling.
//!
//! Editors paste or pick images that arrive as `data:` URLs. Services decode
//! them here so they can attempt an upload to the media store and fall back
//! to storing the inline payload verbatim when the upload fails.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::warn;
use uuid::Uuid;

use super::ports::MediaStore;

/// A decoded inline `data:` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineMedia {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl InlineMedia {
    /// Parse a base64 `data:` URL. Returns `None` for anything else,
    /// including malformed payloads — callers treat those as ordinary URLs.
    pub fn parse(value: &str) -> Option<Self> {
        let rest = value.strip_prefix("data:")?;
        let (header, payload) = rest.split_once(',')?;
        let content_type = header.strip_suffix(";base64")?;
        let bytes = BASE64.decode(payload.trim()).ok()?;
        Some(Self {
            content_type: content_type.to_owned(),
            bytes,
        })
    }

    /// File extension matching the payload's content type.
    pub fn file_extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "image/png" => "png",
            "image/jpeg" | "image/jpg" => "jpg",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/svg+xml" => "svg",
            "video/mp4" => "mp4",
            "video/webm" => "webm",
            _ => "bin",
        }
    }
}

/// Replace an inline `data:` payload with a stored media URL.
///
/// Upload failures degrade gracefully: the inline content is kept verbatim
/// and a warning is logged. Plain URLs pass through untouched.
pub(crate) async fn resolve_inline(media: &dyn MediaStore, value: String) -> String {
    let Some(inline) = InlineMedia::parse(&value) else {
        return value;
    };
    let file_name = format!("{}.{}", Uuid::new_v4(), inline.file_extension());
    match media.store(&file_name, &inline.bytes).await {
        Ok(url) => url,
        Err(error) => {
            warn!(%error, file_name, "media upload failed; keeping inline content");
            value
        }
    }
}

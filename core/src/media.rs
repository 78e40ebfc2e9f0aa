//! Media delivery: full and partial content responses over the blob store.

use crate::error::{GuideError, Result};
use crate::providers::{BlobStore, BlobStream};
use crate::range::{self, ByteRange};
use std::path::Path;
use std::sync::Arc;

/// Shape of a successful media response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Whole object, status 200.
    Full,
    /// A single byte span, status 206.
    Partial {
        /// Served span.
        range: ByteRange,
        /// Total object size, for `Content-Range`.
        size: u64,
    },
}

/// A media response ready to be written to the wire.
pub struct MediaResponse {
    /// Full or partial.
    pub delivery: Delivery,
    /// MIME type derived from the object's extension.
    pub content_type: &'static str,
    /// Streamed body.
    pub body: BlobStream,
}

impl std::fmt::Debug for MediaResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaResponse")
            .field("delivery", &self.delivery)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Serves blob objects, honoring a single byte range when asked.
#[derive(Clone)]
pub struct MediaDelivery {
    blobs: Arc<dyn BlobStore>,
}

impl MediaDelivery {
    /// Create a media delivery over a blob store.
    #[must_use]
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    /// Serve `object_name`, optionally restricted by a `Range` header value.
    ///
    /// Without a range the object is streamed whole and no stat is issued.
    /// With a range the object is stat-ed, the header resolved against its
    /// size, and only the first surviving span is read.
    ///
    /// # Errors
    ///
    /// - `Validation` when the header is structurally malformed (400)
    /// - `RangeNotSatisfiable` for a non-`bytes` unit or no surviving span (416)
    /// - `NotFound` / `Blob` from the blob store
    pub async fn serve(&self, object_name: &str, range_header: Option<&str>) -> Result<MediaResponse> {
        let content_type = content_type_for(object_name);

        let Some(header) = range_header.filter(|h| !h.trim().is_empty()) else {
            let body = self.blobs.read(object_name, None).await?;
            tracing::debug!(object = object_name, "Serving full object");
            return Ok(MediaResponse {
                delivery: Delivery::Full,
                content_type,
                body,
            });
        };

        let size = self.blobs.stat(object_name).await?.size;
        let set = range::resolve(header, size)?;

        if !set.is_bytes() {
            return Err(GuideError::RangeNotSatisfiable(format!(
                "unsupported range unit {:?}",
                set.unit
            )));
        }

        let Some(range) = set.first() else {
            return Err(GuideError::RangeNotSatisfiable(format!(
                "no satisfiable range in {header:?} for size {size}"
            )));
        };

        let body = self.blobs.read(object_name, Some(range)).await?;
        tracing::debug!(
            object = object_name,
            start = range.start,
            end = range.end,
            size,
            "Serving partial object"
        );

        Ok(MediaResponse {
            delivery: Delivery::Partial { range, size },
            content_type,
            body,
        })
    }
}

/// MIME type for a blob name, by extension.
#[must_use]
pub fn content_type_for(name: &str) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("m4a" | "mp4a") => "audio/mp4",
        Some("aac") => "audio/aac",
        Some("ogg" | "oga" | "opus") => "audio/ogg",
        Some("wav") => "audio/wav",
        Some("flac") => "audio/flac",
        Some("weba") => "audio/webm",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_by_extension() {
        assert_eq!(content_type_for("tours/intro.mp3"), "audio/mpeg");
        assert_eq!(content_type_for("covers/hall.JPG"), "image/jpeg");
        assert_eq!(content_type_for("covers/hall.webp"), "image/webp");
        assert_eq!(content_type_for("README"), "application/octet-stream");
    }
}

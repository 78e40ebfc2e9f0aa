//! Blob storage gateways for the audio guide.
//!
//! - [`FsBlobStore`]: objects are files under a local directory
//! - [`ObjectBlobStore`]: objects live in an S3-compatible bucket
//!
//! [`open`] picks one from a location string. `s3://` URLs select the
//! bucket; anything else is taken as a directory path.

mod fs;
mod object;

pub use fs::{FsBlobStore, CHUNK_SIZE};
pub use object::{ObjectBlobStore, S3Location};

use audio_guide_core::providers::BlobStore;
use audio_guide_core::Result;
use std::sync::Arc;

/// URL scheme that selects the S3 gateway.
pub const S3_SCHEME: &str = "s3";

/// Open the blob store a location string names.
///
/// # Errors
///
/// Returns `Blob` when an `s3://` URL is malformed or the client cannot be
/// built.
pub fn open(location: &str) -> Result<Arc<dyn BlobStore>> {
    if location.starts_with(&format!("{S3_SCHEME}://")) {
        let location: S3Location = location.parse()?;
        tracing::info!(endpoint = %location.endpoint(), bucket = %location.bucket, "Using S3 blob store");
        return Ok(Arc::new(ObjectBlobStore::s3(&location)?));
    }

    tracing::info!(root = location, "Using filesystem blob store");
    Ok(Arc::new(FsBlobStore::new(location)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_plain_path_opens_directory_store() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.mp3"), b"abc").unwrap();

        let store = open(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(store.stat("a.mp3").await.unwrap().size, 3);
    }

    #[tokio::test]
    async fn test_s3_url_opens_bucket_store() {
        assert!(open("s3://key:secret@localhost:9000/media").is_ok());
        assert!(open("s3://key:secret@localhost:9000").is_err());
    }
}

//! Blob storage gateway.

use crate::error::Result;
use crate::range::ByteRange;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// Stream of object bytes in bounded chunks.
///
/// Dropping the stream releases the underlying object handle, which is how
/// a client disconnect stops an in-flight read.
pub type BlobStream = Pin<Box<dyn Stream<Item = std::io::Result<Vec<u8>>> + Send>>;

/// Object metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlobStat {
    /// Object size in bytes.
    pub size: u64,
}

/// Named object storage with partial reads.
///
/// # Implementation Notes
///
/// - `read` with a range must fetch only `[start, end]` (inclusive), never
///   the whole object.
/// - Reads are streamed; implementations must not buffer whole objects.
/// - Unknown names surface as `GuideError::NotFound`, I/O failures as
///   `GuideError::Blob`.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Report the size of an object.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown objects, `Blob` on I/O failure.
    async fn stat(&self, name: &str) -> Result<BlobStat>;

    /// Open an object, optionally restricted to an inclusive byte range.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown objects, `Blob` on I/O failure.
    async fn read(&self, name: &str, range: Option<ByteRange>) -> Result<BlobStream>;
}

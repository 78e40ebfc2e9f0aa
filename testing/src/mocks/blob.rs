//! In-memory blob store.

use async_trait::async_trait;
use audio_guide_core::providers::{BlobStat, BlobStore, BlobStream};
use audio_guide_core::{ByteRange, GuideError, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// A read issued against the store (for assertions).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRead {
    /// Object name.
    pub name: String,
    /// Requested range, `None` for a whole-object read.
    pub range: Option<ByteRange>,
}

#[derive(Debug, Default)]
struct Inner {
    objects: HashMap<String, Vec<u8>>,
    reads: Vec<BlobRead>,
    stats: usize,
    unavailable: bool,
}

/// In-memory blob store that streams objects in fixed-size chunks and
/// records every read and stat.
#[derive(Debug, Clone)]
pub struct InMemoryBlobStore {
    inner: Arc<Mutex<Inner>>,
    chunk_size: usize,
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBlobStore {
    /// Create an empty store with 4 KiB chunks.
    #[must_use]
    pub fn new() -> Self {
        Self::with_chunk_size(4096)
    }

    /// Create an empty store with a custom chunk size.
    #[must_use]
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            chunk_size: chunk_size.max(1),
        }
    }

    /// Store an object.
    pub fn put(&self, name: &str, bytes: impl Into<Vec<u8>>) {
        self.lock().objects.insert(name.to_string(), bytes.into());
    }

    /// Reads issued so far.
    #[must_use]
    pub fn reads(&self) -> Vec<BlobRead> {
        self.lock().reads.clone()
    }

    /// Number of stat calls so far.
    #[must_use]
    pub fn stat_count(&self) -> usize {
        self.lock().stats
    }

    /// Make every subsequent call fail with `GuideError::Blob`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn stat(&self, name: &str) -> Result<BlobStat> {
        let mut inner = self.lock();
        if inner.unavailable {
            return Err(GuideError::Blob("service unavailable".to_string()));
        }
        inner.stats += 1;

        let object = inner
            .objects
            .get(name)
            .ok_or_else(|| GuideError::not_found("blob", name))?;

        Ok(BlobStat {
            size: object.len() as u64,
        })
    }

    async fn read(&self, name: &str, range: Option<ByteRange>) -> Result<BlobStream> {
        let mut inner = self.lock();
        if inner.unavailable {
            return Err(GuideError::Blob("service unavailable".to_string()));
        }
        inner.reads.push(BlobRead {
            name: name.to_string(),
            range,
        });

        let object = inner
            .objects
            .get(name)
            .ok_or_else(|| GuideError::not_found("blob", name))?;

        let bytes = match range {
            None => object.as_slice(),
            Some(range) => {
                let start = usize::try_from(range.start).unwrap_or(usize::MAX);
                let end = usize::try_from(range.end).unwrap_or(usize::MAX);
                object
                    .get(start..=end)
                    .ok_or_else(|| GuideError::Blob(format!("range {start}-{end} outside {name}")))?
            }
        };

        let chunks: Vec<std::io::Result<Vec<u8>>> = bytes
            .chunks(self.chunk_size)
            .map(|chunk| Ok(chunk.to_vec()))
            .collect();

        Ok(Box::pin(futures::stream::iter(chunks)))
    }
}

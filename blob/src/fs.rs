//! Filesystem blob store.
//!
//! Objects are files under a root directory, addressed by relative names
//! such as `audio/en/hall-1.mp3`. Partial reads seek to the start of the
//! span and stream at most its length, so a seek inside a long track never
//! touches the bytes before it.

use async_trait::async_trait;
use audio_guide_core::providers::{BlobStat, BlobStore, BlobStream};
use audio_guide_core::{ByteRange, GuideError, Result};
use std::io::{ErrorKind, SeekFrom};
use std::path::{Component, Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// Size of the chunks a file read is streamed in.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Blob store over a local directory.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Create a store rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map an object name to a path under the root.
    ///
    /// Only plain relative names are accepted: no `..`, no absolute paths.
    fn resolve(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name);
        let plain = !name.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));

        if !plain {
            tracing::warn!(object = name, "Rejected blob name outside the root");
            return Err(GuideError::not_found("blob", name));
        }

        Ok(self.root.join(relative))
    }
}

fn io_error(name: &str, error: &std::io::Error) -> GuideError {
    if error.kind() == ErrorKind::NotFound {
        GuideError::not_found("blob", name)
    } else {
        GuideError::Blob(format!("{name}: {error}"))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn stat(&self, name: &str) -> Result<BlobStat> {
        let path = self.resolve(name)?;
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| io_error(name, &e))?;

        if !metadata.is_file() {
            return Err(GuideError::not_found("blob", name));
        }

        Ok(BlobStat {
            size: metadata.len(),
        })
    }

    async fn read(&self, name: &str, range: Option<ByteRange>) -> Result<BlobStream> {
        let path = self.resolve(name)?;
        let mut file = File::open(&path).await.map_err(|e| io_error(name, &e))?;

        let limit = match range {
            Some(range) => {
                file.seek(SeekFrom::Start(range.start))
                    .await
                    .map_err(|e| io_error(name, &e))?;
                range.len()
            }
            None => u64::MAX,
        };

        let stream = async_stream::stream! {
            let mut reader = file.take(limit);
            loop {
                let mut chunk = vec![0_u8; CHUNK_SIZE];
                match reader.read(&mut chunk).await {
                    Ok(0) => break,
                    Ok(read) => {
                        chunk.truncate(read);
                        yield Ok::<_, std::io::Error>(chunk);
                    }
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

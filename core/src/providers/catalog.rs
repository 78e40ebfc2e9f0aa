//! Guide object catalog.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Language used when an object has no translation for the requested one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Cover image of a guide object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cover {
    /// Position of the cover in the carousel.
    pub index: i32,
    /// Blob name of the image. Never exposed to clients.
    #[serde(skip_serializing)]
    pub path: String,
}

/// A point of interest with its localized title, covers and audio track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuideObject {
    /// Public object code (printed next to the exhibit).
    #[serde(skip_serializing)]
    pub code: String,
    /// Localized title.
    pub title: String,
    /// Cover images, ordered by index.
    pub covers: Vec<Cover>,
    /// Blob name of the localized audio track. Never exposed to clients.
    #[serde(skip_serializing)]
    pub audio_path: String,
}

impl GuideObject {
    /// Blob name of the cover at `index`, if any.
    #[must_use]
    pub fn cover_path(&self, index: i32) -> Option<&str> {
        self.covers
            .iter()
            .find(|cover| cover.index == index)
            .map(|cover| cover.path.as_str())
    }
}

/// Read access to guide objects.
///
/// Implementations fall back to [`DEFAULT_LANGUAGE`] when no translation
/// exists for `language`.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Look up an object by its public code.
    ///
    /// # Errors
    ///
    /// Returns `Storage` on I/O failure.
    async fn find_object(&self, code: &str, language: &str) -> Result<Option<GuideObject>>;
}

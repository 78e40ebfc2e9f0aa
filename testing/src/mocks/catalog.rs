//! In-memory guide object catalog.

use async_trait::async_trait;
use audio_guide_core::providers::catalog::DEFAULT_LANGUAGE;
use audio_guide_core::providers::{CatalogStore, Cover, GuideObject};
use audio_guide_core::Result;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// In-memory catalog keyed by `(code, language)`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    objects: Arc<RwLock<HashMap<(String, String), GuideObject>>>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object translation.
    pub fn insert(&self, language: &str, object: GuideObject) {
        self.objects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((object.code.clone(), language.to_string()), object);
    }

    /// Add an English object with one cover per path, indexed from 0.
    pub fn insert_simple(&self, code: &str, title: &str, audio_path: &str, covers: &[&str]) {
        let covers = covers
            .iter()
            .zip(0..)
            .map(|(path, index)| Cover {
                index,
                path: (*path).to_string(),
            })
            .collect();

        self.insert(
            DEFAULT_LANGUAGE,
            GuideObject {
                code: code.to_string(),
                title: title.to_string(),
                covers,
                audio_path: audio_path.to_string(),
            },
        );
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn find_object(&self, code: &str, language: &str) -> Result<Option<GuideObject>> {
        let objects = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        let found = objects
            .get(&(code.to_string(), language.to_string()))
            .or_else(|| objects.get(&(code.to_string(), DEFAULT_LANGUAGE.to_string())))
            .cloned();

        Ok(found)
    }
}

//! In-memory configuration store.

use async_trait::async_trait;
use audio_guide_core::providers::ConfigStore;
use audio_guide_core::ticket::{TICKET_CURRENCY_KEY, TICKET_PRICE_KEY};
use audio_guide_core::{GuideError, Result};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// In-memory key/value configuration.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConfigStore {
    values: Arc<RwLock<HashMap<String, String>>>,
    unavailable: Arc<RwLock<bool>>,
}

impl InMemoryConfigStore {
    /// Create an empty store (payments disabled).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with a published price.
    #[must_use]
    pub fn with_price(currency: &str, amount: i64) -> Self {
        let store = Self::new();
        store.set(TICKET_CURRENCY_KEY, currency);
        store.set(TICKET_PRICE_KEY, &amount.to_string());
        store
    }

    /// Set a value.
    pub fn set(&self, key: &str, value: &str) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }

    /// Remove a value.
    pub fn remove(&self, key: &str) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    /// Make every subsequent read fail with `GuideError::Storage`.
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write().unwrap_or_else(PoisonError::into_inner) = unavailable;
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn get_value(&self, key: &str) -> Result<Option<String>> {
        if *self.unavailable.read().unwrap_or_else(PoisonError::into_inner) {
            return Err(GuideError::Storage("connection refused".to_string()));
        }

        Ok(self
            .values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }
}

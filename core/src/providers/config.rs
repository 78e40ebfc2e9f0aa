//! Runtime configuration values stored alongside the data.

use crate::error::Result;
use async_trait::async_trait;

/// Key/value configuration read at request time (e.g. the published price).
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Read a value; `None` when the key is not set.
    ///
    /// # Errors
    ///
    /// Returns `Storage` on I/O failure.
    async fn get_value(&self, key: &str) -> Result<Option<String>>;
}

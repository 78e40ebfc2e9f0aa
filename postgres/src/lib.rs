//! `PostgreSQL` storage gateway for the audio guide.
//!
//! One [`PostgresStorage`] over a shared `PgPool` implements every
//! relational collaborator of the core:
//!
//! - [`TicketStore`]: the ticket ledger, including the conditional update
//!   that makes activation exactly-once across service instances
//! - [`ConfigStore`]: operator-editable settings such as the published price
//! - [`CatalogStore`]: guide objects with per-language titles and audio
//!
//! # Example
//!
//! ```no_run
//! use audio_guide_postgres::PostgresStorage;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage =
//!     PostgresStorage::connect("postgres://localhost/guide", 10, Duration::from_secs(30)).await?;
//! storage.migrate().await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use audio_guide_core::providers::catalog::DEFAULT_LANGUAGE;
use audio_guide_core::providers::{CatalogStore, ConfigStore, Cover, GuideObject, TicketStore};
use audio_guide_core::{GuideError, Result, Ticket, TicketCode};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use std::time::Duration;
use uuid::Uuid;

/// `PostgreSQL`-backed storage gateway.
#[derive(Clone)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    /// Wrap an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`GuideError::Storage`] if the database cannot be reached.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(connect_timeout)
            .connect(database_url)
            .await
            .map_err(|e| GuideError::Storage(format!("Failed to connect: {e}")))?;

        Ok(Self::new(pool))
    }

    /// Run database migrations.
    ///
    /// # Errors
    ///
    /// Returns [`GuideError::Storage`] if a migration fails.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| GuideError::Storage(format!("Migration failed: {e}")))?;
        Ok(())
    }

    /// Check that the database answers.
    ///
    /// # Errors
    ///
    /// Returns [`GuideError::Storage`] if the round trip fails.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("ping", &e))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn find_translation(
        &self,
        code: &str,
        language: &str,
    ) -> Result<Option<(i64, String, String)>> {
        let row = sqlx::query(
            r"
            SELECT objects.object_id, objects_i18n.title, objects_i18n.audio_path
            FROM objects
            JOIN objects_i18n ON objects.object_id = objects_i18n.object_id
            WHERE objects.code = $1 AND objects_i18n.language = $2
            ",
        )
        .bind(code)
        .bind(language)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_error("get object", &e))?;

        row.map(|row| -> Result<(i64, String, String)> {
            Ok((
                row.try_get("object_id").map_err(|e| storage_error("decode object", &e))?,
                row.try_get("title").map_err(|e| storage_error("decode object", &e))?,
                row.try_get("audio_path").map_err(|e| storage_error("decode object", &e))?,
            ))
        })
        .transpose()
    }

    async fn find_covers(&self, object_id: i64) -> Result<Vec<Cover>> {
        let rows = sqlx::query(r#"SELECT "index", path FROM covers WHERE object_id = $1 ORDER BY "index""#)
            .bind(object_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error("get covers", &e))?;

        rows.iter()
            .map(|row| -> Result<Cover> {
                Ok(Cover {
                    index: row.try_get("index").map_err(|e| storage_error("decode cover", &e))?,
                    path: row.try_get("path").map_err(|e| storage_error("decode cover", &e))?,
                })
            })
            .collect()
    }
}

fn storage_error(operation: &str, error: &sqlx::Error) -> GuideError {
    GuideError::Storage(format!("Failed to {operation}: {error}"))
}

#[async_trait]
impl TicketStore for PostgresStorage {
    async fn insert_ticket(&self, code: TicketCode) -> Result<()> {
        sqlx::query("INSERT INTO tickets (code, used) VALUES ($1, false)")
            .bind(code.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return GuideError::Conflict(format!("ticket {code} already exists"));
                    }
                }
                storage_error("create ticket", &e)
            })?;

        Ok(())
    }

    async fn find_ticket(&self, code: TicketCode) -> Result<Option<Ticket>> {
        let row = sqlx::query("SELECT ticket_id, code, used FROM tickets WHERE code = $1")
            .bind(code.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("get ticket", &e))?;

        row.map(|row| -> Result<Ticket> {
            let id: i64 = row.try_get("ticket_id").map_err(|e| storage_error("decode ticket", &e))?;
            let code: Uuid = row.try_get("code").map_err(|e| storage_error("decode ticket", &e))?;
            let used: bool = row.try_get("used").map_err(|e| storage_error("decode ticket", &e))?;
            Ok(Ticket {
                id,
                code: TicketCode::from_uuid(code),
                used,
            })
        })
        .transpose()
    }

    async fn mark_used(&self, code: TicketCode) -> Result<u64> {
        let result = sqlx::query("UPDATE tickets SET used = true WHERE code = $1 AND used = false")
            .bind(code.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| storage_error("activate ticket", &e))?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl ConfigStore for PostgresStorage {
    async fn get_value(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM config WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("get config value", &e))?;

        Ok(value)
    }
}

#[async_trait]
impl CatalogStore for PostgresStorage {
    async fn find_object(&self, code: &str, language: &str) -> Result<Option<GuideObject>> {
        let mut translation = self.find_translation(code, language).await?;
        if translation.is_none() && language != DEFAULT_LANGUAGE {
            tracing::debug!(object = code, language, "No translation, falling back to default");
            translation = self.find_translation(code, DEFAULT_LANGUAGE).await?;
        }

        let Some((object_id, title, audio_path)) = translation else {
            return Ok(None);
        };

        let covers = self.find_covers(object_id).await?;

        Ok(Some(GuideObject {
            code: code.to_string(),
            title,
            covers,
            audio_path,
        }))
    }
}

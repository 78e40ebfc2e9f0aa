//! Configuration management for the audio guide server.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Secrets (bot token, payments token, JWT secret, database password) are
//! never logged; [`Config`] redacts them in its `Debug` output.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set (or is empty).
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid value {value:?} for {name}: {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
        /// Parser message.
        reason: String,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// `PostgreSQL` configuration
    pub database: DatabaseConfig,
    /// Where media objects live: an `s3://` URL or a directory path
    pub blob_location: String,
    /// Telegram Bot API configuration
    pub telegram: TelegramConfig,
    /// Secret for signing access tokens
    pub jwt_secret: String,
    /// HTTP server configuration
    pub server: ServerConfig,
}

/// `PostgreSQL` configuration
#[derive(Clone)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout: u64,
}

/// Telegram configuration
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot API token
    pub bot_token: String,
    /// Payment provider token passed with invoices
    pub payments_token: String,
    /// URL of the companion web app
    pub web_app_url: String,
    /// Bot API base URL
    pub api_url: String,
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Allowed CORS origins; `["*"]` allows any
    pub cors_allowed_origins: Vec<String>,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first missing or invalid variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first missing or invalid variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        Ok(Self {
            database: DatabaseConfig {
                url: vars.required("DATABASE_URL")?,
                max_connections: vars.parsed_or("DATABASE_MAX_CONNECTIONS", 10)?,
                connect_timeout: vars.parsed_or("DATABASE_CONNECT_TIMEOUT", 30)?,
            },
            blob_location: match vars.optional("BLOB_URL") {
                Some(url) => url,
                None => vars.required("BLOB_ROOT")?,
            },
            telegram: TelegramConfig {
                bot_token: vars.required("TELEGRAM_BOT_TOKEN")?,
                payments_token: vars.required("TELEGRAM_PAYMENTS_TOKEN")?,
                web_app_url: vars.required("TELEGRAM_WEB_APP_URL")?,
                api_url: vars
                    .optional("TELEGRAM_API_URL")
                    .unwrap_or_else(|| audio_guide_telegram::DEFAULT_API_URL.to_string()),
            },
            jwt_secret: vars.required("JWT_SECRET")?,
            server: ServerConfig {
                host: vars.optional("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: vars.parsed_or("PORT", 3000)?,
                cors_allowed_origins: vars
                    .optional("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|| "*".to_string())
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect(),
                shutdown_timeout: vars.parsed_or("SHUTDOWN_TIMEOUT", 30)?,
            },
        })
    }
}

impl Config {
    /// Blob location with any credentials masked, for logging.
    #[must_use]
    pub fn redacted_blob_location(&self) -> String {
        match self.blob_location.split_once("://") {
            Some((scheme, rest)) => match rest.split_once('@') {
                Some((_, host)) => format!("{scheme}://***@{host}"),
                None => self.blob_location.clone(),
            },
            None => self.blob_location.clone(),
        }
    }
}

impl DatabaseConfig {
    /// Connection timeout as a [`Duration`].
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    /// Connection URL with the password masked, for logging.
    #[must_use]
    pub fn redacted_url(&self) -> String {
        match self.url.split_once('@') {
            Some((_, host)) => format!("postgres://***@{host}"),
            None => self.url.clone(),
        }
    }
}

impl ServerConfig {
    /// `host:port` to bind to.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database", &self.database)
            .field("blob_location", &self.redacted_blob_location())
            .field("telegram", &self.telegram)
            .field("jwt_secret", &"***")
            .field("server", &self.server)
            .finish()
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.redacted_url())
            .field("max_connections", &self.max_connections)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"***")
            .field("payments_token", &"***")
            .field("web_app_url", &self.web_app_url)
            .field("api_url", &self.api_url)
            .finish()
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, name: &str) -> Option<String> {
        (self.0)(name).filter(|value| !value.trim().is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.optional(name).ok_or(ConfigError::Missing(name))
    }

    fn parsed_or<T>(&self, name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.optional(name) {
            None => Ok(default),
            Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                name,
                reason: e.to_string(),
                value,
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn required() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("DATABASE_URL", "postgres://guide:secret@db:5432/guide"),
            ("BLOB_ROOT", "/srv/media"),
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("TELEGRAM_PAYMENTS_TOKEN", "pay"),
            ("TELEGRAM_WEB_APP_URL", "https://guide.example/app"),
            ("JWT_SECRET", "s3cret"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<Config, ConfigError> {
        Config::from_lookup(|name| vars.get(name).map(|v| (*v).to_string()))
    }

    #[test]
    fn test_defaults() {
        let config = load(&required()).unwrap();

        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.connect_timeout, 30);
        assert_eq!(config.telegram.api_url, "https://api.telegram.org");
        assert_eq!(config.server.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.server.cors_allowed_origins, vec!["*".to_string()]);
        assert_eq!(config.server.shutdown_timeout, 30);
    }

    #[test]
    fn test_missing_secret_is_reported() {
        let mut vars = required();
        vars.remove("JWT_SECRET");
        assert_eq!(load(&vars).unwrap_err(), ConfigError::Missing("JWT_SECRET"));

        vars.insert("JWT_SECRET", "  ");
        assert_eq!(load(&vars).unwrap_err(), ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn test_invalid_port_is_reported() {
        let mut vars = required();
        vars.insert("PORT", "http");
        assert!(matches!(
            load(&vars).unwrap_err(),
            ConfigError::Invalid { name: "PORT", .. }
        ));
    }

    #[test]
    fn test_cors_origins_are_split() {
        let mut vars = required();
        vars.insert("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example,");
        let config = load(&vars).unwrap();
        assert_eq!(
            config.server.cors_allowed_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn test_blob_url_takes_precedence_over_root() {
        let config = load(&required()).unwrap();
        assert_eq!(config.blob_location, "/srv/media");

        let mut vars = required();
        vars.insert("BLOB_URL", "s3://guide:minio-secret@minio:9000/media");
        let config = load(&vars).unwrap();
        assert_eq!(config.blob_location, "s3://guide:minio-secret@minio:9000/media");
        assert_eq!(config.redacted_blob_location(), "s3://***@minio:9000/media");
        assert!(!format!("{config:?}").contains("minio-secret"));

        vars.remove("BLOB_ROOT");
        assert!(load(&vars).is_ok());
    }

    #[test]
    fn test_missing_blob_location_is_reported() {
        let mut vars = required();
        vars.remove("BLOB_ROOT");
        assert_eq!(load(&vars).unwrap_err(), ConfigError::Missing("BLOB_ROOT"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", load(&required()).unwrap());
        assert!(!rendered.contains("s3cret"));
        assert!(!rendered.contains("123:abc"));
        assert!(!rendered.contains("guide:secret"));
    }
}

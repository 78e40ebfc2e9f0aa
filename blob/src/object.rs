//! S3-compatible object store.
//!
//! Talks to MinIO or AWS through [`object_store`]. `stat` is a `HEAD`;
//! ranged reads send a `GET` with a `Range` header, so only the requested
//! span crosses the network. Bodies stream through as they arrive.

use async_trait::async_trait;
use audio_guide_core::providers::{BlobStat, BlobStore, BlobStream};
use audio_guide_core::{ByteRange, GuideError, Result};
use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path;
use object_store::{GetOptions, GetRange, ObjectStore};
use percent_encoding::percent_decode_str;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use url::Url;

/// Region used when the URL names none. MinIO ignores it.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Connection settings parsed from
/// `s3://<access key>:<secret>@<host>[:port]/<bucket>?ssl=true&region=<region>`.
///
/// `ssl` defaults to false, matching a MinIO instance on a private network.
#[derive(Clone, PartialEq, Eq)]
pub struct S3Location {
    /// `host[:port]` of the S3 endpoint.
    pub host: String,
    /// Bucket holding the objects.
    pub bucket: String,
    /// Access key id; empty for anonymous access.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Signing region.
    pub region: String,
    /// Whether to talk HTTPS.
    pub ssl: bool,
}

impl S3Location {
    /// Endpoint URL with the scheme `ssl` selects.
    #[must_use]
    pub fn endpoint(&self) -> String {
        let scheme = if self.ssl { "https" } else { "http" };
        format!("{scheme}://{}", self.host)
    }
}

fn invalid_location(reason: impl fmt::Display) -> GuideError {
    GuideError::Blob(format!("invalid S3 location: {reason}"))
}

fn decoded(component: &str) -> Result<String> {
    percent_decode_str(component)
        .decode_utf8()
        .map(|value| value.into_owned())
        .map_err(invalid_location)
}

impl FromStr for S3Location {
    type Err = GuideError;

    fn from_str(s: &str) -> Result<Self> {
        let url = Url::parse(s).map_err(invalid_location)?;

        let Some(host) = url.host_str().filter(|host| !host.is_empty()) else {
            return Err(invalid_location("missing host"));
        };
        let host = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        let bucket = url.path().trim_matches('/');
        if bucket.is_empty() {
            return Err(invalid_location("missing bucket"));
        }

        let mut region = DEFAULT_REGION.to_string();
        let mut ssl = false;
        for (key, value) in url.query_pairs() {
            match &*key {
                "ssl" => ssl = matches!(&*value, "1" | "t" | "T" | "true" | "TRUE" | "True"),
                "region" => region = value.into_owned(),
                _ => {}
            }
        }

        Ok(Self {
            host,
            bucket: bucket.to_string(),
            access_key_id: decoded(url.username())?,
            secret_access_key: decoded(url.password().unwrap_or_default())?,
            region,
            ssl,
        })
    }
}

impl fmt::Debug for S3Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Location")
            .field("host", &self.host)
            .field("bucket", &self.bucket)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("region", &self.region)
            .field("ssl", &self.ssl)
            .finish()
    }
}

/// Blob store over any [`ObjectStore`]; in production an S3 bucket.
#[derive(Debug, Clone)]
pub struct ObjectBlobStore {
    store: Arc<dyn ObjectStore>,
}

impl ObjectBlobStore {
    /// Wrap an existing object store.
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Build a client for an S3-compatible bucket.
    ///
    /// # Errors
    ///
    /// Returns `Blob` when the client configuration is rejected.
    pub fn s3(location: &S3Location) -> Result<Self> {
        let mut builder = AmazonS3Builder::new()
            .with_endpoint(location.endpoint())
            .with_bucket_name(&location.bucket)
            .with_region(&location.region)
            .with_allow_http(!location.ssl)
            .with_virtual_hosted_style_request(false);

        if !location.access_key_id.is_empty() {
            builder = builder
                .with_access_key_id(&location.access_key_id)
                .with_secret_access_key(&location.secret_access_key);
        }

        let store = builder.build().map_err(invalid_location)?;
        Ok(Self::new(Arc::new(store)))
    }

    /// Map an object name to a store path.
    ///
    /// Names with empty, `.` or `..` segments are rejected like unknown objects.
    fn path(name: &str) -> Result<Path> {
        Path::parse(name)
            .ok()
            .filter(|path| !name.is_empty() && AsRef::<str>::as_ref(path) == name)
            .ok_or_else(|| {
                tracing::warn!(object = name, "Rejected malformed blob name");
                GuideError::not_found("blob", name)
            })
    }
}

fn store_error(name: &str, error: object_store::Error) -> GuideError {
    match error {
        object_store::Error::NotFound { .. } => GuideError::not_found("blob", name),
        other => GuideError::Blob(format!("{name}: {other}")),
    }
}

#[async_trait]
impl BlobStore for ObjectBlobStore {
    async fn stat(&self, name: &str) -> Result<BlobStat> {
        let path = Self::path(name)?;
        let meta = self
            .store
            .head(&path)
            .await
            .map_err(|e| store_error(name, e))?;

        let size = u64::try_from(meta.size)
            .map_err(|e| GuideError::Blob(format!("{name}: {e}")))?;
        Ok(BlobStat { size })
    }

    async fn read(&self, name: &str, range: Option<ByteRange>) -> Result<BlobStream> {
        let path = Self::path(name)?;

        let range = match range {
            Some(range) => {
                let bound = |offset: u64| {
                    usize::try_from(offset).map_err(|e| GuideError::Blob(format!("{name}: {e}")))
                };
                Some(GetRange::Bounded(bound(range.start)?..bound(range.end)? + 1))
            }
            None => None,
        };

        let options = GetOptions {
            range,
            ..GetOptions::default()
        };
        let result = self
            .store
            .get_opts(&path, options)
            .await
            .map_err(|e| store_error(name, e))?;

        let stream = result
            .into_stream()
            .map_ok(|bytes| bytes.to_vec())
            .map_err(std::io::Error::other);
        Ok(Box::pin(stream))
    }
}

//! Custom Axum extractors.
//!
//! - `RequestId`: the id assigned by the request id middleware
//! - `AuthorizationToken`: access token from the `Authorization` header
//! - `QueryAccessToken`: access token from the `access-token` query parameter
//! - `RangeHeader`: raw `Range` header value, if any
//!
//! Token extractors only read the token; verifying it is up to the handler.

use crate::error::AppError;
use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{header, request::Parts},
};
use serde::Deserialize;
use uuid::Uuid;

/// Request id for tracing.
///
/// Read from request extensions (set by
/// [`request_id_layer`](crate::middleware::request_id_layer)), or freshly
/// generated when the middleware is not installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Self>()
            .copied()
            .unwrap_or_else(|| Self(Uuid::new_v4())))
    }
}

/// Access token sent as `Authorization: <token>` or
/// `Authorization: Bearer <token>`.
///
/// Rejects with 401 when the header is missing or empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for AuthorizationToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .unwrap_or_default();

        let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
        if token.is_empty() {
            return Err(AppError::unauthorized("missing access token"));
        }

        Ok(Self(token.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct AccessTokenQuery {
    #[serde(rename = "access-token")]
    access_token: Option<String>,
}

/// Access token sent as `?access-token=<token>`.
///
/// Media elements (`<audio>`, `<img>`) cannot set headers, so media routes
/// take the token from the query string. Rejects with 401 when missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryAccessToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for QueryAccessToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<AccessTokenQuery>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::bad_request(format!("invalid query string: {e}")))?;

        match query.access_token.filter(|token| !token.trim().is_empty()) {
            Some(token) => Ok(Self(token)),
            None => Err(AppError::unauthorized("missing access token")),
        }
    }
}

/// Raw `Range` header value. `None` when the header is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeHeader(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for RangeHeader
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(header::RANGE)
            .map(|value| {
                value
                    .to_str()
                    .map(str::to_string)
                    .map_err(|_| AppError::bad_request("Range header is not ASCII"))
            })
            .transpose()
            .map(Self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};

    fn request_parts(builder: axum::http::request::Builder) -> Parts {
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_authorization_accepts_bare_and_bearer() {
        for value in ["abc.def.ghi", "Bearer abc.def.ghi"] {
            let mut parts = request_parts(Request::builder().header("Authorization", value));
            let token = AuthorizationToken::from_request_parts(&mut parts, &()).await.unwrap();
            assert_eq!(token.0, "abc.def.ghi");
        }
    }

    #[tokio::test]
    async fn test_missing_authorization_is_unauthorized() {
        let mut parts = request_parts(Request::builder());
        let err = AuthorizationToken::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_query_access_token() {
        let mut parts = request_parts(Request::builder().uri("/objects/a1/audio?access-token=tok"));
        let token = QueryAccessToken::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(token.0, "tok");

        let mut parts = request_parts(Request::builder().uri("/objects/a1/audio"));
        let err = QueryAccessToken::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_range_header() {
        let mut parts = request_parts(Request::builder().header("Range", "bytes=0-99"));
        let range = RangeHeader::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(range.0.as_deref(), Some("bytes=0-99"));

        let mut parts = request_parts(Request::builder());
        let range = RangeHeader::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(range.0, None);
    }
}

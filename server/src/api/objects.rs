//! Guide object endpoints.
//!
//! - GET /objects/:code - Localized title and cover indexes
//! - GET /objects/:code/covers/:index - Cover image
//! - GET /objects/:code/audio - Audio track, seekable with `Range`
//!
//! Metadata takes the access token from the `Authorization` header. Media
//! routes take it from `?access-token=` because `<audio>` and `<img>`
//! elements cannot set headers.

use crate::metrics;
use crate::server::state::AppState;
use audio_guide_core::providers::catalog::DEFAULT_LANGUAGE;
use audio_guide_core::providers::GuideObject;
use audio_guide_core::{Delivery, GuideError, MediaResponse};
use audio_guide_web::{AppError, AuthorizationToken, JSend, QueryAccessToken, RangeHeader, WebResult};
use axum::{
    body::Body,
    extract::rejection::{PathRejection, QueryRejection},
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::Response,
};
use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters shared by object routes.
#[derive(Debug, Default, Deserialize)]
pub struct LanguageQuery {
    /// Preferred translation, defaults to English
    pub language: Option<String>,
}

impl LanguageQuery {
    fn language(&self) -> &str {
        self.language
            .as_deref()
            .map(str::trim)
            .filter(|language| !language.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE)
    }
}

/// Object metadata as exposed to the web app.
#[derive(Debug, Serialize)]
pub struct ObjectResponse {
    /// Localized title
    pub title: String,
    /// Available covers
    pub covers: Vec<CoverResponse>,
}

/// A cover reference. Blob paths stay internal.
#[derive(Debug, Serialize)]
pub struct CoverResponse {
    /// Cover index for `/objects/:code/covers/:index`
    pub index: i32,
}

impl From<GuideObject> for ObjectResponse {
    fn from(object: GuideObject) -> Self {
        Self {
            title: object.title,
            covers: object
                .covers
                .iter()
                .map(|cover| CoverResponse { index: cover.index })
                .collect(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Get object metadata.
///
/// # Errors
///
/// - 400: malformed token
/// - 401: missing, forged or expired token
/// - 404: unknown object
pub async fn get_object(
    State(state): State<AppState>,
    AuthorizationToken(token): AuthorizationToken,
    Path(code): Path<String>,
    query: Result<Query<LanguageQuery>, QueryRejection>,
) -> WebResult<JSend<ObjectResponse>> {
    authorize(&state, &token)?;
    let Query(query) = query.map_err(|e| AppError::bad_request(e.body_text()))?;

    let object = find_object(&state, &code, query.language()).await?;
    Ok(JSend::ok(ObjectResponse::from(object)))
}

/// Stream a cover image.
///
/// # Errors
///
/// - 400: malformed path or token
/// - 401: missing, forged or expired token
/// - 404: unknown object, cover or blob
pub async fn get_cover(
    State(state): State<AppState>,
    QueryAccessToken(token): QueryAccessToken,
    path: Result<Path<(String, i32)>, PathRejection>,
) -> WebResult<Response> {
    authorize(&state, &token)?;
    let Path((code, index)) = path.map_err(|e| AppError::bad_request(e.body_text()))?;

    let object = find_object(&state, &code, DEFAULT_LANGUAGE).await?;
    let cover = object
        .cover_path(index)
        .ok_or_else(|| AppError::not_found("cover", format!("{code}/{index}")))?;

    serve(&state, cover, None).await
}

/// Stream the audio track, honoring a single byte range.
///
/// # Errors
///
/// - 400: malformed token or `Range` header
/// - 401: missing, forged or expired token
/// - 404: unknown object or blob
/// - 416: unsupported range unit or no satisfiable range
pub async fn get_audio(
    State(state): State<AppState>,
    QueryAccessToken(token): QueryAccessToken,
    RangeHeader(range): RangeHeader,
    Path(code): Path<String>,
    query: Result<Query<LanguageQuery>, QueryRejection>,
) -> WebResult<Response> {
    authorize(&state, &token)?;
    let Query(query) = query.map_err(|e| AppError::bad_request(e.body_text()))?;

    let object = find_object(&state, &code, query.language()).await?;
    serve(&state, &object.audio_path, range.as_deref()).await
}

// ============================================================================
// Helpers
// ============================================================================

fn authorize(state: &AppState, token: &str) -> WebResult<()> {
    state.credentials.verify(token, state.clock.now())?;
    Ok(())
}

async fn find_object(state: &AppState, code: &str, language: &str) -> WebResult<GuideObject> {
    state
        .catalog
        .find_object(code, language)
        .await?
        .ok_or_else(|| AppError::not_found("object", code))
}

async fn serve(state: &AppState, blob: &str, range: Option<&str>) -> WebResult<Response> {
    match state.media.serve(blob, range).await {
        Ok(media) => media_response(media),
        Err(e) => {
            if matches!(e, GuideError::Validation(_) | GuideError::RangeNotSatisfiable(_)) {
                metrics::record_media_response("rejected");
            }
            Err(e.into())
        }
    }
}

fn media_response(media: MediaResponse) -> WebResult<Response> {
    let builder = Response::builder()
        .header(header::CONTENT_TYPE, media.content_type)
        .header(header::ACCEPT_RANGES, "bytes");

    let builder = match media.delivery {
        Delivery::Full => {
            metrics::record_media_response("full");
            builder.status(StatusCode::OK)
        }
        Delivery::Partial { range, size } => {
            metrics::record_media_response("partial");
            builder
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_RANGE, range.content_range(size))
                .header(header::CONTENT_LENGTH, range.len().to_string())
        }
    };

    builder
        .body(Body::from_stream(media.body))
        .map_err(|e| AppError::internal("failed to build media response").with_source(e.into()))
}

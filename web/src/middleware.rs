//! Request id tracking and access logging.
//!
//! # Flow
//!
//! 1. **Extract** the request id from `X-Request-ID` (or generate a new UUID)
//! 2. **Store** it in request extensions for handler access
//! 3. **Run** the request inside an `http_request` span carrying the id
//! 4. **Log** status and latency at a level chosen by the status class
//! 5. **Inject** the id into the response `X-Request-ID` header

use axum::{
    extract::Request,
    http::{HeaderValue, StatusCode},
    response::Response,
};
use std::task::{Context, Poll};
use std::time::Instant;
use tower::{Layer, Service};
use tracing::Instrument;
use uuid::Uuid;

use crate::extractors::RequestId;

/// Header name for the request id.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Create a layer that adds request id tracking and access logging.
///
/// # Example
///
/// ```
/// use audio_guide_web::middleware::request_id_layer;
/// use axum::{routing::get, Router};
///
/// let app: Router = Router::new()
///     .route("/health", get(|| async { "ok" }))
///     .layer(request_id_layer());
/// ```
#[must_use]
pub const fn request_id_layer() -> RequestIdLayer {
    RequestIdLayer
}

/// Layer for request id tracking.
#[derive(Clone, Copy, Debug)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdMiddleware { inner }
    }
}

/// Middleware service for request id tracking.
#[derive(Clone, Debug)]
pub struct RequestIdMiddleware<S> {
    inner: S,
}

impl<S> Service<Request> for RequestIdMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let request_id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        req.extensions_mut().insert(RequestId(request_id));

        let span = tracing::info_span!(
            "http_request",
            request_id = %request_id,
            method = %req.method(),
            path = %req.uri().path(),
        );

        let started = Instant::now();
        let fut = self.inner.call(req);

        Box::pin(
            async move {
                let mut response = fut.await?;
                log_response(response.status(), started);

                if let Ok(header_value) = HeaderValue::from_str(&request_id.to_string()) {
                    response.headers_mut().insert(REQUEST_ID_HEADER, header_value);
                }

                Ok(response)
            }
            .instrument(span),
        )
    }
}

fn log_response(status: StatusCode, started: Instant) {
    let latency_ms = started.elapsed().as_millis();
    let status_code = status.as_u16();

    if status.is_server_error() {
        tracing::error!(status = status_code, latency_ms, "Responded with error code");
    } else if status.is_client_error() {
        tracing::warn!(status = status_code, latency_ms, "Responded with failure code");
    } else {
        tracing::info!(status = status_code, latency_ms, "Responded with success code");
    }
}

/// Extension trait for reading the request id from request extensions.
pub trait RequestIdExt {
    /// The request id, if the middleware is installed.
    fn request_id(&self) -> Option<Uuid>;
}

impl RequestIdExt for Request {
    fn request_id(&self) -> Option<Uuid> {
        self.extensions().get::<RequestId>().map(|id| id.0)
    }
}

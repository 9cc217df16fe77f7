//! Request tracing callbacks for the intake's `TraceLayer`

use axum::body::Body;
use http::{Method, Request, Response};
use std::time::Duration;
use tower_http::classify::ServerErrorsFailureClass;
use tracing::{info_span, Span};

/// Names the file operation a request maps to, for span context.
pub fn operation_for(method: &Method, path: &str) -> &'static str {
    match (method, path) {
        (_, "/health") => "health",
        (&Method::GET, "/api/files/search") => "search",
        (&Method::POST, "/api/files") => "upload",
        (&Method::GET, p) if p.starts_with("/api/files/") => "read",
        (&Method::DELETE, p) if p.starts_with("/api/files/") => "delete",
        _ => "unknown",
    }
}

pub fn make_request_span(request: &Request<Body>) -> Span {
    let path = request.uri().path();
    info_span!(
        "file_request",
        operation = operation_for(request.method(), path),
        method = %request.method(),
        path = %path,
        query = ?request.uri().query(),
        content_length = ?request
            .headers()
            .get(http::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok()),
    )
}

pub fn log_request(request: &Request<Body>, _span: &Span) {
    tracing::debug!("started {} {}", request.method(), request.uri().path());
}

pub fn log_response(response: &Response<Body>, latency: Duration, _span: &Span) {
    let status = response.status();
    let latency_ms = latency.as_millis();

    if status.is_success() {
        tracing::info!(status = status.as_u16(), latency_ms, "file request completed");
    } else if status.is_client_error() {
        tracing::warn!(status = status.as_u16(), latency_ms, "file request rejected");
    } else {
        tracing::error!(status = status.as_u16(), latency_ms, "file request failed");
    }
}

pub fn log_failure(error: ServerErrorsFailureClass, latency: Duration, _span: &Span) {
    tracing::error!(latency_ms = latency.as_millis(), error = %error, "file request errored");
}

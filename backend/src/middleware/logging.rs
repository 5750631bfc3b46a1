use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header::CONTENT_LENGTH, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use super::request_id::RequestId;

const MAX_BUFFERED_BODY_BYTES: usize = 64 * 1024;

/// Logs every 4xx/5xx response together with the `code` and `error` fields
/// of its JSON error envelope. The body is buffered and forwarded unchanged.
pub async fn log_error_responses(req: Request<Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let uri = req.uri().path().to_string();
    let request_id = req
        .extensions()
        .get::<RequestId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();
    let start = Instant::now();

    let response = next.run(req).await;
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let latency_ms = start.elapsed().as_millis() as u64;
    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_BUFFERED_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(
                status = status.as_u16(),
                %method,
                %uri,
                %request_id,
                latency_ms,
                error = ?err,
                "Failed to read error response body"
            );
            parts.headers.remove(CONTENT_LENGTH);
            return Response::from_parts(parts, Body::empty());
        }
    };

    let (code, message) = envelope_fields(&bytes);
    if status.is_server_error() {
        tracing::error!(
            status = status.as_u16(),
            %method,
            %uri,
            %request_id,
            latency_ms,
            code = %code,
            message = %message,
            "Request completed with error status"
        );
    } else {
        tracing::warn!(
            status = status.as_u16(),
            %method,
            %uri,
            %request_id,
            latency_ms,
            code = %code,
            message = %message,
            "Request completed with error status"
        );
    }

    Response::from_parts(parts, Body::from(bytes))
}

fn envelope_fields(bytes: &Bytes) -> (String, String) {
    let parsed: Option<serde_json::Value> = serde_json::from_slice(bytes).ok();
    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|value| value.get(name))
            .and_then(|value| value.as_str())
            .unwrap_or_default()
            .to_string()
    };
    (field("code"), field("error"))
}

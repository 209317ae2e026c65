use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

/// Logs one line per request, tagged with a fresh request id that is also
/// attached to every event emitted while the request is handled.
pub async fn request_logger(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let span = tracing::info_span!("request", %request_id, %method, %path);
    let response = next.run(request).instrument(span).await;

    let status = response.status();
    let duration_ms = start.elapsed().as_millis() as u64;

    if status.is_server_error() {
        warn!(%request_id, %method, %path, status = status.as_u16(), duration_ms, "request failed");
    } else {
        info!(%request_id, %method, %path, status = status.as_u16(), duration_ms, "request completed");
    }

    response
}

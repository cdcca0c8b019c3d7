// Request logging middleware
use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::Instrument;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Log method, URI, status and latency; tag the request span and response with an id
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());

    let method = request.method().clone();
    let uri = request.uri().clone();
    let span = tracing::info_span!("request", id = %request_id);

    async move {
        tracing::info!("Request: {} {}", method, uri);
        let start = Instant::now();

        let mut response = next.run(request).await;

        let status = response.status();
        let elapsed = start.elapsed().as_millis();
        if status.is_server_error() {
            tracing::error!("Response: {} {} -> {} ({} ms)", method, uri, status, elapsed);
        } else {
            tracing::info!("Response: {} {} -> {} ({} ms)", method, uri, status, elapsed);
        }

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response
                .headers_mut()
                .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
        }
        response
    }
    .instrument(span)
    .await
}

use axum::{
    extract::Request,
    http::{header, HeaderValue, StatusCode, Uri},
    middleware::Next,
    response::Response,
};
use rand::Rng;
use std::time::Instant;

pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Per-request id, available to handlers as `Extension<TraceId>`.
#[derive(Clone, Debug)]
pub struct TraceId(pub String);

impl std::ops::Deref for TraceId {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl TraceId {
    /// 16 lowercase hex chars.
    fn random() -> Self {
        Self(format!("{:016x}", rand::thread_rng().gen::<u64>()))
    }
}

/// Path plus query string, as logged.
fn request_target(uri: &Uri) -> &str {
    uri.path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path())
}

fn declared_length(req: &Request) -> Option<u64> {
    req.headers()
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

fn log_response(trace_id: &str, status: StatusCode, latency_ms: u64) {
    let status = status.as_u16();
    match status {
        500.. => tracing::error!(trace_id, status, latency_ms, "<-- response"),
        400..=499 => tracing::warn!(trace_id, status, latency_ms, "<-- response"),
        _ => tracing::info!(trace_id, status, latency_ms, "<-- response"),
    }
}

/// Tags each request with a [`TraceId`], logs it on the way in and out, and
/// echoes the id in the `X-Trace-Id` response header.
///
/// Bodies are left untouched; size limits are enforced by the extractors.
pub async fn request_logging(mut req: Request, next: Next) -> Response {
    let trace_id = TraceId::random();
    tracing::info!(
        trace_id = %trace_id.0,
        method = %req.method(),
        path = request_target(req.uri()),
        content_length = declared_length(&req),
        "--> request"
    );
    req.extensions_mut().insert(trace_id.clone());

    let start = Instant::now();
    let mut response = next.run(req).await;
    log_response(&trace_id, response.status(), start.elapsed().as_millis() as u64);

    if let Ok(value) = HeaderValue::from_str(&trace_id) {
        response.headers_mut().insert(TRACE_ID_HEADER, value);
    }
    response
}

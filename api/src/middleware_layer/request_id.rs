use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::{Instrument, info_span};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Reuses a non-blank incoming id, otherwise mints `req-<unix nanos>`.
fn resolve_request_id(req: &Request<Body>) -> String {
    if let Some(v) = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
    {
        if !v.trim().is_empty() {
            return v.trim().to_string();
        }
    }
    let nanos = Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_else(|| Utc::now().timestamp_micros() * 1000);
    format!("req-{nanos}")
}

/// Runs the request inside a span carrying the id and echoes the id on the
/// response.
pub async fn request_id(req: Request<Body>, next: Next) -> Response {
    let id = resolve_request_id(&req);
    let span = info_span!(
        "request",
        request_id = %id,
        method = %req.method(),
        path = %req.uri().path()
    );

    let mut res = next.run(req).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incoming_id_is_kept() {
        let req = Request::builder()
            .header(REQUEST_ID_HEADER, "abc")
            .body(Body::empty())
            .unwrap();
        assert_eq!(resolve_request_id(&req), "abc");
    }

    #[test]
    fn blank_id_is_replaced() {
        let req = Request::builder()
            .header(REQUEST_ID_HEADER, "  ")
            .body(Body::empty())
            .unwrap();
        assert!(resolve_request_id(&req).starts_with("req-"));
    }
}

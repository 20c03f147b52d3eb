use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::{info_span, Instrument};
use uuid::Uuid;

/// HTTP header name for trace ID
pub const TRACE_ID_HEADER: &str = "X-Trace-Id";

/// Middleware that generates a unique trace ID for each request and
/// propagates it through the request lifecycle: a tracing span, the
/// request extensions, and the response headers. Error responses echo the
/// same ID in their body.
pub async fn trace_id_middleware(request: Request, next: Next) -> Response {
    let trace_id = Uuid::new_v4().to_string();

    let method = request.method().clone();
    let uri = request.uri().clone();

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %method,
        uri = %uri,
    );

    tracing::info!(parent: &span, "Request started");

    let mut request = request;
    request.extensions_mut().insert(TraceId(trace_id.clone()));

    let response = async move {
        let response = next.run(request).await;

        tracing::info!(status = %response.status(), "Request completed");

        response
    }
    .instrument(span)
    .await;

    let (mut parts, body) = response.into_parts();
    parts.headers.insert(
        TRACE_ID_HEADER,
        HeaderValue::from_str(&trace_id).unwrap_or_else(|_| HeaderValue::from_static("invalid")),
    );

    Response::from_parts(parts, body)
}

/// Extension type for storing trace ID in request extensions
#[derive(Clone, Debug)]
pub struct TraceId(pub String);

impl TraceId {
    /// Get the trace ID string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware,
        response::IntoResponse,
        routing::get,
        Router,
    };
    use tower::util::ServiceExt;

    async fn test_handler(request: Request<Body>) -> impl IntoResponse {
        let trace_id = request
            .extensions()
            .get::<TraceId>()
            .map(|t| t.as_str().to_string())
            .unwrap_or_else(|| "no-trace-id".to_string());

        (StatusCode::OK, trace_id)
    }

    #[tokio::test]
    async fn test_trace_id_in_header_and_handler() {
        let app = Router::new()
            .route("/test", get(test_handler))
            .layer(middleware::from_fn(trace_id_middleware));

        let request = Request::builder()
            .uri("/test")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        let header_trace_id = response
            .headers()
            .get(TRACE_ID_HEADER)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(Uuid::parse_str(&header_trace_id).is_ok());

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_trace_id = String::from_utf8(body_bytes.to_vec()).unwrap();

        // Handler and response header observe the same ID
        assert_eq!(header_trace_id, body_trace_id);
    }

    #[tokio::test]
    async fn test_trace_id_unique_per_request() {
        let app = Router::new()
            .route("/test", get(test_handler))
            .layer(middleware::from_fn(trace_id_middleware));

        let first = app
            .clone()
            .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let second = app
            .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let id1 = first.headers().get(TRACE_ID_HEADER).unwrap();
        let id2 = second.headers().get(TRACE_ID_HEADER).unwrap();
        assert_ne!(id1, id2);
    }
}

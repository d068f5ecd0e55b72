//! HTTP request/response tracing middleware.

use axum::body::Body;
use axum::http::{Request, header};
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, Span};

type MakeSpanFn = fn(&Request<Body>) -> Span;

/// Creates the outermost tracing layer of the pipeline.
///
/// Each request gets an `INFO` span carrying method, URI and host, so log
/// lines from site resolution and redirect dispatch can be tied to the
/// request that triggered them. Responses are logged with status and
/// latency in milliseconds.
///
/// ```text
/// INFO request{method=GET uri=/old-page host=www.example.com}: finished processing request latency=3 ms status=301
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, MakeSpanFn> {
    TraceLayer::new_for_http()
        .make_span_with(make_span as MakeSpanFn)
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}

fn make_span(request: &Request<Body>) -> Span {
    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        host = %host,
    )
}

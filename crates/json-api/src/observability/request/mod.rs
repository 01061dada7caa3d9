//! Per-request span, request id and completion logging.
//!
//! Every API call runs inside one `http.request` span. The actor-claims
//! middleware records `actor_id` and `tenant_id`; a rendered [`ApiError`]
//! records `error_code`, so the completion event says why a call failed.
//!
//! [`ApiError`]: crate::errors::ApiError

mod parent_context;
mod request_ids;
mod spans;

use std::time::Instant;

use salvo::{
    Request, handler,
    http::StatusCode,
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::{Instrument as _, Span, error, info, warn};
use tracing_opentelemetry::OpenTelemetrySpanExt as _;

use super::{metrics, settings};

/// Health and scrape endpoints, polled too often to be worth a span.
const UNTRACED_PATHS: [&str; 2] = ["/metrics", "/healthcheck"];

#[handler]
pub(crate) async fn request_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if UNTRACED_PATHS.contains(&req.uri().path()) {
        ctrl.call_next(req, depot, res).await;
        return;
    }

    let started = Instant::now();

    let request_id =
        request_ids::resolve_request_id(req.header::<String>(request_ids::REQUEST_ID_HEADER));

    request_ids::set_request_id_header(res, &request_id);

    let method = req.method().to_string();
    let route = spans::request_span_name(&method, req.uri().path());
    let _in_flight = metrics::InFlightRequestGuard::track();

    let span = tracing::info_span!(
        parent: None,
        "http.request",
        otel.name = %route.otel_span_name,
        otel.kind = "server",
        request_id = %request_id,
        method = %method,
        path = %req.uri().path(),
        remote_addr = %req.remote_addr(),
        actor_id = tracing::field::Empty,
        tenant_id = tracing::field::Empty,
        error_code = tracing::field::Empty,
        status = tracing::field::Empty,
        duration_ms = tracing::field::Empty
    );

    let settings = settings::current();

    if settings.propagate_parent
        && let Some(parent_context) = parent_context::extract_parent_context(req.headers())
        && let Err(source) = span.set_parent(parent_context)
    {
        warn!("failed to set parent context on request span: {source}");
    }

    ctrl.call_next(req, depot, res)
        .instrument(span.clone())
        .await;

    let duration = started.elapsed();
    let status = res.status_code.unwrap_or(StatusCode::OK);

    metrics::observe_request(
        &method,
        &route.otel_path,
        status.as_u16(),
        duration.as_secs_f64(),
    );

    span.record("status", status.as_u16());
    span.record("duration_ms", duration.as_millis());

    span.in_scope(|| {
        log_completion(
            status,
            duration.as_millis(),
            u128::from(settings.slow_request_threshold_ms),
        );
    });
}

/// Record the failure code on the enclosing request span.
pub(crate) fn record_error_code(code: &str) {
    Span::current().record("error_code", code);
}

fn log_completion(status: StatusCode, duration_ms: u128, threshold_ms: u128) {
    let status = status.as_u16();

    match status {
        500.. => error!(status, duration_ms, "request.failed"),
        400..500 => warn!(status, duration_ms, "request.rejected"),
        _ => info!(status, duration_ms, "request.completed"),
    }

    if duration_ms > threshold_ms {
        warn!(duration_ms, threshold_ms, "request.slow");
    }
}

//! Prometheus metrics and the `/metrics` exposition endpoint.
//!
//! HTTP traffic is labelled by normalized route; lifecycle calls are counted
//! by workflow and outcome code, so conflict and validation rates can be
//! alerted on directly.

use std::sync::OnceLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
    core::Collector,
};
use salvo::{
    Request, Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use tracing::error;

const LATENCY_BUCKETS: [f64; 13] = [
    0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

#[derive(Debug)]
struct ApiMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
    lifecycle_outcomes_total: IntCounterVec,
}

impl ApiMetrics {
    fn build() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        Ok(Self {
            requests_total: registered(
                &registry,
                IntCounterVec::new(
                    Opts::new(
                        "mailroom_http_requests_total",
                        "HTTP requests by method, route, status class and status code.",
                    ),
                    &["method", "route", "status_class", "status_code"],
                )?,
            )?,
            request_duration_seconds: registered(
                &registry,
                HistogramVec::new(
                    HistogramOpts::new(
                        "mailroom_http_request_duration_seconds",
                        "HTTP request latency by method and route.",
                    )
                    .buckets(LATENCY_BUCKETS.to_vec()),
                    &["method", "route"],
                )?,
            )?,
            requests_in_flight: registered(
                &registry,
                IntGauge::new(
                    "mailroom_http_requests_in_flight",
                    "HTTP requests currently being served.",
                )?,
            )?,
            lifecycle_outcomes_total: registered(
                &registry,
                IntCounterVec::new(
                    Opts::new(
                        "mailroom_lifecycle_outcomes_total",
                        "Lifecycle operations by workflow and outcome code.",
                    ),
                    &["workflow", "outcome"],
                )?,
            )?,
            registry,
        })
    }
}

static API_METRICS: OnceLock<Option<ApiMetrics>> = OnceLock::new();

fn metrics() -> Option<&'static ApiMetrics> {
    API_METRICS
        .get_or_init(|| {
            ApiMetrics::build()
                .inspect_err(|source| error!("metrics disabled, failed to build: {source}"))
                .ok()
        })
        .as_ref()
}

fn registered<M>(registry: &Registry, metric: M) -> Result<M, prometheus::Error>
where
    M: Collector + Clone + 'static,
{
    registry.register(Box::new(metric.clone()))?;

    Ok(metric)
}

/// Holds one slot in the in-flight gauge until dropped.
#[derive(Debug)]
pub(super) struct InFlightRequestGuard(Option<&'static IntGauge>);

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        let gauge = metrics().map(|metrics| &metrics.requests_in_flight);

        if let Some(gauge) = gauge {
            gauge.inc();
        }

        Self(gauge)
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if let Some(gauge) = self.0 {
            gauge.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(metrics) = metrics() else {
        return;
    };

    let status = status_code.to_string();
    let status_class = match status_code {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    };

    metrics
        .requests_total
        .with_label_values(&[method, route, status_class, status.as_str()])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

/// Count one lifecycle operation by workflow and outcome code.
pub(crate) fn observe_lifecycle_outcome(workflow: &str, outcome: &str) {
    if let Some(metrics) = metrics() {
        metrics
            .lifecycle_outcomes_total
            .with_label_values(&[workflow, outcome])
            .inc();
    }
}

#[handler]
pub(crate) async fn metrics_handler(_req: &mut Request, res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::SERVICE_UNAVAILABLE);
        return;
    };

    let encoder = TextEncoder::new();
    let mut encoded = Vec::new();

    if let Err(source) = encoder.encode(&metrics.registry.gather(), &mut encoded) {
        error!("failed to encode metrics: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    if let Ok(content_type) = HeaderValue::from_str(encoder.format_type()) {
        res.headers_mut().insert(CONTENT_TYPE, content_type);
    }

    res.render(String::from_utf8_lossy(&encoded).into_owned());
}

//! Logs, traces and metrics for the API process.
//!
//! [`Observability::init`] runs once at startup, before the router is built;
//! [`request_logging`] wraps every call after that.

use thiserror::Error;

mod init;
mod logging;
mod metrics;
mod otel;
mod request;
mod settings;

pub(crate) use init::Observability;
pub(crate) use metrics::{metrics_handler, observe_lifecycle_outcome};
pub(crate) use request::{record_error_code, request_logging};

/// Startup failures; the server exits rather than run unobserved.
#[derive(Debug, Error)]
pub(crate) enum ObservabilityError {
    /// Failed to build OTLP exporter.
    #[error("failed to build OTLP exporter: {0}")]
    OtlpExporter(#[from] opentelemetry_otlp::ExporterBuildError),

    /// Failed to initialise tracing subscriber.
    #[error("failed to initialise tracing subscriber: {0}")]
    TracingSubscriber(#[from] tracing_subscriber::util::TryInitError),
}

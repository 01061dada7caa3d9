//! OpenTelemetry trace export.

use std::time::Duration;

use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    trace::{RandomIdGenerator, Sampler, SdkTracerProvider},
};

use crate::config::observability::ObservabilityConfig;

use super::ObservabilityError;

pub(super) fn build_tracer_provider(
    config: &ObservabilityConfig,
) -> Result<SdkTracerProvider, ObservabilityError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(config.otel_exporter_otlp_endpoint.clone())
        .with_timeout(Duration::from_secs(config.otel_exporter_otlp_timeout_seconds))
        .build()?;

    Ok(SdkTracerProvider::builder()
        .with_sampler(sampler(config.otel_trace_sample_ratio))
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(service_resource(
            &config.otel_service_name,
            &config.otel_service_version,
            &config.otel_deployment_environment,
        ))
        .with_batch_exporter(exporter)
        .build())
}

fn service_resource(name: &str, version: &str, environment: &str) -> Resource {
    Resource::builder_empty()
        .with_service_name(name.to_string())
        .with_attributes([
            KeyValue::new("service.version", version.to_string()),
            KeyValue::new("deployment.environment.name", environment.to_string()),
        ])
        .build()
}

/// Follow the caller's sampling decision; sample new traces at `ratio`.
fn sampler(ratio: f64) -> Sampler {
    let root = if ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(ratio)
    };

    Sampler::ParentBased(Box::new(root))
}

#[cfg(test)]
mod tests {
    use opentelemetry::{Key, Value};

    use super::*;

    #[test]
    fn resource_identifies_the_deployment() {
        let resource = service_resource("mailroom-json", "1.2.3", "staging");

        assert_eq!(
            resource.get(&Key::new("service.name")),
            Some(Value::from("mailroom-json"))
        );
        assert_eq!(
            resource.get(&Key::new("deployment.environment.name")),
            Some(Value::from("staging"))
        );
    }

    #[test]
    fn ratio_bounds_pick_fixed_samplers() {
        let full = sampler(1.0);
        let none = sampler(0.0);
        let half = sampler(0.5);

        assert!(
            matches!(&full, Sampler::ParentBased(root) if matches!(**root, Sampler::AlwaysOn)),
            "{full:?}"
        );
        assert!(
            matches!(&none, Sampler::ParentBased(root) if matches!(**root, Sampler::AlwaysOff)),
            "{none:?}"
        );
        assert!(
            matches!(&half, Sampler::ParentBased(root) if matches!(**root, Sampler::TraceIdRatioBased(_))),
            "{half:?}"
        );
    }
}

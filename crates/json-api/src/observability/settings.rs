//! Request-logging settings fixed at startup.

use std::sync::OnceLock;

use crate::config::observability::ObservabilityConfig;

/// Settings the request middleware reads on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct RequestSettings {
    /// Completion slower than this logs `request.slow`.
    pub(super) slow_request_threshold_ms: u64,

    /// Continue the caller's trace from `traceparent`.
    pub(super) propagate_parent: bool,
}

impl RequestSettings {
    const DEFAULT: Self = Self {
        slow_request_threshold_ms: 1_000,
        propagate_parent: false,
    };

    fn from_config(config: &ObservabilityConfig) -> Self {
        Self {
            slow_request_threshold_ms: config.slow_request_threshold_ms,
            // Parents only matter when spans are exported.
            propagate_parent: config.otel_enabled && config.otel_parent_propagation_enabled,
        }
    }
}

static SETTINGS: OnceLock<RequestSettings> = OnceLock::new();

/// Fix the settings; later calls keep the first value.
pub(super) fn install(config: &ObservabilityConfig) -> RequestSettings {
    *SETTINGS.get_or_init(|| RequestSettings::from_config(config))
}

/// Installed settings, or defaults before startup.
pub(super) fn current() -> RequestSettings {
    SETTINGS.get().copied().unwrap_or(RequestSettings::DEFAULT)
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct Flags {
        #[command(flatten)]
        observability: ObservabilityConfig,
    }

    #[test]
    fn parent_propagation_requires_export() -> TestResult {
        let flags = Flags::try_parse_from([
            "mailroom-json",
            "--otel-parent-propagation-enabled",
            "--slow-request-threshold-ms",
            "250",
        ])?;

        assert_eq!(
            RequestSettings::from_config(&flags.observability),
            RequestSettings {
                slow_request_threshold_ms: 250,
                propagate_parent: false,
            }
        );

        Ok(())
    }
}

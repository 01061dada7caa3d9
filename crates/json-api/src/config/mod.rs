//! Server configuration module

use clap::Parser;

use crate::config::{
    db::DatabaseConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
};

pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod server;

/// Mailroom JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "mailroom-json", about = "Mailroom JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces/metrics) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // A missing .env file is fine.
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_apply_when_only_the_database_is_given() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "mailroom-json",
            "--database-url",
            "postgres://localhost/mailroom",
        ])?;

        assert_eq!(config.socket_addr(), "0.0.0.0:8698");
        assert_eq!(config.server.shutdown_grace().as_secs(), 30);
        assert_eq!(config.observability.slow_request_threshold_ms, 1_000);
        assert!(!config.observability.otel_enabled, "trace export is opt-in");
        assert_eq!(config.database.database_url, "postgres://localhost/mailroom");

        Ok(())
    }

    #[test]
    fn log_format_accepts_json() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "mailroom-json",
            "--database-url",
            "postgres://localhost/mailroom",
            "--log-format",
            "json",
        ])?;

        assert!(
            matches!(config.logging.log_format, observability::LogFormat::Json),
            "expected json log format"
        );

        Ok(())
    }
}

//! Server configuration module

use clap::Parser;

use crate::config::{
    auth::AuthConfig,
    db::DatabaseConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
};

pub(crate) mod auth;
pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod server;

pub(crate) use observability::LogFormat;

/// Shopfront JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "shopfront-json", about = "Shopfront JSON API Server", long_about = None)]
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

    /// API token settings.
    #[command(flatten)]
    pub auth: AuthConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
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
    fn parses_flags_with_defaults() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "shopfront-json",
            "--database-url",
            "postgres://localhost/shopfront",
            "--port",
            "9000",
        ])?;

        assert_eq!(config.socket_addr(), "0.0.0.0:9000");
        assert_eq!(config.server.api_prefix, "api");
        assert_eq!(
            config.auth.token_ttl(),
            Some(jiff::SignedDuration::from_hours(30 * 24))
        );

        Ok(())
    }

    #[test]
    fn token_ttl_is_read_in_hours() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "shopfront-json",
            "--database-url",
            "postgres://localhost/shopfront",
            "--api-token-ttl-hours",
            "48",
        ])?;

        assert_eq!(
            config.auth.token_ttl(),
            Some(jiff::SignedDuration::from_hours(48))
        );

        Ok(())
    }

    #[test]
    fn zero_token_ttl_disables_expiry() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "shopfront-json",
            "--database-url",
            "postgres://localhost/shopfront",
            "--api-token-ttl-hours",
            "0",
        ])?;

        assert_eq!(config.auth.token_ttl(), None);

        Ok(())
    }
}

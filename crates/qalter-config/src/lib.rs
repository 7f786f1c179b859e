//! Shared configuration for the `qalter` client.
//!
//! Configuration is layered by `ortho_config`: built-in defaults, then a
//! configuration file named with `--config-path`, then `QALTER_*`
//! environment variables, then command-line flags. The resolved [`Config`]
//! names the default batch server and controls connection timeouts and
//! logging.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

mod defaults;
mod logging;
mod server;

pub use defaults::{
    DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_LOG_FILTER, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    default_connect_timeout_ms, default_log_filter, default_log_filter_string,
    default_log_format, default_server,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use server::{ServerName, ServerNameError};

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "QALTER")]
pub struct Config {
    /// Server contacted when a job identifier carries no server part.
    #[ortho_config(default = defaults::default_server())]
    #[serde(default = "defaults::default_server")]
    pub default_server: ServerName,
    /// Connect and round-trip timeout, in milliseconds.
    #[ortho_config(default = defaults::DEFAULT_CONNECT_TIMEOUT_MS)]
    #[serde(default = "defaults::default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// `tracing` filter expression.
    #[ortho_config(default = defaults::default_log_filter_string())]
    #[serde(default = "defaults::default_log_filter_string")]
    pub log_filter: String,
    /// Log output format.
    #[ortho_config(default = defaults::default_log_format())]
    #[serde(default = "defaults::default_log_format")]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_server: default_server(),
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Server used for job identifiers without a server part.
    #[must_use]
    pub const fn default_server(&self) -> &ServerName {
        &self.default_server
    }

    /// Timeout applied to connects and to each request round-trip.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

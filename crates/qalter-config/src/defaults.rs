use crate::logging::LogFormat;
use crate::server::ServerName;

/// Port a batch server listens on when the server name does not carry one.
pub const DEFAULT_SERVER_PORT: u16 = 15001;

/// Host contacted when neither the job identifier nor the configuration
/// names a server.
pub const DEFAULT_SERVER_HOST: &str = "localhost";

/// Default log filter expression. Diagnostics meant for the operator are
/// written directly, so tracing stays quiet unless asked.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default connect and round-trip timeout in milliseconds.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

/// Default log filter expression used by the binary.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
pub fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Server used when a job identifier carries no server part.
pub fn default_server() -> ServerName {
    ServerName::new(DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT)
}

/// Default connect timeout in milliseconds.
pub fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Host;

use crate::defaults::DEFAULT_SERVER_PORT;

/// Network name of a batch server, `host[:port]`.
///
/// IPv6 literals are written bracketed (`[::1]:15001`) and stored without the
/// brackets so they can be handed straight to the socket resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServerName {
    host: String,
    port: u16,
}

impl ServerName {
    /// Builds a server name from its parts without validation.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Host component, unbracketed.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port component.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for ServerName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(formatter, "[{}]:{}", self.host, self.port)
        } else {
            write!(formatter, "{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for ServerName {
    type Err = ServerNameError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ServerNameError::Empty);
        }

        let (host_text, port) = split_port(trimmed)?;
        let host = Host::parse(host_text).map_err(|source| ServerNameError::InvalidHost {
            input: trimmed.to_owned(),
            source,
        })?;
        let host = match host {
            Host::Domain(domain) => domain,
            Host::Ipv4(address) => address.to_string(),
            Host::Ipv6(address) => address.to_string(),
        };
        Ok(Self { host, port })
    }
}

fn split_port(input: &str) -> Result<(&str, u16), ServerNameError> {
    if input.ends_with(']') {
        return Ok((input, DEFAULT_SERVER_PORT));
    }
    match input.rsplit_once(':') {
        Some((host, port_text))
            if (!host.is_empty() && !host.contains(':')) || host.ends_with(']') =>
        {
            let port = port_text
                .parse::<u16>()
                .map_err(|_| ServerNameError::InvalidPort(input.to_owned()))?;
            Ok((host, port))
        }
        Some(_) => Err(ServerNameError::InvalidPort(input.to_owned())),
        None => Ok((input, DEFAULT_SERVER_PORT)),
    }
}

impl TryFrom<String> for ServerName {
    type Error = ServerNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ServerName> for String {
    fn from(value: ServerName) -> Self {
        value.to_string()
    }
}

/// Errors encountered while parsing a [`ServerName`] from text.
#[derive(Debug, Error)]
pub enum ServerNameError {
    /// The server name was blank.
    #[error("server name must not be empty")]
    Empty,
    /// The host part is not a valid domain or IP literal.
    #[error("invalid server host in '{input}': {source}")]
    InvalidHost {
        /// The full text that failed to parse.
        input: String,
        /// Reason reported by the host parser.
        #[source]
        source: url::ParseError,
    },
    /// The port part is missing or out of range.
    #[error("invalid server port in '{0}'")]
    InvalidPort(String),
}

//! RPC seam between the dispatcher and batch servers.
//!
//! [`BatchClient`] and [`ServerConnection`] describe the calls `qalter`
//! makes; [`RpcClient`] implements them over the JSONL transport. Tests
//! substitute in-memory implementations.

use std::io;
use std::time::Duration;

use qalter_config::{Config, ServerName, ServerNameError};
use qalter_protocol::{AttributeError, FramingError, Reply, Request, codes};
use thiserror::Error;

use crate::attributes::AttributeList;
use crate::transport::{self, Connection};

#[derive(Debug, Error)]
pub(crate) enum ClientError {
    #[error("failed to resolve server address {server}: {source}")]
    Resolve {
        server: ServerName,
        #[source]
        source: io::Error,
    },
    #[error("failed to connect to server {server}: {source}")]
    Connect {
        server: ServerName,
        #[source]
        source: io::Error,
    },
    #[error("communication with server {server} failed: {source}")]
    Exchange {
        server: ServerName,
        #[source]
        source: FramingError,
    },
    #[error("{message}")]
    Rejected { code: i32, message: String },
    #[error("unexpected reply from server {server}")]
    UnexpectedReply { server: ServerName },
    #[error("server {server} reported an invalid location '{location}': {source}")]
    BadLocation {
        server: ServerName,
        location: String,
        #[source]
        source: ServerNameError,
    },
}

impl ClientError {
    /// Numeric code recorded in the run outcome.
    pub(crate) const fn code(&self) -> i32 {
        match self {
            Self::Rejected { code, .. } => failure_status(*code),
            Self::Resolve { .. } | Self::Connect { .. } => codes::NO_SERVER,
            Self::Exchange { .. } | Self::UnexpectedReply { .. } | Self::BadLocation { .. } => {
                codes::PROTOCOL
            }
        }
    }

    pub(crate) const fn is_unknown_job(&self) -> bool {
        matches!(
            self,
            Self::Rejected {
                code: codes::UNKNOWN_JOB_ID,
                ..
            }
        )
    }
}

/// Status recorded for a failure carrying server code `code`. A failure
/// never records `0`, so it cannot be mistaken for success.
pub(crate) const fn failure_status(code: i32) -> i32 {
    if code == 0 { 1 } else { code }
}

/// Opens connections and answers job-location queries.
pub(crate) trait BatchClient {
    type Connection: ServerConnection;

    fn connect(&self, server: &ServerName) -> Result<Self::Connection, ClientError>;

    /// Asks `server` which server currently owns `job_id`. `Ok(None)` means
    /// the server could not place the job.
    fn locate_job(&self, job_id: &str, server: &ServerName)
    -> Result<Option<ServerName>, ClientError>;
}

/// An open connection. Dropping it releases the connection.
pub(crate) trait ServerConnection {
    fn server(&self) -> &ServerName;

    fn alter_job(&mut self, job_id: &str, attributes: &AttributeList) -> Result<(), ClientError>;

    /// Attribute refusals reported by the last failed [`alter_job`] call.
    /// The slice borrows the connection and cannot outlive it.
    ///
    /// [`alter_job`]: ServerConnection::alter_job
    fn attributes_in_error(&self) -> &[AttributeError];

    /// Releases the connection ahead of its scope ending.
    fn disconnect(self)
    where
        Self: Sized,
    {
        drop(self);
    }
}

/// [`BatchClient`] speaking the JSONL protocol over TCP.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RpcClient {
    timeout: Duration,
}

impl RpcClient {
    pub(crate) const fn new(config: &Config) -> Self {
        Self {
            timeout: config.connect_timeout(),
        }
    }

    fn open(&self, server: &ServerName) -> Result<Connection, ClientError> {
        tracing::debug!(server = %server, "connecting");
        transport::connect(server, self.timeout)
    }
}

impl BatchClient for RpcClient {
    type Connection = RpcConnection;

    fn connect(&self, server: &ServerName) -> Result<Self::Connection, ClientError> {
        let connection = self.open(server)?;
        Ok(RpcConnection {
            server: server.clone(),
            connection,
            attribute_errors: Vec::new(),
        })
    }

    fn locate_job(
        &self,
        job_id: &str,
        server: &ServerName,
    ) -> Result<Option<ServerName>, ClientError> {
        let mut connection = self.open(server)?;
        let request = Request::LocateJob {
            job_id: job_id.to_owned(),
        };
        let reply = connection
            .exchange(&request)
            .map_err(|source| ClientError::Exchange {
                server: server.clone(),
                source,
            });
        connection.shutdown();

        match reply? {
            Reply::Located { server: location } => location
                .parse()
                .map(Some)
                .map_err(|source| ClientError::BadLocation {
                    server: server.clone(),
                    location,
                    source,
                }),
            Reply::Error { code, .. } if code == codes::UNKNOWN_JOB_ID => Ok(None),
            Reply::Error { code, message, .. } => Err(ClientError::Rejected { code, message }),
            Reply::Ok => Err(ClientError::UnexpectedReply {
                server: server.clone(),
            }),
        }
    }
}

pub(crate) struct RpcConnection {
    server: ServerName,
    connection: Connection,
    attribute_errors: Vec<AttributeError>,
}

impl ServerConnection for RpcConnection {
    fn server(&self) -> &ServerName {
        &self.server
    }

    fn alter_job(&mut self, job_id: &str, attributes: &AttributeList) -> Result<(), ClientError> {
        self.attribute_errors.clear();
        let request = Request::AlterJob {
            job_id: job_id.to_owned(),
            attributes: attributes.as_slice().to_vec(),
        };
        let reply = self
            .connection
            .exchange(&request)
            .map_err(|source| ClientError::Exchange {
                server: self.server.clone(),
                source,
            })?;

        match reply {
            Reply::Ok => Ok(()),
            Reply::Error {
                code,
                message,
                attribute_errors,
            } => {
                self.attribute_errors = attribute_errors;
                Err(ClientError::Rejected { code, message })
            }
            Reply::Located { .. } => Err(ClientError::UnexpectedReply {
                server: self.server.clone(),
            }),
        }
    }

    fn attributes_in_error(&self) -> &[AttributeError] {
        &self.attribute_errors
    }
}

impl Drop for RpcConnection {
    fn drop(&mut self) {
        self.connection.shutdown();
        tracing::debug!(server = %self.server, "disconnected");
    }
}

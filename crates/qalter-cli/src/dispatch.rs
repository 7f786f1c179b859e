//! Per-job submission loop.
//!
//! Each job identifier gets at most [`MAX_ATTEMPTS`] submissions: the first
//! against the server named by the identifier (or the configured default),
//! and one more against the server that a location query reports after an
//! "unknown job" refusal.

use std::io::Write;

use qalter_config::ServerName;

use crate::attributes::AttributeList;
use crate::classify::{OptionTable, USAGE_EXIT, classify};
use crate::client::{BatchClient, ClientError, ServerConnection};
use crate::job_id::parse_job_identifier;
use crate::security::{SecurityContext, SecurityLibrary};

/// Submissions per job: the original server plus one relocation.
pub(crate) const MAX_ATTEMPTS: usize = 2;

/// Result of processing every job identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Every identifier was processed; carries the last non-zero failure
    /// code, or `0`.
    Completed(i32),
    /// A refused attribute ended the run early.
    Aborted(i32),
}

impl Outcome {
    pub(crate) const fn status(self) -> i32 {
        match self {
            Self::Completed(status) | Self::Aborted(status) => status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobResult {
    Altered,
    Failed(i32),
    Abort(i32),
}

pub(crate) struct Dispatcher<'a, C, S, E>
where
    C: BatchClient,
    S: SecurityLibrary,
    E: Write,
{
    client: &'a C,
    table: &'a OptionTable,
    default_server: &'a ServerName,
    security: Option<SecurityContext<S>>,
    stderr: &'a mut E,
}

impl<'a, C, S, E> Dispatcher<'a, C, S, E>
where
    C: BatchClient,
    S: SecurityLibrary,
    E: Write,
{
    pub(crate) fn new(
        client: &'a C,
        table: &'a OptionTable,
        default_server: &'a ServerName,
        security: SecurityContext<S>,
        stderr: &'a mut E,
    ) -> Self {
        Self {
            client,
            table,
            default_server,
            security: Some(security),
            stderr,
        }
    }

    /// Submits `attributes` for each job in order. The security context is
    /// closed when this returns.
    pub(crate) fn run<I>(mut self, jobs: I, attributes: &AttributeList) -> Outcome
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut aggregate = 0;
        for argument in jobs {
            match self.alter_one(argument.as_ref(), attributes) {
                JobResult::Altered => {}
                JobResult::Failed(code) => aggregate = code,
                JobResult::Abort(code) => return Outcome::Aborted(code),
            }
        }
        Outcome::Completed(aggregate)
    }

    fn alter_one(&mut self, argument: &str, attributes: &AttributeList) -> JobResult {
        let identifier = match parse_job_identifier(argument, self.default_server) {
            Ok(identifier) => identifier,
            Err(error) => {
                tracing::debug!(argument, %error, "rejected job identifier");
                let _ = writeln!(
                    self.stderr,
                    "qalter: illegally formed job identifier: {argument}"
                );
                return JobResult::Failed(USAGE_EXIT);
            }
        };
        let job_id = identifier.job_id.as_str();
        let mut server = identifier
            .server
            .unwrap_or_else(|| self.default_server.clone());
        let mut attempts = 0;

        loop {
            attempts += 1;
            let mut connection = match self.client.connect(&server) {
                Ok(connection) => connection,
                Err(error) => {
                    tracing::debug!(server = %server, %error, "connect failed");
                    let code = error.code();
                    let _ = writeln!(
                        self.stderr,
                        "qalter: cannot connect to server {server} (errno={code})"
                    );
                    return JobResult::Failed(code);
                }
            };

            let error = match connection.alter_job(job_id, attributes) {
                Ok(()) => {
                    tracing::info!(job_id, server = %connection.server(), "job altered");
                    return JobResult::Altered;
                }
                Err(error) => error,
            };

            if !error.is_unknown_job() {
                let verdict = classify(connection.attributes_in_error(), self.table);
                if verdict.releases_early() {
                    connection.disconnect();
                    if let Some(security) = self.security.take() {
                        security.close();
                    }
                }
                if let Some(code) = verdict.report(job_id, &mut *self.stderr) {
                    return JobResult::Abort(code);
                }
                return self.report(job_id, &error);
            }

            if attempts >= MAX_ATTEMPTS {
                return self.report(job_id, &error);
            }

            match self.client.locate_job(job_id, &server) {
                Ok(Some(location)) => {
                    tracing::info!(job_id, from = %server, to = %location, "relocating job");
                    connection.disconnect();
                    server = location;
                }
                Ok(None) => return self.report(job_id, &error),
                Err(locate_error) => {
                    tracing::debug!(job_id, %locate_error, "location query failed");
                    return self.report(job_id, &error);
                }
            }
        }
    }

    fn report(&mut self, job_id: &str, error: &ClientError) -> JobResult {
        let _ = writeln!(self.stderr, "qalter: {error} {job_id}");
        JobResult::Failed(error.code())
    }
}

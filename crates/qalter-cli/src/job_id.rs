//! Job identifier parsing: `<seq>[.<parent-server>][@<server>]`.
//!
//! `seq` is a decimal sequence number, optionally followed by an array
//! subscript (`12[]`, `12[3]`). The identifier sent to the server is always
//! qualified with a parent server name; the server contacted is the `@`
//! server, else the parent, else the configured default.

use qalter_config::{ServerName, ServerNameError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct JobIdentifier {
    /// Qualified identifier, `seq.parent`.
    pub(crate) job_id: String,
    /// Server to contact, when the identifier names one.
    pub(crate) server: Option<ServerName>,
}

#[derive(Debug, Error)]
pub(crate) enum JobIdError {
    #[error("job sequence number must be numeric")]
    Sequence,
    #[error("malformed array subscript")]
    Subscript,
    #[error("empty server name")]
    EmptyServer,
    #[error(transparent)]
    Server(#[from] ServerNameError),
}

pub(crate) fn parse_job_identifier(
    text: &str,
    default_server: &ServerName,
) -> Result<JobIdentifier, JobIdError> {
    let (local, at_server) = match text.split_once('@') {
        Some((local, server)) => (local, Some(parse_server(server)?)),
        None => (text, None),
    };

    let (sequence, parent) = match local.split_once('.') {
        Some((sequence, parent)) => (sequence, Some(parent)),
        None => (local, None),
    };
    validate_sequence(sequence)?;

    let parent_server = parent.map(parse_server).transpose()?;
    let qualifier = match (parent, &at_server) {
        (Some(parent), _) => parent.to_owned(),
        (None, Some(server)) => server.host().to_owned(),
        (None, None) => default_server.host().to_owned(),
    };

    Ok(JobIdentifier {
        job_id: format!("{sequence}.{qualifier}"),
        server: at_server.or(parent_server),
    })
}

fn parse_server(text: &str) -> Result<ServerName, JobIdError> {
    if text.is_empty() {
        return Err(JobIdError::EmptyServer);
    }
    Ok(text.parse()?)
}

fn validate_sequence(sequence: &str) -> Result<(), JobIdError> {
    let digits = sequence
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return Err(JobIdError::Sequence);
    }

    let subscript = &sequence[digits..];
    if subscript.is_empty() {
        return Ok(());
    }
    let index = subscript
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or(JobIdError::Subscript)?;
    if index.bytes().all(|byte| byte.is_ascii_digit()) {
        Ok(())
    } else {
        Err(JobIdError::Subscript)
    }
}

//! JSONL framing: one JSON object per line.

use std::io::{self, BufRead, Write};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors raised while reading or writing framed messages.
#[derive(Debug, Error)]
pub enum FramingError {
    /// The message could not be encoded.
    #[error("failed to serialise message: {0}")]
    Serialise(#[source] serde_json::Error),
    /// Writing to the peer failed.
    #[error("failed to send message: {0}")]
    Send(#[source] io::Error),
    /// Reading from the peer failed.
    #[error("failed to read message: {0}")]
    Receive(#[source] io::Error),
    /// The peer closed the stream before sending a line.
    #[error("peer closed the connection without replying")]
    Closed,
    /// The line was not a valid message.
    #[error("failed to parse message: {0}")]
    Parse(#[source] serde_json::Error),
}

/// Writes `message` as one line and flushes.
///
/// # Errors
///
/// Returns [`FramingError::Serialise`] or [`FramingError::Send`].
pub fn write_message<W, T>(writer: &mut W, message: &T) -> Result<(), FramingError>
where
    W: Write,
    T: Serialize,
{
    serde_json::to_writer(&mut *writer, message).map_err(FramingError::Serialise)?;
    writer.write_all(b"\n").map_err(FramingError::Send)?;
    writer.flush().map_err(FramingError::Send)
}

/// Reads one line and decodes it, skipping blank lines.
///
/// # Errors
///
/// Returns [`FramingError::Closed`] at end of stream, otherwise
/// [`FramingError::Receive`] or [`FramingError::Parse`].
pub fn read_message<R, T>(reader: &mut R) -> Result<T, FramingError>
where
    R: BufRead,
    T: DeserializeOwned,
{
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).map_err(FramingError::Receive)? == 0 {
            return Err(FramingError::Closed);
        }
        if !line.trim().is_empty() {
            return serde_json::from_str(&line).map_err(FramingError::Parse);
        }
    }
}

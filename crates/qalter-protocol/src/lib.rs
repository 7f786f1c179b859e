//! Wire types exchanged between the `qalter` client and a batch server.
//!
//! Every exchange is a single request line answered by a single reply line,
//! both encoded as JSON objects tagged by `kind` (JSONL framing). The types
//! live in their own crate so that server implementations and test doubles
//! speak exactly the vocabulary the client emits.

pub mod attributes;
pub mod codes;
mod framing;
mod messages;

pub use framing::{FramingError, read_message, write_message};
pub use messages::{AttributeEdit, AttributeError, Reply, Request};

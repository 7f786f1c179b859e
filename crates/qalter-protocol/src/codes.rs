//! Numeric error codes carried in [`Reply::Error`](crate::Reply::Error).

/// The server does not know the job; it may have moved to another server.
pub const UNKNOWN_JOB_ID: i32 = 15001;
/// An attribute value was rejected.
pub const BAD_ATTRIBUTE_VALUE: i32 = 15014;
/// The request or reply did not follow the protocol.
pub const PROTOCOL: i32 = 15031;
/// No server could be reached.
pub const NO_SERVER: i32 = 15034;
/// The job exceeds a size limit enforced by the server.
pub const JOB_TOO_BIG: i32 = 15166;

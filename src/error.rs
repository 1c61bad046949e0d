//! Error taxonomy for a single connection.
//!
//! Only transport failures live here. A missing file or a malformed request
//! line is not an error: both turn into a formulated response.

use std::io;

/// Unrecoverable failure of one connection. Never retried; the connection is
/// torn down and nothing else is affected.
#[derive(thiserror::Error, Debug)]
pub enum ConnectionError {
    #[error("accept failed: {0}")]
    Accept(#[source] io::Error),
    #[error("read failed: {0}")]
    Read(#[source] io::Error),
    #[error("write failed: {0}")]
    Write(#[source] io::Error),
}

impl ConnectionError {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ConnectionError::Accept(_) => "accept",
            ConnectionError::Read(_) => "read",
            ConnectionError::Write(_) => "write",
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("stale connection token {0}")]
    StaleToken(String),
}

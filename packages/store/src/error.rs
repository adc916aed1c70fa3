//! Error types for the store command layer.
//!
//! Errors at this level are transport- and server-focused. No semantic
//! errors like "key already exists" or "codec failure" - those belong in
//! higher layers.

use thiserror::Error;

/// The exact error text the store server reports for an out-of-bounds
/// list index. Higher layers match this text to re-type the error.
pub const INDEX_OUT_OF_RANGE_TEXT: &str = "ERR index out of range";

/// Errors at the store command layer.
///
/// These are transport and server-level errors only. Semantic errors
/// (duplicate keys, serialization failures) belong in higher layers.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Generic I/O or transport failure.
    ///
    /// Use this for network errors, connection drops, IPC failures, etc.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// An error reported by the store server, passed through verbatim.
    #[error("server error: {message}")]
    Server { message: String },

    /// The key holds a value of a different collection kind than the
    /// command expects.
    #[error("operation against a key holding the wrong kind of value (expected {expected})")]
    WrongType { expected: &'static str },

    /// The operation is not supported by this store.
    #[error("operation not supported")]
    NotSupported,
}

impl StoreError {
    /// Whether this is the server's fixed out-of-range report for a list
    /// index command.
    pub fn is_index_out_of_range(&self) -> bool {
        matches!(self, StoreError::Server { message } if message == INDEX_OUT_OF_RANGE_TEXT)
    }

    /// The server's out-of-range error, as a store implementation would
    /// report it.
    pub fn index_out_of_range() -> Self {
        StoreError::Server {
            message: INDEX_OUT_OF_RANGE_TEXT.to_string(),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Transport(Box::new(e))
    }
}

//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User directory error: {0}")]
    Directory(String),

    #[error("Mail transport error: {0}")]
    Mail(String),

    /// One inbound message could not be read or parsed; the stream goes on.
    #[error("Event source error: {0}")]
    Source(String),

    /// The inbound stream itself failed; no further events will arrive.
    #[error("Event stream closed: {0}")]
    StreamClosed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A collaborator call exceeded its per-call budget.
    #[error("{operation} timed out after {after_ms} ms")]
    Timeout {
        operation: &'static str,
        after_ms: u64,
    },
}

//! Inbound port. The trigger side feeds content-change events to the handler.

use crate::domain::{ContentEvent, DomainError};

/// Stream of content-change events, consumed one at a time.
#[async_trait::async_trait]
pub trait EventSource: Send {
    /// Next event, or `Ok(None)` once the stream is exhausted.
    ///
    /// `Err(DomainError::Source)` describes one bad message; callers may keep
    /// reading. `Err(DomainError::StreamClosed)` is terminal.
    async fn next_event(&mut self) -> Result<Option<ContentEvent>, DomainError>;
}

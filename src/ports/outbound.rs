//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::DomainError;

/// Registry of users, queried by full display name.
#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    /// Exact-match lookup of `name` against the users' full names.
    ///
    /// Returns `Ok(None)` when no user matches or the matching user has no
    /// address. When several users share the name, the one with the lowest id
    /// wins. `Err` is reserved for faults talking to the store.
    async fn lookup_by_display_name(&self, name: &str) -> Result<Option<String>, DomainError>;
}

/// Outbound mail transport. Plain text, one recipient per call.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DomainError>;
}

//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod mentions;
pub mod notification;

pub use entities::{
    ContentEvent, DirectoryUser, DispatchOutcome, DispatchStats, EntityKind, OutcomeKind,
    ResolvedRecipient,
};
pub use errors::DomainError;
pub use mentions::extract_mentions;
pub use notification::{Notification, TAGGED_SUBJECT};

//! Domain entities. Pure data structures for the core business.
//!
//! No transport/IO types here — these are mapped from adapters.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical kind of the record that changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Post,
    Reply,
    Other,
}

impl EntityKind {
    /// Only posts and replies carry content that can tag users.
    pub fn is_taggable(self) -> bool {
        matches!(self, EntityKind::Post | EntityKind::Reply)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Post => write!(f, "post"),
            EntityKind::Reply => write!(f, "reply"),
            EntityKind::Other => write!(f, "other"),
        }
    }
}

/// A create/update of a content item, as seen by the handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEvent {
    pub kind: EntityKind,
    pub content: String,
}

impl ContentEvent {
    pub fn new(kind: EntityKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }
}

/// A registered user as stored by a directory backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
    pub id: i64,
    pub full_name: String,
    /// Users without an address cannot be notified.
    #[serde(default)]
    pub email: Option<String>,
}

/// A mention that resolved to a contactable address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRecipient {
    pub candidate: String,
    pub address: String,
}

/// Discriminant of [`DispatchOutcome`], handy for comparisons and counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Sent,
    NoMatchingUser,
    LookupError,
    DeliveryFailed,
}

/// Result of processing one mention occurrence. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent {
        candidate: String,
        address: String,
    },
    NoMatchingUser {
        candidate: String,
    },
    LookupError {
        candidate: String,
        error: String,
    },
    /// The address resolved but the mail transport refused the message.
    DeliveryFailed {
        candidate: String,
        address: String,
        error: String,
    },
}

impl DispatchOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            DispatchOutcome::Sent { .. } => OutcomeKind::Sent,
            DispatchOutcome::NoMatchingUser { .. } => OutcomeKind::NoMatchingUser,
            DispatchOutcome::LookupError { .. } => OutcomeKind::LookupError,
            DispatchOutcome::DeliveryFailed { .. } => OutcomeKind::DeliveryFailed,
        }
    }

    pub fn candidate(&self) -> &str {
        match self {
            DispatchOutcome::Sent { candidate, .. }
            | DispatchOutcome::NoMatchingUser { candidate }
            | DispatchOutcome::LookupError { candidate, .. }
            | DispatchOutcome::DeliveryFailed { candidate, .. } => candidate,
        }
    }

    /// The recipient, when the lookup succeeded (regardless of delivery).
    pub fn recipient(&self) -> Option<ResolvedRecipient> {
        match self {
            DispatchOutcome::Sent { candidate, address }
            | DispatchOutcome::DeliveryFailed {
                candidate, address, ..
            } => Some(ResolvedRecipient {
                candidate: candidate.clone(),
                address: address.clone(),
            }),
            _ => None,
        }
    }
}

/// Counters over one event's outcomes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStats {
    pub sent: usize,
    pub no_matching_user: usize,
    pub lookup_errors: usize,
    pub delivery_failures: usize,
}

impl DispatchStats {
    pub fn from_outcomes(outcomes: &[DispatchOutcome]) -> Self {
        outcomes.iter().fold(Self::default(), |mut acc, o| {
            match o.kind() {
                OutcomeKind::Sent => acc.sent += 1,
                OutcomeKind::NoMatchingUser => acc.no_matching_user += 1,
                OutcomeKind::LookupError => acc.lookup_errors += 1,
                OutcomeKind::DeliveryFailed => acc.delivery_failures += 1,
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.sent + self.no_matching_user + self.lookup_errors + self.delivery_failures
    }
}

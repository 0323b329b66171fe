//! Port traits. API boundaries for the hexagon.
//!
//! - Inbound: Delivers content-change events into the application
//! - Outbound: Called by application into infrastructure

pub mod inbound;
pub mod outbound;

pub use inbound::EventSource;
pub use outbound::{Mailer, UserDirectory};

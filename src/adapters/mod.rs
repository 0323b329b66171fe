//! Infrastructure adapters. Implement ports.
//!
//! User directories, mail transports, inbound event streams. Map errors to DomainError.

pub mod directory;
pub mod mail;
pub mod source;

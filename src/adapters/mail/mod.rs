//! Mail adapters. Implement Mailer.
//!
//! SMTP for real delivery, a logging mailer for development.

pub mod log_mailer;
pub mod smtp_mailer;

pub use log_mailer::LogMailer;
pub use smtp_mailer::{SmtpConfig, SmtpMailer};

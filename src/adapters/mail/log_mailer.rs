//! Mailer that only logs. Used when no SMTP server is configured.

use crate::domain::DomainError;
use crate::ports::Mailer;
use tracing::info;

#[derive(Debug, Default)]
pub struct LogMailer;

impl LogMailer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DomainError> {
        info!(to, subject, body_len = body.len(), "[LOG MAILER] email not sent");
        Ok(())
    }
}

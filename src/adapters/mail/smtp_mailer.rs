//! SMTP mailer using lettre's async tokio transport.
//!
//! Plain-text messages only. TLS relay for production servers, plain
//! connection for local catchers like Mailpit.

use crate::domain::DomainError;
use crate::ports::Mailer;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, info};

/// SMTP connection and sender settings.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// Sender address, bare or `Name <addr>`.
    pub from: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub use_tls: bool,
}

impl SmtpConfig {
    pub fn new(host: impl Into<String>, port: u16, from: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            from: from.into(),
            username: None,
            password: None,
            use_tls: false,
        }
    }

    pub fn with_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = use_tls;
        self
    }

    pub fn with_credentials(mut self, username: String, password: String) -> Self {
        self.username = Some(username);
        self.password = Some(password);
        self
    }
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    host: String,
}

impl SmtpMailer {
    /// Build the transport. Does not connect until the first send.
    pub fn new(config: SmtpConfig) -> Result<Self, DomainError> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e| DomainError::Config(format!("Invalid sender address: {}", e)))?;

        let credentials = match (&config.username, &config.password) {
            (Some(user), Some(pass)) => Some(Credentials::new(user.clone(), pass.clone())),
            _ => None,
        };

        let transport = if config.use_tls {
            let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .map_err(|e| DomainError::Config(format!("Failed to create SMTP relay: {}", e)))?
                .port(config.port);
            if let Some(creds) = credentials {
                builder = builder.credentials(creds);
            }
            builder.build()
        } else {
            let mut builder =
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
                    .port(config.port);
            if let Some(creds) = credentials {
                builder = builder.credentials(creds);
            }
            builder.build()
        };

        Ok(Self {
            transport,
            from,
            host: config.host,
        })
    }

    fn build_message(&self, to: &str, subject: &str, body: &str) -> Result<Message, DomainError> {
        let to: Mailbox = to
            .parse()
            .map_err(|e| DomainError::Mail(format!("Invalid recipient address '{}': {}", to, e)))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| DomainError::Mail(format!("Failed to build email message: {}", e)))
    }
}

#[async_trait::async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DomainError> {
        debug!(to, subject, host = %self.host, "sending email via SMTP");

        let message = self.build_message(to, subject, body)?;
        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| DomainError::Mail(format!("SMTP send failed: {}", e)))?;

        let message_id = response.message().next().map(|s| s.to_string());
        info!(to, message_id = ?message_id, "email accepted by SMTP server");
        Ok(())
    }
}

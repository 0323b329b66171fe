//! Test doubles for the outbound ports.

use crate::domain::DomainError;
use crate::ports::{Mailer, UserDirectory};
use std::collections::HashMap;
use std::io;
use std::pin::Pin;
use std::sync::Mutex;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncRead, ReadBuf};

/// What the scripted directory does for a given name.
#[derive(Debug, Clone)]
pub enum Lookup {
    Found(String),
    Fail(String),
    Hang,
}

/// Directory answering from a fixed script; unknown names are not found.
/// Records every name it was asked for.
#[derive(Default)]
pub struct ScriptedDirectory {
    script: HashMap<String, Lookup>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, lookup: Lookup) -> Self {
        self.script.insert(name.to_string(), lookup);
        self
    }

    pub fn user(self, name: &str, email: &str) -> Self {
        self.with(name, Lookup::Found(email.to_string()))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl UserDirectory for ScriptedDirectory {
    async fn lookup_by_display_name(&self, name: &str) -> Result<Option<String>, DomainError> {
        self.calls.lock().unwrap().push(name.to_string());
        match self.script.get(name) {
            None => Ok(None),
            Some(Lookup::Found(email)) => Ok(Some(email.clone())),
            Some(Lookup::Fail(msg)) => Err(DomainError::Directory(msg.clone())),
            Some(Lookup::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(None)
            }
        }
    }
}

/// A mail captured by [`RecordingMailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Mailer that records attempts; addresses in `reject` fail, sends to
/// addresses in `hang` never complete.
#[derive(Default)]
pub struct RecordingMailer {
    reject: Vec<String>,
    hang: Vec<String>,
    pub sent: Mutex<Vec<SentMail>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(to: &str) -> Self {
        Self {
            reject: vec![to.to_string()],
            ..Default::default()
        }
    }

    pub fn hanging(to: &str) -> Self {
        Self {
            hang: vec![to.to_string()],
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DomainError> {
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        if self.hang.iter().any(|h| h == to) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.reject.iter().any(|r| r == to) {
            return Err(DomainError::Mail(format!("mailbox unavailable: {}", to)));
        }
        Ok(())
    }
}

/// Reader whose every read fails with EIO.
pub struct BrokenReader;

impl AsyncRead for BrokenReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::from_raw_os_error(5)))
    }
}

impl AsyncBufRead for BrokenReader {
    fn poll_fill_buf(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<&[u8]>> {
        Poll::Ready(Err(io::Error::from_raw_os_error(5)))
    }

    fn consume(self: Pin<&mut Self>, _amt: usize) {}
}

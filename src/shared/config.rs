//! Application configuration. Entity names, directory backend, SMTP, dispatch policy.

use serde::Deserialize;
use std::time::Duration;

/// Logical name of post records in the source system.
pub const DEFAULT_POST_ENTITY: &str = "ats_post";
/// Logical name of reply records in the source system.
pub const DEFAULT_REPLY_ENTITY: &str = "ats_reply";
/// Attribute that carries the post/reply text.
pub const DEFAULT_CONTENT_FIELD: &str = "ats_content";

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    // ─────────────────────────────────────────────────────────────────────────
    // Inbound events
    // ─────────────────────────────────────────────────────────────────────────
    /// Logical entity name treated as a post. Read from MENTION_NOTIFY_POST_ENTITY.
    #[serde(default)]
    pub post_entity: Option<String>,

    /// Logical entity name treated as a reply. Read from MENTION_NOTIFY_REPLY_ENTITY.
    #[serde(default)]
    pub reply_entity: Option<String>,

    /// Attribute holding the content text. Read from MENTION_NOTIFY_CONTENT_FIELD.
    #[serde(default)]
    pub content_field: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // User directory (one backend; priority db > url > file)
    // ─────────────────────────────────────────────────────────────────────────
    /// JSON file with a list of users. Read from MENTION_NOTIFY_DIRECTORY_FILE.
    #[serde(default)]
    pub directory_file: Option<String>,

    /// Folder holding `directory.db` (SQLite). Read from MENTION_NOTIFY_DIRECTORY_DB.
    #[serde(default)]
    pub directory_db: Option<String>,

    /// Base URL of an HTTP user directory. Read from MENTION_NOTIFY_DIRECTORY_URL.
    #[serde(default)]
    pub directory_url: Option<String>,

    /// JSON user file upserted into the SQLite directory at startup.
    /// Read from MENTION_NOTIFY_DIRECTORY_SEED_FILE.
    #[serde(default)]
    pub directory_seed_file: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // SMTP
    // ─────────────────────────────────────────────────────────────────────────
    /// SMTP server host. When unset, mails are only logged. Read from SMTP_HOST too.
    #[serde(default)]
    pub smtp_host: Option<String>,

    #[serde(default)]
    pub smtp_port: Option<u16>,

    /// Sender address.
    #[serde(default)]
    pub smtp_from: Option<String>,

    #[serde(default)]
    pub smtp_username: Option<String>,

    #[serde(default)]
    pub smtp_password: Option<String>,

    #[serde(default)]
    pub smtp_tls: Option<bool>,

    // ─────────────────────────────────────────────────────────────────────────
    // Dispatch policy
    // ─────────────────────────────────────────────────────────────────────────
    /// Per-lookup budget in ms (default 5000).
    #[serde(default)]
    pub lookup_timeout_ms: Option<u64>,

    /// Per-send budget in ms (default 10000).
    #[serde(default)]
    pub send_timeout_ms: Option<u64>,

    /// Max mentions processed in parallel (default 1 = sequential).
    #[serde(default)]
    pub dispatch_concurrency: Option<usize>,
}

/// Which directory backend to build at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryBackend {
    Sqlite(String),
    Http(String),
    File(String),
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("MENTION_NOTIFY"));
        if let Ok(path) = std::env::var("MENTION_NOTIFY_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        let mut cfg: Self = c.build()?.try_deserialize()?;
        // SMTP_* is also accepted unprefixed so a shared .env can drive several services
        if cfg.smtp_host.is_none() {
            cfg.smtp_host = std::env::var("SMTP_HOST").ok();
        }
        if cfg.smtp_port.is_none() {
            if let Ok(s) = std::env::var("SMTP_PORT") {
                cfg.smtp_port = s.parse().ok();
            }
        }
        Ok(cfg)
    }

    pub fn post_entity_or_default(&self) -> String {
        self.post_entity
            .clone()
            .unwrap_or_else(|| DEFAULT_POST_ENTITY.to_string())
    }

    pub fn reply_entity_or_default(&self) -> String {
        self.reply_entity
            .clone()
            .unwrap_or_else(|| DEFAULT_REPLY_ENTITY.to_string())
    }

    pub fn content_field_or_default(&self) -> String {
        self.content_field
            .clone()
            .unwrap_or_else(|| DEFAULT_CONTENT_FIELD.to_string())
    }

    /// Picks the configured directory backend, or None if nothing is configured.
    pub fn directory_backend(&self) -> Option<DirectoryBackend> {
        if let Some(db) = &self.directory_db {
            return Some(DirectoryBackend::Sqlite(db.clone()));
        }
        if let Some(url) = &self.directory_url {
            return Some(DirectoryBackend::Http(url.clone()));
        }
        self.directory_file.clone().map(DirectoryBackend::File)
    }

    /// Seed file to load, only when the SQLite backend is the one in use.
    pub fn sqlite_seed_file(&self) -> Option<&str> {
        match self.directory_backend() {
            Some(DirectoryBackend::Sqlite(_)) => self
                .directory_seed_file
                .as_deref()
                .filter(|p| !p.trim().is_empty()),
            _ => None,
        }
    }

    /// Returns true if an SMTP host is configured.
    pub fn is_smtp_configured(&self) -> bool {
        self.smtp_host.as_deref().is_some_and(|h| !h.is_empty())
    }

    pub fn smtp_port_or_default(&self) -> u16 {
        self.smtp_port.unwrap_or(25)
    }

    pub fn smtp_from_or_default(&self) -> String {
        self.smtp_from
            .clone()
            .unwrap_or_else(|| "noreply@localhost".to_string())
    }

    pub fn smtp_tls_or_default(&self) -> bool {
        self.smtp_tls.unwrap_or(false)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms.unwrap_or(5_000))
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms.unwrap_or(10_000))
    }

    /// Never below 1.
    pub fn dispatch_concurrency_or_default(&self) -> usize {
        self.dispatch_concurrency.unwrap_or(1).max(1)
    }
}

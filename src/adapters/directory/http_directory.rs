//! HTTP user directory. Queries a REST identity service.
//!
//! `GET {base_url}/users?full_name=<name>` must answer with a JSON array of
//! `{id, full_name, email}` objects. The service may filter loosely; the exact
//! name match and tie-break are re-applied here.

use super::first_address;
use crate::domain::{DirectoryUser, DomainError};
use crate::ports::UserDirectory;
use reqwest::Client;
use tracing::debug;

pub struct HttpDirectory {
    client: Client,
    base_url: String,
}

impl HttpDirectory {
    /// `base_url` without the `/users` suffix, e.g. `https://id.example.com/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl UserDirectory for HttpDirectory {
    async fn lookup_by_display_name(&self, name: &str) -> Result<Option<String>, DomainError> {
        let url = self.users_url();
        debug!(url = %url, name, "querying HTTP directory");

        let res = self
            .client
            .get(&url)
            .query(&[("full_name", name)])
            .send()
            .await
            .map_err(|e| DomainError::Directory(format!("Request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_else(|_| "unknown".to_string());
            return Err(DomainError::Directory(format!(
                "Directory API error {}: {}",
                status, text
            )));
        }

        let users: Vec<DirectoryUser> = res
            .json()
            .await
            .map_err(|e| DomainError::Directory(format!("Invalid directory response: {}", e)))?;

        Ok(first_address(&users, name))
    }
}

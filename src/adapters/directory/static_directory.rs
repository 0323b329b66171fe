//! In-memory directory, optionally loaded from a JSON file.
//!
//! File format: `[{"id": 1, "full_name": "Jane Doe", "email": "jane@x.com"}, ...]`.

use super::{first_address, read_users};
use crate::domain::{DirectoryUser, DomainError};
use crate::ports::UserDirectory;
use std::path::Path;
use tracing::info;

pub struct StaticDirectory {
    users: Vec<DirectoryUser>,
}

impl StaticDirectory {
    pub fn new(users: Vec<DirectoryUser>) -> Self {
        Self { users }
    }

    /// Load the user list from a JSON file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let users = read_users(path).await?;
        info!(path = %path.display(), users = users.len(), "user directory loaded");
        Ok(Self::new(users))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait::async_trait]
impl UserDirectory for StaticDirectory {
    async fn lookup_by_display_name(&self, name: &str) -> Result<Option<String>, DomainError> {
        Ok(first_address(&self.users, name))
    }
}

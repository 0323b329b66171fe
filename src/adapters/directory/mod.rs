//! User directory adapters. Implement UserDirectory.
//!
//! All backends break ties on duplicate full names by lowest user id.

pub mod http_directory;
pub mod sqlite_directory;
pub mod static_directory;

pub use http_directory::HttpDirectory;
pub use sqlite_directory::SqliteDirectory;
pub use static_directory::StaticDirectory;

use crate::domain::{DirectoryUser, DomainError};
use std::path::Path;
use tokio::fs;

/// Read a JSON array of users, e.g.
/// `[{"id": 1, "full_name": "Jane Doe", "email": "jane@x.com"}, ...]`.
pub(crate) async fn read_users(path: &Path) -> Result<Vec<DirectoryUser>, DomainError> {
    let raw = fs::read_to_string(path)
        .await
        .map_err(|e| DomainError::Directory(format!("read {}: {}", path.display(), e)))?;
    serde_json::from_str(&raw)
        .map_err(|e| DomainError::Directory(format!("parse {}: {}", path.display(), e)))
}

/// Address of the lowest-id user whose full name equals `name` exactly.
/// A missing or blank address on that user counts as no address.
pub(crate) fn first_address<'a>(
    users: impl IntoIterator<Item = &'a DirectoryUser>,
    name: &str,
) -> Option<String> {
    users
        .into_iter()
        .filter(|u| u.full_name == name)
        .min_by_key(|u| u.id)
        .and_then(|u| u.email.clone())
        .filter(|e| !e.trim().is_empty())
}

//! SQLite-backed user directory via libsql.
//!
//! One `users` table in `<base_dir>/directory.db`. Lookups are exact matches on
//! `full_name`, lowest `id` first. Rows are written with [`SqliteDirectory::upsert_user`]
//! or in bulk from a JSON user file via [`SqliteDirectory::seed_from_file`].

use super::read_users;
use crate::domain::{DirectoryUser, DomainError};
use crate::ports::UserDirectory;
use libsql::{params, Database};
use std::path::Path;
use tracing::{debug, info};

const USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    full_name TEXT NOT NULL,
    email TEXT
)"#;
const USERS_NAME_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_users_full_name ON users (full_name, id)";

pub struct SqliteDirectory {
    db: Database,
}

impl SqliteDirectory {
    /// Open (or create) the directory database and ensure the schema exists.
    /// Call once at startup; the returned directory is safe to share via Arc.
    pub async fn connect(base_dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let base = base_dir.as_ref();
        std::fs::create_dir_all(base).map_err(|e| DomainError::Directory(e.to_string()))?;
        let db_path = base.join("directory.db");
        let path_str = db_path.to_string_lossy();
        let db = libsql::Builder::new_local(path_str.as_ref())
            .build()
            .await
            .map_err(|e| DomainError::Directory(e.to_string()))?;
        let conn = db
            .connect()
            .map_err(|e| DomainError::Directory(e.to_string()))?;

        conn.execute(USERS_TABLE, ())
            .await
            .map_err(|e| DomainError::Directory(e.to_string()))?;
        conn.execute(USERS_NAME_INDEX, ())
            .await
            .map_err(|e| DomainError::Directory(e.to_string()))?;

        info!(path = %db_path.display(), "SQLite user directory connected");

        Ok(Self { db })
    }

    /// Insert or replace a user record.
    pub async fn upsert_user(&self, user: &DirectoryUser) -> Result<(), DomainError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| DomainError::Directory(e.to_string()))?;
        conn.execute(
            r#"
            INSERT INTO users (id, full_name, email)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (id) DO UPDATE SET
                full_name = excluded.full_name,
                email = excluded.email
            "#,
            params![user.id, user.full_name.as_str(), user.email.clone()],
        )
        .await
        .map_err(|e| DomainError::Directory(e.to_string()))?;
        Ok(())
    }

    /// Upsert every user from a JSON user file (same format as the file
    /// directory). Returns how many records were written.
    pub async fn seed_from_file(&self, path: impl AsRef<Path>) -> Result<usize, DomainError> {
        let path = path.as_ref();
        let users = read_users(path).await?;
        for user in &users {
            self.upsert_user(user).await?;
        }
        info!(path = %path.display(), users = users.len(), "user directory seeded");
        Ok(users.len())
    }
}

#[async_trait::async_trait]
impl UserDirectory for SqliteDirectory {
    async fn lookup_by_display_name(&self, name: &str) -> Result<Option<String>, DomainError> {
        let conn = self
            .db
            .connect()
            .map_err(|e| DomainError::Directory(e.to_string()))?;
        let mut rows = conn
            .query(
                "SELECT email FROM users WHERE full_name = ?1 ORDER BY id ASC LIMIT 1",
                params![name],
            )
            .await
            .map_err(|e| DomainError::Directory(e.to_string()))?;

        let Some(row) = rows
            .next()
            .await
            .map_err(|e| DomainError::Directory(e.to_string()))?
        else {
            debug!(name, "no directory row");
            return Ok(None);
        };

        let email: Option<String> = row
            .get::<Option<String>>(0)
            .map_err(|e| DomainError::Directory(e.to_string()))?;
        Ok(email.filter(|e| !e.trim().is_empty()))
    }
}

use async_trait::async_trait;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::auth::repo_types::UserRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already exists")]
    DuplicateUsername,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence for user records. `username` is unique; rows are never updated.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new user, returning its id.
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        phone: Option<&str>,
    ) -> Result<i64, StoreError>;

    /// Exact-match lookup by username.
    async fn find_user_by_username(&self, username: &str)
        -> Result<Option<UserRecord>, StoreError>;
}

#[derive(Clone)]
pub struct SqliteCredentialStore {
    db: SqlitePool,
}

impl SqliteCredentialStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        phone: Option<&str>,
    ) -> Result<i64, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password, phone)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(phone)
        .execute(&self.db)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                StoreError::DuplicateUsername
            }
            other => StoreError::Database(other),
        })?;
        let id = result.last_insert_rowid();
        Ok(id)
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserRecord>, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, password, phone
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }
}

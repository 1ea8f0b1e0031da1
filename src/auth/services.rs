use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::auth::{
    password::{hash_password, verify_password, HashParams},
    repo::{CredentialStore, StoreError},
    validation::{Field, ValidationPolicy},
};

/// Outcome classes surfaced to the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Conflict,
    NotFound,
    InvalidCredential,
    InvalidInput,
    Infrastructure,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("username already exists")]
    UsernameTaken,
    #[error("user not found")]
    UserNotFound,
    #[error("invalid password")]
    InvalidPassword,
    #[error("invalid {0}")]
    InvalidInput(Field),
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::UsernameTaken => ErrorKind::Conflict,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::InvalidPassword => ErrorKind::InvalidCredential,
            AuthError::InvalidInput(_) => ErrorKind::InvalidInput,
            AuthError::StoreUnavailable(_) | AuthError::Hashing(_) => ErrorKind::Infrastructure,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated {
    pub user_id: i64,
    pub username: String,
}

/// Registration and login over an injected [`CredentialStore`].
#[derive(Clone)]
pub struct CredentialService {
    store: Arc<dyn CredentialStore>,
    hash: HashParams,
    policy: ValidationPolicy,
}

impl CredentialService {
    pub fn new(store: Arc<dyn CredentialStore>, hash: HashParams, policy: ValidationPolicy) -> Self {
        Self {
            store,
            hash,
            policy,
        }
    }

    /// Hash the password and create the user. Returns the new user id.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        phone: Option<&str>,
    ) -> Result<i64, AuthError> {
        self.policy
            .check(username, password)
            .map_err(AuthError::InvalidInput)?;

        let params = self.hash;
        let plain = password.to_owned();
        let hash = tokio::task::spawn_blocking(move || hash_password(&params, &plain))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        match self.store.create_user(username, &hash, phone).await {
            Ok(id) => {
                info!(user_id = id, %username, "user registered");
                Ok(id)
            }
            Err(StoreError::DuplicateUsername) => {
                warn!(%username, "username already registered");
                Err(AuthError::UsernameTaken)
            }
            Err(e) => Err(AuthError::StoreUnavailable(e)),
        }
    }

    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Authenticated, AuthError> {
        self.policy
            .check(username, password)
            .map_err(AuthError::InvalidInput)?;

        let user = match self.store.find_user_by_username(username).await {
            Ok(Some(u)) => u,
            Ok(None) => {
                warn!(%username, "login failed: user not found");
                return Err(AuthError::UserNotFound);
            }
            Err(e) => return Err(AuthError::StoreUnavailable(e)),
        };

        let plain = password.to_owned();
        let stored = user.password_hash.clone();
        let ok = tokio::task::spawn_blocking(move || verify_password(&plain, &stored))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        if !ok {
            warn!(%username, user_id = user.id, "login failed: invalid password");
            return Err(AuthError::InvalidPassword);
        }

        debug!(user_id = user.id, "login success");
        Ok(Authenticated {
            user_id: user.id,
            username: user.username,
        })
    }
}

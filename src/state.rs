use crate::auth::{
    repo::{CredentialStore, SqliteCredentialStore},
    services::CredentialService,
};
use crate::config::AppConfig;
use crate::db;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub service: CredentialService,
}

impl AppState {
    /// Open the store, make sure the schema exists and wire the service to it.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let db = db::connect(&config.database_url).await?;
        db::init_schema(&db).await?;
        Ok(Self::from_parts(db, Arc::new(config)))
    }

    pub fn from_parts(db: SqlitePool, config: Arc<AppConfig>) -> Self {
        let store = Arc::new(SqliteCredentialStore::new(db.clone())) as Arc<dyn CredentialStore>;
        let service = CredentialService::new(store, config.auth.hash, config.auth.validation);
        Self {
            db,
            config,
            service,
        }
    }

    /// Release the store handle. Pending queries finish first.
    pub async fn close(&self) {
        self.db.close().await;
    }
}

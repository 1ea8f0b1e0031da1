use std::{path::Path, str::FromStr, time::Duration};

use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};

pub fn sqlite_url(path: &Path) -> String {
    format!("sqlite://{}", path.display())
}

/// Open the store file, creating it if absent.
pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("parse database url {database_url}"))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let db = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .context("connect to database")?;
    Ok(db)
}

/// Create the `users` table if it does not exist yet. Safe to run on every start.
pub async fn init_schema(db: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT UNIQUE,
            password TEXT,
            phone TEXT
        )
        "#,
    )
    .execute(db)
    .await
    .context("create users table")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn count_users_tables(db: &SqlitePool) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'users'",
        )
        .fetch_one(db)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn init_schema_twice_on_same_file() {
        let dir = tempfile::tempdir().unwrap();
        let url = sqlite_url(&dir.path().join("db.sqlite"));

        let first = connect(&url).await.unwrap();
        init_schema(&first).await.unwrap();
        sqlx::query("INSERT INTO users (username, password, phone) VALUES ('alice', 'h', NULL)")
            .execute(&first)
            .await
            .unwrap();
        first.close().await;

        let second = connect(&url).await.unwrap();
        init_schema(&second).await.unwrap();
        init_schema(&second).await.unwrap();
        assert_eq!(count_users_tables(&second).await, 1);

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&second)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[tokio::test]
    async fn connect_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.sqlite");
        assert!(!path.exists());
        let db = connect(&sqlite_url(&path)).await.unwrap();
        init_schema(&db).await.unwrap();
        assert!(path.exists());
    }
}

mod app;
mod auth;
mod config;
mod db;
mod state;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "credgate=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    tracing::info!(
        database_url = %config.database_url,
        static_dir = %config.static_dir,
        locale = ?config.auth.locale,
        validation = ?config.auth.validation,
        "starting"
    );
    if !config.auth.uniform_login_errors {
        tracing::warn!("login responses distinguish unknown users from wrong passwords");
    }

    let (host, port) = (config.host.clone(), config.port);
    let app_state = AppState::init(config).await?;

    let result = app::serve(app::build_app(app_state.clone()), &host, port).await;
    app_state.close().await;
    tracing::info!("store closed");
    result
}

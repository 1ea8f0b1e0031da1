use std::{net::SocketAddr, path::Path, sync::Arc};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use crate::auth;
use crate::state::AppState;

/// Files under the static root that must never be served: dotfiles such as
/// `.env`, and the store file with its `-wal`/`-shm`/`-journal` companions.
#[derive(Debug, Clone)]
pub struct PrivateFiles {
    store_file: Option<String>,
}

impl PrivateFiles {
    pub fn for_database_url(database_url: &str) -> Self {
        let path = database_url
            .strip_prefix("sqlite://")
            .or_else(|| database_url.strip_prefix("sqlite:"))
            .unwrap_or(database_url);
        let path = path.split('?').next().unwrap_or(path);
        let store_file = Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .filter(|name| !name.is_empty() && name != ":memory:");
        Self { store_file }
    }

    pub fn is_private(&self, uri_path: &str) -> bool {
        let Ok(decoded) = urlencoding::decode(uri_path) else {
            return true;
        };
        decoded
            .split(['/', '\\'])
            .filter(|segment| !segment.is_empty())
            .any(|segment| {
                let segment = segment.to_lowercase();
                segment.starts_with('.')
                    || self
                        .store_file
                        .as_deref()
                        .is_some_and(|store| segment.starts_with(store))
            })
    }
}

async fn refuse_private_files(
    State(private): State<Arc<PrivateFiles>>,
    req: Request,
    next: Next,
) -> Response {
    if private.is_private(req.uri().path()) {
        tracing::warn!(path = %req.uri().path(), "refused private file");
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(req).await
}

pub fn build_app(state: AppState) -> Router {
    let private = Arc::new(PrivateFiles::for_database_url(&state.config.database_url));
    let static_files = Router::<()>::new()
        .fallback_service(ServeDir::new(&state.config.static_dir))
        .layer(middleware::from_fn_with_state(private, refuse_private_files));
    Router::new()
        .nest("/api", auth::router())
        .fallback_service(static_files)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, host: &str, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

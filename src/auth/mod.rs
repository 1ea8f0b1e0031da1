use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
pub mod messages;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;
pub mod validation;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::auth_routes())
}

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::{error, info, instrument};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest},
        services::{AuthError, ErrorKind},
    },
    config::AuthConfig,
    state::AppState,
};

type ApiError = (StatusCode, Json<MessageResponse>);

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .service
        .register(&payload.username, &payload.password, payload.phone.as_deref())
        .await
        .map_err(|e| error_response(&e, &state.config.auth))?;

    let messages = state.config.auth.locale.messages();
    Ok(Json(MessageResponse::new(messages.registered)))
}

#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .service
        .authenticate(&payload.username, &payload.password)
        .await
        .map_err(|e| error_response(&e, &state.config.auth))?;

    info!(user_id = user.user_id, username = %user.username, "user logged in");
    Ok(Json(LoginResponse { success: true }))
}

/// Map a service failure onto a status code and a localized message.
///
/// Unknown users answer 400 and wrong passwords 401 unless
/// `uniform_login_errors` is set, in which case both answer 401 with the
/// same text.
pub(crate) fn error_response(err: &AuthError, auth: &AuthConfig) -> ApiError {
    if err.kind() == ErrorKind::Infrastructure {
        error!(error = %err, "request failed");
    }
    let m = auth.locale.messages();
    let (status, text) = match err {
        AuthError::UsernameTaken => (StatusCode::BAD_REQUEST, m.username_taken),
        AuthError::UserNotFound | AuthError::InvalidPassword if auth.uniform_login_errors => {
            (StatusCode::UNAUTHORIZED, m.invalid_credentials)
        }
        AuthError::UserNotFound => (StatusCode::BAD_REQUEST, m.user_not_found),
        AuthError::InvalidPassword => (StatusCode::UNAUTHORIZED, m.wrong_password),
        AuthError::InvalidInput(_) => (StatusCode::BAD_REQUEST, m.invalid_input),
        AuthError::StoreUnavailable(_) => (StatusCode::INTERNAL_SERVER_ERROR, m.store_error),
        AuthError::Hashing(_) => (StatusCode::INTERNAL_SERVER_ERROR, m.internal_error),
    };
    (status, Json(MessageResponse::new(text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{
        messages::Locale, password::test_params, repo::StoreError, validation::Field,
        validation::ValidationPolicy,
    };

    fn auth_config(locale: Locale, uniform: bool) -> AuthConfig {
        AuthConfig {
            hash: test_params(),
            locale,
            validation: ValidationPolicy::Permissive,
            uniform_login_errors: uniform,
        }
    }

    #[test]
    fn maps_each_error_kind() {
        let cfg = auth_config(Locale::En, false);
        let cases = [
            (AuthError::UsernameTaken, StatusCode::BAD_REQUEST, "Username already exists."),
            (AuthError::UserNotFound, StatusCode::BAD_REQUEST, "User does not exist."),
            (AuthError::InvalidPassword, StatusCode::UNAUTHORIZED, "Incorrect password."),
            (
                AuthError::InvalidInput(Field::Password),
                StatusCode::BAD_REQUEST,
                "Username and password are required.",
            ),
            (
                AuthError::StoreUnavailable(StoreError::Database(sqlx::Error::PoolClosed)),
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error.",
            ),
        ];
        for (err, status, text) in cases {
            let (got_status, Json(body)) = error_response(&err, &cfg);
            assert_eq!(got_status, status, "{err}");
            assert_eq!(body.message, text);
        }
    }

    #[test]
    fn uniform_mode_hides_unknown_users() {
        let cfg = auth_config(Locale::En, true);
        let (s1, Json(b1)) = error_response(&AuthError::UserNotFound, &cfg);
        let (s2, Json(b2)) = error_response(&AuthError::InvalidPassword, &cfg);
        assert_eq!(s1, StatusCode::UNAUTHORIZED);
        assert_eq!(s1, s2);
        assert_eq!(b1.message, b2.message);
    }

    #[test]
    fn legacy_locale_texts() {
        let cfg = auth_config(Locale::Legacy, false);
        let (_, Json(body)) = error_response(&AuthError::UserNotFound, &cfg);
        assert_eq!(body.message, "用户不存在");
        let (_, Json(body)) = error_response(&AuthError::UsernameTaken, &cfg);
        assert_eq!(body.message, "Username already exists.");
    }
}

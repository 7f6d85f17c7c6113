//! Authentication API Endpoints
//! Mission: Provide login, logout and identity endpoints

use crate::auth::{
    models::{Identity, LoginRequest, Session},
    service::{Authenticator, LoginError},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Login endpoint - POST /login
pub async fn login(
    State(authenticator): State<Arc<Authenticator>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Session>, AuthApiError> {
    let Json(payload) = payload.map_err(|e| {
        warn!("Rejected login body: {}", e);
        AuthApiError::InvalidRequest
    })?;

    info!("Login attempt: {}", payload.username);

    let username = payload.username.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        authenticator.login(&payload.username, &payload.password)
    })
    .await
    .map_err(|e| {
        error!("Login task aborted: {}", e);
        AuthApiError::InternalError
    })?;

    let session = outcome.map_err(|e| match e {
        LoginError::InvalidCredentials => {
            warn!("Failed login attempt: {}", username);
            AuthApiError::InvalidCredentials
        }
        LoginError::Internal(e) => {
            error!("Login for {} failed: {:#}", username, e);
            AuthApiError::InternalError
        }
    })?;

    info!("Login successful: {} ({})", session.username, session.role);

    Ok(Json(session))
}

/// Logout endpoint - POST /auth/logout
///
/// Tokens are stateless, so this only acknowledges; the token stays valid until it expires.
pub async fn logout(identity: Identity) -> Json<Value> {
    info!("Logout acknowledged for user {}", identity.user_id);
    Json(json!({ "message": "logged out" }))
}

/// Current identity - GET /auth/me
pub async fn current_user(identity: Identity) -> Json<Identity> {
    Json(identity)
}

/// Auth API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthApiError {
    InvalidRequest,
    InvalidCredentials,
    InternalError,
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthApiError::InvalidRequest => (StatusCode::BAD_REQUEST, "invalid request"),
            AuthApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "invalid username or password")
            }
            AuthApiError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

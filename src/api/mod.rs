//! HTTP surface: router assembly and patient handlers

pub mod patients;
pub mod routes;

use crate::auth::{Authenticator, TokenCodec};
use crate::patients::PatientStore;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::error;

pub use routes::build_router;

/// Everything the router needs, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub authenticator: Arc<Authenticator>,
    pub codec: Arc<TokenCodec>,
    pub patients: Arc<PatientStore>,
}

/// Handler errors. Internal details are logged, never returned to the client.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(&'static str),
    NotFound(&'static str),
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::Internal(e) => {
                error!("Request failed: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

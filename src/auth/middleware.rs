//! Authentication Middleware
//! Mission: Gate protected routes on a valid bearer token and an allowed role

use crate::auth::{jwt::TokenCodec, models::Identity};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

/// Token gate: verifies `Authorization: Bearer <jwt>` and attaches the caller's
/// [`Identity`] to the request before any handler runs.
pub async fn auth_middleware(
    State(codec): State<Arc<TokenCodec>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let bearer = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AuthError::MissingToken)?;

    let claims = codec.parse(bearer.token()).map_err(|e| {
        debug!(reason = %e, "Rejected bearer token");
        AuthError::InvalidToken
    })?;

    req.extensions_mut().insert(Identity::from(claims));

    Ok(next.run(req).await)
}

/// Allow-list of roles for one route, compared case-insensitively
#[derive(Debug, Clone)]
pub struct RoleGate {
    allowed: Arc<[String]>,
}

impl RoleGate {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed: roles
                .into_iter()
                .map(|role| role.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn permits(&self, role: &str) -> bool {
        let role = role.to_lowercase();
        self.allowed.iter().any(|allowed| *allowed == role)
    }
}

/// Role gate: must sit inside [`auth_middleware`].
pub async fn role_middleware(
    State(gate): State<RoleGate>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let identity = req
        .extensions()
        .get::<Identity>()
        .ok_or(AuthError::MissingIdentity)?;

    if !gate.permits(&identity.role) {
        debug!(user_id = identity.user_id, role = %identity.role, "Role not permitted");
        return Err(AuthError::Forbidden);
    }

    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(AuthError::MissingIdentity)
    }
}

/// Gate rejections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    MissingIdentity,
    Forbidden,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authorization token"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid or expired token"),
            AuthError::MissingIdentity => (StatusCode::UNAUTHORIZED, "Authentication required"),
            AuthError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden: access denied"),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

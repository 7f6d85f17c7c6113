//! Authentication Models
//! Mission: Define staff credential, token and session data structures

use serde::{Deserialize, Serialize};

/// Staff account as held by the credential store
#[derive(Debug, Clone)]
pub struct Credential {
    pub user_id: i64,
    pub username: String,
    pub password_hash: String, // bcrypt hash - never serialize
    pub role: String,
}

/// JWT Claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub role: String,
    pub exp: i64, // expiration, unix seconds
}

/// Verified caller of a request, placed in request extensions by the token gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: i64,
    pub role: String,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            role: claims.role,
        }
    }
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub expires_in: i64, // seconds until expiration
    pub user_id: i64,
    pub username: String,
    pub role: String,
}

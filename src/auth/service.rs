//! Login Service
//! Mission: Turn a username and password into a signed session

use crate::auth::{
    jwt::TokenCodec,
    models::Session,
    password::{hash_password, verify_password},
    user_store::CredentialStore,
};
use anyhow::Result;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoginError {
    /// Unknown user and wrong password are deliberately the same error
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("authentication failed: {0:#}")]
    Internal(#[from] anyhow::Error),
}

/// Credential lookup + password check + token issuance
pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
    codec: Arc<TokenCodec>,
    // Checked against when the username is unknown so both failures cost one bcrypt run.
    decoy_hash: String,
}

impl Authenticator {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        codec: Arc<TokenCodec>,
        hash_cost: u32,
    ) -> Result<Self> {
        Ok(Self {
            store,
            codec,
            decoy_hash: hash_password("medihub-decoy-password", hash_cost)?,
        })
    }

    /// Blocking: performs one store read and one bcrypt verification.
    pub fn login(&self, username: &str, password: &str) -> Result<Session, LoginError> {
        let Some(credential) = self.store.find_by_username(username)? else {
            verify_password(password, &self.decoy_hash);
            return Err(LoginError::InvalidCredentials);
        };

        if !verify_password(password, &credential.password_hash) {
            return Err(LoginError::InvalidCredentials);
        }

        let issued = self.codec.issue(credential.user_id, &credential.role)?;

        Ok(Session {
            token: issued.token,
            expires_in: self.codec.ttl().num_seconds(),
            user_id: credential.user_id,
            username: credential.username,
            role: credential.role,
        })
    }
}

//! Process configuration
//!
//! Read once at startup from flags, falling back to environment variables
//! (a `.env` file is loaded first by the binary).

use chrono::Duration;
use clap::Parser;
use thiserror::Error;

/// Longest accepted session lifetime (one year)
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set to a non-empty value")]
    MissingSecret,
    #[error("token lifetime must be between 1 and 8760 hours, got {0}h")]
    InvalidTokenTtl(i64),
    #[error("bcrypt cost must be between 4 and 31, got {0}")]
    InvalidBcryptCost(u32),
}

/// Medihub clinic records API
#[derive(Parser, Debug, Clone)]
#[command(name = "medihub")]
#[command(about = "Clinic records API with token authentication and role-based access")]
pub struct Config {
    /// Secret used to sign and verify session tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Session token lifetime in hours
    #[arg(long, env = "TOKEN_TTL_HOURS", default_value_t = 24)]
    pub token_ttl_hours: i64,

    /// SQLite database holding staff accounts and patient records
    #[arg(long, env = "DATABASE_PATH", default_value = "medihub.db")]
    pub database_path: String,

    /// Address the HTTP server binds to
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8000")]
    pub bind_addr: String,

    /// bcrypt work factor for newly hashed passwords
    #[arg(long, env = "BCRYPT_COST", default_value_t = bcrypt::DEFAULT_COST)]
    pub bcrypt_cost: u32,

    /// Create the default staff accounts if they are missing
    #[arg(long, env = "SEED_USERS")]
    pub seed: bool,
}

/// Validated authentication settings handed to the token codec and authenticator
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub token_ttl: Duration,
    pub hash_cost: u32,
}

impl Config {
    pub fn auth_config(&self) -> Result<AuthConfig, ConfigError> {
        let secret = self
            .jwt_secret
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingSecret)?;

        let token_ttl = Some(self.token_ttl_hours)
            .filter(|hours| (1..=MAX_TOKEN_TTL_HOURS).contains(hours))
            .and_then(Duration::try_hours)
            .ok_or(ConfigError::InvalidTokenTtl(self.token_ttl_hours))?;

        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidBcryptCost(self.bcrypt_cost));
        }

        Ok(AuthConfig {
            secret: secret.to_string(),
            token_ttl,
            hash_cost: self.bcrypt_cost,
        })
    }
}

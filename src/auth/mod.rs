//! Authentication Module
//! Mission: Staff login, signed session tokens and role-based route gates

pub mod api;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;
pub mod user_store;

pub use jwt::{TokenCodec, TokenError};
pub use middleware::{auth_middleware, role_middleware, AuthError, RoleGate};
pub use models::{Claims, Credential, Identity, Session};
pub use service::{Authenticator, LoginError};
pub use user_store::{CredentialStore, UserStore};

//! Medihub clinic records backend
//!
//! Exposes the service modules for the binary and integration tests.

pub mod api;
pub mod auth;
pub mod config;
pub mod middleware;
pub mod models;
pub mod patients;

//! Medihub - clinic records API
//! Staff log in for a signed session token; patient routes are gated by role.

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use medihub::{
    api::{build_router, AppState},
    auth::{Authenticator, CredentialStore, TokenCodec, UserStore},
    config::Config,
    patients::PatientStore,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    init_tracing();

    let config = Config::parse();
    let auth_config = config
        .auth_config()
        .context("Refusing to start with invalid configuration")?;

    info!("Medihub starting");

    let user_store = Arc::new(UserStore::new(&config.database_path, auth_config.hash_cost)?);
    if config.seed {
        user_store.seed_default_users()?;
    }

    let codec = Arc::new(TokenCodec::new(&auth_config.secret, auth_config.token_ttl));
    let credentials: Arc<dyn CredentialStore> = user_store;
    let authenticator = Arc::new(Authenticator::new(
        credentials,
        codec.clone(),
        auth_config.hash_cost,
    )?);
    let patients = Arc::new(PatientStore::new(&config.database_path)?);

    info!(
        "Authentication initialized at {} (tokens valid {}h)",
        config.database_path,
        auth_config.token_ttl.num_hours()
    );

    let app = build_router(AppState {
        authenticator,
        codec,
        patients,
    });

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("API server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medihub=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

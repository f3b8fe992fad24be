mod pages;
mod server;
mod sweeper;

use cookie_session::{
    AuthConfig, AuthCoordinator, CookieSync, CredentialRecord, CredentialVerifier,
    SessionManager, StoreConfig, build_credential_store, build_session_store,
};
use cookie_session_axum::cookie_session_router;

const DEFAULT_PORT: u16 = 3001;

/// Accounts available out of the box
fn seed_accounts() -> Vec<CredentialRecord> {
    vec![
        CredentialRecord::new("test1", "test1"),
        CredentialRecord::new("test2", "test2"),
    ]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    server::init_tracing("demo_login");

    let auth_config = AuthConfig::from_env();
    let store_config = StoreConfig::from_env()?;

    let sessions = build_session_store(&store_config.session_store).await?;
    let credentials =
        build_credential_store(&store_config.credential_store, seed_accounts()).await?;

    let manager = SessionManager::new(sessions, auth_config.clone());
    if let Some(period) = auth_config.sweep_interval {
        sweeper::spawn_session_sweeper(manager.clone(), period);
    }

    let coordinator =
        AuthCoordinator::new(CredentialVerifier::new(credentials), CookieSync::new(manager));

    let app = pages::router(coordinator.clone()).merge(cookie_session_router(coordinator));

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let server = server::spawn_http_server(port, app);

    tokio::select! {
        result = server => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("Shutting down"),
    }
    Ok(())
}

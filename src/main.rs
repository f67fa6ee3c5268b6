use std::sync::Arc;

use barista_api::app::{app, AppState};
use barista_api::auth::{KeySet, TokenVerifier};
use barista_api::config;
use barista_api::database::DrinkStore;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, AUTH_KEYS, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("starting barista-api in {:?} mode", config.environment);

    let store = DrinkStore::connect(&config.database)
        .await
        .unwrap_or_else(|e| panic!("failed to open drink store: {}", e));

    if config.database.reset_on_start {
        tracing::warn!("DATABASE_RESET is set, dropping and recreating the drinks table");
        store
            .reset_schema()
            .await
            .unwrap_or_else(|e| panic!("failed to reset schema: {}", e));
    } else {
        store
            .ensure_schema()
            .await
            .unwrap_or_else(|e| panic!("failed to ensure schema: {}", e));
    }

    let keys = KeySet::from_keys(&config.auth.keys)
        .unwrap_or_else(|e| panic!("failed to build token key set: {}", e));
    let verifier = TokenVerifier::new(
        keys,
        config.auth.audience.clone(),
        config.auth.issuer.clone(),
    );

    let app = app(AppState {
        store,
        verifier: Arc::new(verifier),
    });

    // Allow tests or deployments to override port via env
    let port = std::env::var("BARISTA_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("☕ Barista API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

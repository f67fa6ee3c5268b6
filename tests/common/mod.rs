#![allow(dead_code)]

use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

use barista_api::app::{app, AppState};
use barista_api::auth::{mint_token, Claims, JwtKey, KeySet, TokenVerifier};
use barista_api::config::DatabaseConfig;
use barista_api::database::DrinkStore;

pub const SECRET: &str = "integration-test-secret";
pub const KID: &str = "main";
pub const AUDIENCE: &str = "drinks";
pub const ISSUER: &str = "barista-api";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // The server runs on its own runtime in a plain thread, so it
        // outlives the per-test runtimes in this binary.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test server runtime");
            runtime.block_on(async move {
                // A >1 connection pool would hand each connection its own
                // empty in-memory database.
                let config = DatabaseConfig {
                    url: "sqlite::memory:".to_string(),
                    max_connections: 1,
                    connect_timeout_secs: 5,
                    reset_on_start: false,
                };
                let store = DrinkStore::connect(&config).await.expect("connect test store");
                store.ensure_schema().await.expect("create test schema");

                let keys = KeySet::from_keys(&[JwtKey {
                    kid: KID.to_string(),
                    secret: SECRET.to_string(),
                }])
                .expect("test key set");
                let verifier = TokenVerifier::new(keys, AUDIENCE, ISSUER);

                let state = AppState {
                    store,
                    verifier: Arc::new(verifier),
                };
                let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
                    .await
                    .expect("bind test listener");
                axum::serve(listener, app(state)).await.expect("test server");
            });
        });

        Ok(Self { port, base_url })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK
                    || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to start test server"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// A valid signed token carrying exactly `permissions`.
pub fn token(permissions: &[&str]) -> String {
    let perms = permissions.iter().map(|p| p.to_string()).collect();
    let claims = Claims::new("test-user", Some(perms), AUDIENCE, ISSUER, 1);
    mint_token(&claims, KID, SECRET.as_bytes()).expect("mint token")
}

/// Authorization header value for a valid token with `permissions`.
pub fn bearer(permissions: &[&str]) -> String {
    format!("Bearer {}", token(permissions))
}

/// A well-signed token whose permissions claim is absent entirely.
pub fn token_without_permissions() -> String {
    let claims = Claims::new("test-user", None, AUDIENCE, ISSUER, 1);
    mint_token(&claims, KID, SECRET.as_bytes()).expect("mint token")
}

/// A well-signed token that expired an hour ago.
pub fn expired_token(permissions: &[&str]) -> String {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_secs() as i64;
    let claims = Claims {
        sub: "test-user".to_string(),
        iss: ISSUER.to_string(),
        aud: AUDIENCE.to_string(),
        iat: now - 7200,
        exp: now - 3600,
        permissions: Some(permissions.iter().map(|p| p.to_string()).collect()),
    };
    mint_token(&claims, KID, SECRET.as_bytes()).expect("mint token")
}

/// A token signed with the shared secret but claiming an unknown key id.
pub fn token_with_kid(kid: &str) -> String {
    let claims = Claims::new("test-user", Some(vec![]), AUDIENCE, ISSUER, 1);
    mint_token(&claims, kid, SECRET.as_bytes()).expect("mint token")
}

/// A well-signed token whose header carries no key id at all.
pub fn token_without_kid() -> String {
    let claims = Claims::new("test-user", Some(vec![]), AUDIENCE, ISSUER, 1);
    let header = jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256);
    jsonwebtoken::encode(
        &header,
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("mint token")
}

/// A token with the right key id but the wrong signing secret.
pub fn token_signed_with(secret: &str) -> String {
    let claims = Claims::new("test-user", Some(vec![]), AUDIENCE, ISSUER, 1);
    mint_token(&claims, KID, secret.as_bytes()).expect("mint token")
}

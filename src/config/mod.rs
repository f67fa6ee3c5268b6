use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;

use crate::auth::keys::JwtKey;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
    pub reset_on_start: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub audience: String,
    pub issuer: String,
    pub token_ttl_hours: u64,
    pub keys: Vec<JwtKey>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECT_TIMEOUT_SECS") {
            self.database.connect_timeout_secs = v.parse().unwrap_or(self.database.connect_timeout_secs);
        }
        if let Ok(v) = env::var("DATABASE_RESET") {
            self.database.reset_on_start = v == "1" || v.eq_ignore_ascii_case("true");
        }

        // Auth overrides
        if let Ok(v) = env::var("AUTH_AUDIENCE") {
            self.auth.audience = v;
        }
        if let Ok(v) = env::var("AUTH_ISSUER") {
            self.auth.issuer = v;
        }
        if let Ok(v) = env::var("AUTH_TOKEN_TTL_HOURS") {
            self.auth.token_ttl_hours = v.parse().unwrap_or(self.auth.token_ttl_hours);
        }

        // Key set: AUTH_KEYS is a JSON object of {kid: secret}; a single
        // AUTH_JWT_SECRET (+ optional AUTH_JWT_KID) is accepted as a fallback.
        let mut keys_overridden = false;
        if let Ok(v) = env::var("AUTH_KEYS") {
            match parse_auth_keys(&v) {
                Ok(keys) => {
                    self.auth.keys = keys;
                    keys_overridden = true;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "AUTH_KEYS is not a JSON object of kid -> secret, keeping defaults");
                }
            }
        }
        if !keys_overridden {
            if let Ok(secret) = env::var("AUTH_JWT_SECRET") {
                let kid = env::var("AUTH_JWT_KID").unwrap_or_else(|_| "main".to_string());
                self.auth.keys = vec![JwtKey { kid, secret }];
            }
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: "sqlite://barista.db".to_string(),
                max_connections: 5,
                connect_timeout_secs: 30,
                reset_on_start: false,
            },
            auth: AuthConfig {
                audience: "drinks".to_string(),
                issuer: "barista-api".to_string(),
                token_ttl_hours: 24,
                keys: vec![JwtKey {
                    kid: "dev".to_string(),
                    secret: "barista-dev-secret".to_string(),
                }],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: "sqlite://barista.db".to_string(),
                max_connections: 20,
                connect_timeout_secs: 5,
                reset_on_start: false,
            },
            auth: AuthConfig {
                audience: "drinks".to_string(),
                issuer: "barista-api".to_string(),
                token_ttl_hours: 4,
                // Production refuses to start without keys from the environment
                keys: vec![],
            },
        }
    }
}

/// Parse an AUTH_KEYS value: a JSON object mapping key id to HS256 secret.
/// Entries come back sorted by key id.
fn parse_auth_keys(raw: &str) -> Result<Vec<JwtKey>, serde_json::Error> {
    let map: BTreeMap<String, String> = serde_json::from_str(raw)?;
    Ok(map
        .into_iter()
        .map(|(kid, secret)| JwtKey { kid, secret })
        .collect())
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::error::AuthError;

/// Decoded bearer token payload. `permissions` is optional on purpose: a
/// token without the claim is rejected differently from a token whose list
/// simply lacks the required entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

impl Claims {
    pub fn new(
        sub: impl Into<String>,
        permissions: Option<Vec<String>>,
        audience: impl Into<String>,
        issuer: impl Into<String>,
        ttl_hours: u64,
    ) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(ttl_hours as i64)).timestamp();

        Self {
            sub: sub.into(),
            iss: issuer.into(),
            aud: audience.into(),
            iat: now.timestamp(),
            exp,
            permissions,
        }
    }

    /// Check that this token grants `permission`. Pure membership test.
    pub fn require(&self, permission: &str) -> Result<(), AuthError> {
        let permissions = self
            .permissions
            .as_ref()
            .ok_or(AuthError::MissingPermissions)?;

        if permissions.iter().any(|granted| granted == permission) {
            Ok(())
        } else {
            Err(AuthError::Forbidden(permission.to_string()))
        }
    }
}

#[derive(Debug, Error)]
pub enum MintError {
    #[error("signing secret is empty")]
    EmptySecret,

    #[error("failed to encode token: {0}")]
    Encode(#[from] jsonwebtoken::errors::Error),
}

/// Sign `claims` as an HS256 token carrying `kid` in its header, so the
/// verifier can find the matching key again.
pub fn mint_token(claims: &Claims, kid: &str, secret: &[u8]) -> Result<String, MintError> {
    if secret.is_empty() {
        return Err(MintError::EmptySecret);
    }

    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(kid.to_string());

    Ok(encode(&header, claims, &EncodingKey::from_secret(secret))?)
}

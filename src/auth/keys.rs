use jsonwebtoken::DecodingKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// A named HS256 signing secret, as configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtKey {
    pub kid: String,
    pub secret: String,
}

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("no token keys configured; set AUTH_KEYS or AUTH_JWT_SECRET")]
    Empty,

    #[error("duplicate key id '{0}'")]
    DuplicateKid(String),

    #[error("key '{0}' has an empty secret")]
    EmptySecret(String),
}

/// Verification keys indexed by key id. The verifier picks the entry whose
/// kid matches the token header, which lets secrets rotate without
/// invalidating tokens signed by the previous key.
pub struct KeySet {
    keys: HashMap<String, DecodingKey>,
}

// Manual impl: `DecodingKey` has no `Debug`, and key material must not be printed.
impl std::fmt::Debug for KeySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeySet")
            .field("kids", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl KeySet {
    pub fn from_keys(keys: &[JwtKey]) -> Result<Self, KeyError> {
        if keys.is_empty() {
            return Err(KeyError::Empty);
        }

        let mut map = HashMap::with_capacity(keys.len());
        for key in keys {
            if key.secret.is_empty() {
                return Err(KeyError::EmptySecret(key.kid.clone()));
            }
            let decoding = DecodingKey::from_secret(key.secret.as_bytes());
            if map.insert(key.kid.clone(), decoding).is_some() {
                return Err(KeyError::DuplicateKid(key.kid.clone()));
            }
        }

        Ok(Self { keys: map })
    }

    pub fn get(&self, kid: &str) -> Option<&DecodingKey> {
        self.keys.get(kid)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

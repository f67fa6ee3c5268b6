pub mod claims;
pub mod error;
pub mod keys;
pub mod verifier;

pub use claims::{mint_token, Claims, MintError};
pub use error::AuthError;
pub use keys::{JwtKey, KeyError, KeySet};
pub use verifier::TokenVerifier;

use thiserror::Error;

/// Why a request failed authentication or authorization. Each variant maps
/// to a precise HTTP status and a stable reason code so clients can tell
/// an expired token from a forged one.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization header is missing")]
    MissingToken,

    #[error("authorization header must be a Bearer token")]
    MalformedHeader,

    #[error("unable to parse authentication token: {0}")]
    Malformed(String),

    #[error("token header does not carry a key id")]
    MissingKeyId,

    #[error("no configured key matches key id '{0}'")]
    UnknownKey(String),

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token audience does not match '{0}'")]
    InvalidAudience(String),

    #[error("token issuer does not match '{0}'")]
    InvalidIssuer(String),

    #[error("token claims are invalid: {0}")]
    InvalidClaims(String),

    #[error("token does not carry a permissions claim")]
    MissingPermissions,

    #[error("permission '{0}' not granted")]
    Forbidden(String),
}

impl AuthError {
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::MissingToken => 401,
            AuthError::MalformedHeader => 401,
            AuthError::Malformed(_) => 400,
            AuthError::MissingKeyId => 401,
            AuthError::UnknownKey(_) => 400,
            AuthError::InvalidSignature => 401,
            AuthError::Expired => 401,
            AuthError::InvalidAudience(_) => 401,
            AuthError::InvalidIssuer(_) => 401,
            AuthError::InvalidClaims(_) => 401,
            AuthError::MissingPermissions => 400,
            AuthError::Forbidden(_) => 403,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::MalformedHeader => "malformed_header",
            AuthError::Malformed(_) => "malformed_token",
            AuthError::MissingKeyId => "missing_key_id",
            AuthError::UnknownKey(_) => "unknown_key",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::Expired => "token_expired",
            AuthError::InvalidAudience(_) => "invalid_audience",
            AuthError::InvalidIssuer(_) => "invalid_issuer",
            AuthError::InvalidClaims(_) => "invalid_claims",
            AuthError::MissingPermissions => "missing_permissions",
            AuthError::Forbidden(_) => "forbidden",
        }
    }
}

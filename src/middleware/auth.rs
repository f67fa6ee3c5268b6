use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::{AuthError, Claims, TokenVerifier};
use crate::error::ApiError;

/// Authenticated caller context extracted from a verified token.
#[derive(Clone, Debug)]
pub struct AuthContext {
    pub subject: String,
    pub permissions: Vec<String>,
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            permissions: claims.permissions.unwrap_or_default(),
        }
    }
}

/// Permission guard composed in front of each protected route: verify the
/// bearer token, check the required permission, then hand the caller
/// context to the inner handler via request extensions.
pub async fn require_permission(
    verifier: Arc<TokenVerifier>,
    permission: &'static str,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())?;
    let claims = verifier.verify(token)?;
    claims.require(permission)?;

    request.extensions_mut().insert(AuthContext::from(claims));
    Ok(next.run(request).await)
}

/// Extract the bearer token from the Authorization header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;

    let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedHeader)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }

    Ok(token)
}

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};

use super::claims::Claims;
use super::error::AuthError;
use super::keys::KeySet;

/// Validates bearer tokens against the configured key set. Stateless apart
/// from the keys; safe to share behind an `Arc`.
pub struct TokenVerifier {
    keys: KeySet,
    audience: String,
    issuer: String,
}

impl TokenVerifier {
    pub fn new(keys: KeySet, audience: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            keys,
            audience: audience.into(),
            issuer: issuer.into(),
        }
    }

    /// Decode and validate a token: header parse, key lookup by kid, then
    /// signature + expiry + audience + issuer checks. Every failure mode
    /// maps to its own `AuthError` so the HTTP layer can answer precisely.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|e| AuthError::Malformed(e.to_string()))?;

        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;
        let key = self
            .keys
            .get(&kid)
            .ok_or_else(|| AuthError::UnknownKey(kid.clone()))?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[self.audience.as_str()]);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "aud", "iss"]);

        let data = decode::<Claims>(token, key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::InvalidAudience => AuthError::InvalidAudience(self.audience.clone()),
            ErrorKind::InvalidIssuer => AuthError::InvalidIssuer(self.issuer.clone()),
            ErrorKind::MissingRequiredClaim(claim) => {
                AuthError::InvalidClaims(format!("missing claim '{claim}'"))
            }
            ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
                AuthError::Malformed(e.to_string())
            }
            _ => AuthError::InvalidClaims(e.to_string()),
        })?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::mint_token;
    use crate::auth::keys::JwtKey;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "unit-test-secret";
    const AUDIENCE: &str = "drinks";
    const ISSUER: &str = "barista-api";

    fn verifier() -> TokenVerifier {
        let keys = KeySet::from_keys(&[
            JwtKey {
                kid: "main".to_string(),
                secret: SECRET.to_string(),
            },
            JwtKey {
                kid: "rotated".to_string(),
                secret: "previous-secret".to_string(),
            },
        ])
        .unwrap();
        TokenVerifier::new(keys, AUDIENCE, ISSUER)
    }

    fn claims(permissions: &[&str]) -> Claims {
        Claims::new(
            "user-1",
            Some(permissions.iter().map(|p| p.to_string()).collect()),
            AUDIENCE,
            ISSUER,
            1,
        )
    }

    #[test]
    fn roundtrip_preserves_claims() {
        let token = mint_token(&claims(&["post:drinks"]), "main", SECRET.as_bytes()).unwrap();
        let decoded = verifier().verify(&token).unwrap();
        assert_eq!(decoded.sub, "user-1");
        assert_eq!(decoded.aud, AUDIENCE);
        assert_eq!(decoded.permissions, Some(vec!["post:drinks".to_string()]));
    }

    #[test]
    fn each_configured_key_verifies_its_own_tokens() {
        let token = mint_token(&claims(&[]), "rotated", b"previous-secret").unwrap();
        assert!(verifier().verify(&token).is_ok());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let now = Utc::now().timestamp();
        let mut expired = claims(&["post:drinks"]);
        expired.iat = now - 8_000;
        expired.exp = now - 7_200;

        let token = mint_token(&expired, "main", SECRET.as_bytes()).unwrap();
        let err = verifier().verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::Expired));
    }

    #[test]
    fn tokens_signed_with_the_wrong_secret_are_rejected() {
        let token = mint_token(&claims(&[]), "main", b"some-other-secret").unwrap();
        let err = verifier().verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignature));
    }

    #[test]
    fn unknown_kids_are_rejected_before_signature_checks() {
        let token = mint_token(&claims(&[]), "ghost", SECRET.as_bytes()).unwrap();
        let err = verifier().verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::UnknownKey(kid) if kid == "ghost"));
    }

    #[test]
    fn tokens_without_a_kid_are_rejected() {
        let header = Header::new(Algorithm::HS256);
        let token = encode(
            &header,
            &claims(&[]),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let err = verifier().verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::MissingKeyId));
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let mut wrong = claims(&[]);
        wrong.aud = "espresso".to_string();

        let token = mint_token(&wrong, "main", SECRET.as_bytes()).unwrap();
        let err = verifier().verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidAudience(_)));
    }

    #[test]
    fn wrong_issuer_is_rejected() {
        let mut wrong = claims(&[]);
        wrong.iss = "someone-else".to_string();

        let token = mint_token(&wrong, "main", SECRET.as_bytes()).unwrap();
        let err = verifier().verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidIssuer(_)));
    }

    #[test]
    fn garbage_is_malformed() {
        let err = verifier().verify("not-a-token").unwrap_err();
        assert!(matches!(err, AuthError::Malformed(_)));
    }
}

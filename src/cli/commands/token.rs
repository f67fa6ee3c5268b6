use anyhow::Context;

use crate::auth::{mint_token, Claims};
use crate::cli::OutputFormat;
use crate::config::config;

pub async fn handle(
    sub: String,
    permissions: Vec<String>,
    ttl_hours: Option<u64>,
    kid: Option<String>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let config = config();

    let key = match kid {
        Some(ref kid) => config
            .auth
            .keys
            .iter()
            .find(|key| &key.kid == kid)
            .with_context(|| format!("no configured signing key with kid '{kid}'"))?,
        None => config
            .auth
            .keys
            .first()
            .context("no signing keys configured; set AUTH_KEYS or AUTH_JWT_SECRET")?,
    };

    let ttl = ttl_hours.unwrap_or(config.auth.token_ttl_hours);
    let claims = Claims::new(
        sub,
        Some(permissions),
        config.auth.audience.clone(),
        config.auth.issuer.clone(),
        ttl,
    );
    let token = mint_token(&claims, &key.kid, key.secret.as_bytes())?;

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "token": token, "claims": claims }));
        }
        // Bare token on stdout so it can be piped straight into curl
        OutputFormat::Text => println!("{token}"),
    }

    Ok(())
}

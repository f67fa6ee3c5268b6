use anyhow::Context;

use crate::cli::OutputFormat;

pub async fn handle(url: String, output_format: OutputFormat) -> anyhow::Result<()> {
    let health_url = format!("{}/health", url.trim_end_matches('/'));

    let response = reqwest::get(&health_url)
        .await
        .with_context(|| format!("request to {health_url} failed"))?;
    let status = response.status();
    let body: serde_json::Value = response
        .json()
        .await
        .context("health endpoint did not return JSON")?;

    match output_format {
        OutputFormat::Json => println!("{body}"),
        OutputFormat::Text => {
            println!(
                "{} {}",
                status.as_u16(),
                body["status"].as_str().unwrap_or("unknown")
            );
        }
    }

    anyhow::ensure!(status.is_success(), "server reported status {status}");
    Ok(())
}

pub mod commands;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "barista")]
#[command(about = "Barista CLI - mint test tokens and probe a running API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Mint a signed bearer token for local testing")]
    Token {
        #[arg(long, default_value = "dev-user", help = "Subject to embed in the token")]
        sub: String,

        #[arg(long, value_delimiter = ',', help = "Permissions to grant, comma separated")]
        permissions: Vec<String>,

        #[arg(long, help = "Token lifetime in hours (defaults to the configured TTL)")]
        ttl_hours: Option<u64>,

        #[arg(long, help = "Signing key id (defaults to the first configured key)")]
        kid: Option<String>,
    },

    #[command(about = "Check a running server's health endpoint")]
    Check {
        #[arg(long, default_value = "http://127.0.0.1:8000", help = "Base URL of the server")]
        url: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Token {
            sub,
            permissions,
            ttl_hours,
            kid,
        } => commands::token::handle(sub, permissions, ttl_hours, kid, output_format).await,
        Commands::Check { url } => commands::check::handle(url, output_format).await,
    }
}

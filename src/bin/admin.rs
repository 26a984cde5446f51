//! CLI administration tool for shortly.
//!
//! Talks to the configured store directly, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Check the store connection
//! cargo run --bin admin -- ping
//!
//! # Create a short link (prompts for the URL when omitted)
//! cargo run --bin admin -- shorten https://example.com
//!
//! # Show a link, its remaining TTL and click count
//! cargo run --bin admin -- inspect aB3xY9
//!
//! # Delete a short link before it expires
//! cargo run --bin admin -- delete aB3xY9
//! ```
//!
//! # Environment Variables
//!
//! Reads the same variables as the server (`REDIS_URL`, `BASE_DOMAIN`,
//! `LINK_TTL_SECONDS`, ...). See [`shortly::config`].

use shortly::config::{self, Config};
use shortly::infrastructure::store::ConnectionManager;
use shortly::prelude::{RedirectService, ShortenService};
use shortly::server::build_connector;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use std::sync::Arc;

/// CLI tool for managing shortly.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the store connection
    Ping,

    /// Create a short link
    Shorten {
        /// URL to shorten (prompted for if omitted)
        url: Option<String>,
    },

    /// Show a short link without counting a click
    Inspect {
        /// Short code
        code: String,
    },

    /// Delete a short link and its click counter
    Delete {
        /// Short code
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;
    let manager = Arc::new(ConnectionManager::new(build_connector(&config)?));

    match cli.command {
        Commands::Ping => ping(&config, &manager).await?,
        Commands::Shorten { url } => shorten(&config, manager, url).await?,
        Commands::Inspect { code } => inspect(&config, manager, &code).await?,
        Commands::Delete { code, yes } => delete(&config, manager, &code, yes).await?,
    }

    Ok(())
}

async fn ping(config: &Config, manager: &ConnectionManager) -> Result<()> {
    println!("{}", "🔍 Checking store connection...".bright_blue());

    match manager.acquire().await {
        Ok(_) => {
            println!("{}", "✅ Store is reachable".green().bold());
            println!("  Backend: {}", config.store_backend.cyan());
            println!("  State:   {}", manager.state().to_string().cyan());
            Ok(())
        }
        Err(e) => {
            println!("{}", "❌ Store is unreachable".red().bold());
            Err(anyhow::anyhow!("Store ping failed: {}", e))
        }
    }
}

async fn shorten(config: &Config, manager: Arc<ConnectionManager>, url: Option<String>) -> Result<()> {
    let url = match url {
        Some(u) => u,
        None => Input::new()
            .with_prompt("URL to shorten")
            .interact_text()?,
    };

    let service = ShortenService::new(manager, config.link_settings());
    let link = service
        .shorten(&url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to shorten URL: {}", e))?;

    println!();
    println!("{}", "✅ Short link created".green().bold());
    println!("  Code:      {}", link.code.to_string().bright_yellow().bold());
    println!("  Short URL: {}", link.short_url.cyan());
    println!("  Target:    {}", link.original_url);
    println!("  Expires:   in {}s", config.link_ttl_seconds);
    println!();

    Ok(())
}

async fn inspect(config: &Config, manager: Arc<ConnectionManager>, code: &str) -> Result<()> {
    let service = RedirectService::new(manager, config.link_settings());
    let details = service
        .inspect(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to inspect '{}': {}", code, e))?;

    let expires = match details.ttl_seconds {
        Some(seconds) => format!("in {}s", seconds),
        None => "never".to_string(),
    };

    println!("{}", "🔗 Short link".bright_blue().bold());
    println!("  Code:    {}", details.code.bright_yellow());
    println!("  Target:  {}", details.original_url.cyan());
    println!("  Clicks:  {}", details.clicks.to_string().bright_white().bold());
    println!("  Expires: {}", expires);

    Ok(())
}

async fn delete(
    config: &Config,
    manager: Arc<ConnectionManager>,
    code: &str,
    skip_confirm: bool,
) -> Result<()> {
    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete short link '{}'?", code))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let service = RedirectService::new(manager, config.link_settings());
    let removed = service
        .remove(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete '{}': {}", code, e))?;

    if removed {
        println!("{}", format!("✅ Deleted '{}'", code).green().bold());
    } else {
        println!("{}", format!("⚠️  No link with code '{}'", code).yellow());
    }

    Ok(())
}

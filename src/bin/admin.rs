//! CLI administration tool for shortify.
//!
//! Works directly against the PostgreSQL store, without going through the
//! HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL that never expires
//! cargo run --bin admin -- shorten https://example.com/page --ttl-days 0
//!
//! # Show statistics for one link
//! cargo run --bin admin -- stats aZ3k9Q
//! cargo run --bin admin -- stats --id 42
//!
//! # Show store-wide totals
//! cargo run --bin admin -- summary
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Uses the same configuration as the server. `STORAGE_BACKEND` must be
//! `postgres`, since the in-memory store is private to a server process.

use shortify::config::{self, Config, StorageBackend};
use shortify::domain::entities::MAX_TTL_DAYS;
use shortify::error::AppError;
use shortify::server::{build_service, connect_database};
use shortify::state::DynResolutionService;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use colored::*;

/// CLI tool for managing shortify.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Create a short link
    Shorten {
        /// Target URL (must start with http:// or https://)
        url: String,

        /// Days until the link expires; 0 or less never expires
        #[arg(short, long, value_parser = clap::value_parser!(i32).range(..=MAX_TTL_DAYS as i64))]
        ttl_days: Option<i32>,
    },

    /// Show statistics for a link
    Stats {
        /// Short code
        #[arg(required_unless_present = "id", conflicts_with = "id")]
        code: Option<String>,

        /// Look the link up by numeric id instead
        #[arg(long)]
        id: Option<i64>,
    },

    /// Show total links and visits
    Summary,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    if config.storage != StorageBackend::Postgres {
        bail!("admin requires STORAGE_BACKEND=postgres");
    }

    match cli.command {
        Commands::Shorten { url, ttl_days } => {
            let service = build_service(&config).await?;
            handle_shorten(&service, &config, &url, ttl_days.unwrap_or(config.default_ttl_days))
                .await?
        }
        Commands::Stats { code, id } => {
            let service = build_service(&config).await?;
            handle_stats(&service, &config, code, id).await?
        }
        Commands::Summary => {
            let service = build_service(&config).await?;
            handle_summary(&service).await?
        }
        Commands::Db { action } => handle_db_action(action, &config).await?,
    }

    Ok(())
}

/// Creates a short link and prints it.
async fn handle_shorten(
    service: &DynResolutionService,
    config: &Config,
    url: &str,
    ttl_days: i32,
) -> Result<()> {
    println!("{}", "🔗 Shorten URL".bright_blue().bold());
    println!();

    let link = match service.shorten(url, ttl_days).await {
        Ok(link) => link,
        Err(e) => return report(e),
    };

    println!("  Code:      {}", link.code.bright_yellow().bold());
    println!(
        "  Short URL: {}",
        short_url(config, &link.code).bright_white()
    );
    println!("  Target:    {}", link.target_url.cyan());
    println!("  Expires:   {}", format_expiry(link.expires_at));
    println!();
    println!("{}", "✅ Link created successfully!".green().bold());
    println!();

    Ok(())
}

/// Displays a single link's statistics.
///
/// Does not count as a visit.
async fn handle_stats(
    service: &DynResolutionService,
    config: &Config,
    code: Option<String>,
    id: Option<i64>,
) -> Result<()> {
    println!("{}", "📊 Link Statistics".bright_blue().bold());
    println!();

    let result = match (code, id) {
        (_, Some(id)) => service.stats_by_id(id).await,
        (Some(code), None) => service.stats(&code).await,
        (None, None) => bail!("either a code or --id must be given"),
    };

    let stats = match result {
        Ok(stats) => stats,
        Err(e) => return report(e),
    };

    let status = if stats.link.is_expired() {
        "EXPIRED".red()
    } else {
        "ACTIVE".green()
    };

    println!("  ID:        {}", stats.link.id.to_string().bright_black());
    println!("  Code:      {}", stats.link.code.bright_yellow().bold());
    println!(
        "  Short URL: {}",
        short_url(config, &stats.link.code).bright_white()
    );
    println!("  Target:    {}", stats.link.target_url.cyan());
    println!(
        "  Created:   {}",
        stats.link.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("  Expires:   {}", format_expiry(stats.link.expires_at));
    println!("  Status:    {}", status);
    println!(
        "  Visits:    {}",
        stats.visits.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Displays store-wide totals.
async fn handle_summary(service: &DynResolutionService) -> Result<()> {
    println!("{}", "📊 Summary".bright_blue().bold());
    println!();

    let (links, visits) = service.totals().await?;

    println!("  Links:  {}", links.to_string().bright_green().bold());
    println!("  Visits: {}", visits.to_string().bright_green().bold());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, config: &Config) -> Result<()> {
    let pool = connect_database(config).await?;

    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(&pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(&pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}

/// Prints a domain error and exits with a failure status.
fn report(error: AppError) -> Result<()> {
    let info = error.to_error_info();
    println!("{} {}", "❌".red(), info.message.red().bold());
    println!("   {}", info.code.bright_black());
    println!();
    std::process::exit(1);
}

fn short_url(config: &Config, code: &str) -> String {
    format!("{}/{}", config.base_url.trim_end_matches('/'), code)
}

fn format_expiry(expires_at: Option<chrono::DateTime<chrono::Utc>>) -> String {
    expires_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string())
}

//! CLI administration tool for the on-chain URL shortener.
//!
//! Talks to the URL storage contract directly, without going through the
//! HTTP API or the payment gate.
//!
//! # Usage
//!
//! ```bash
//! # Resolve a code
//! cargo run --bin admin -- lookup aB3xY9
//!
//! # Check whether a code is taken
//! cargo run --bin admin -- check promo2025
//!
//! # Contract totals and signer authorization
//! cargo run --bin admin -- stats
//!
//! # Authorize (or revoke) a server address; owner key required
//! cargo run --bin admin -- authorize 0xServerAddress
//! cargo run --bin admin -- authorize 0xServerAddress --revoke
//!
//! # Shorten without payment
//! cargo run --bin admin -- shorten https://example.com --code promo2025
//!
//! # Check RPC connectivity
//! cargo run --bin admin -- ping
//! ```
//!
//! # Environment Variables
//!
//! - `CONTRACT_ADDRESS` (required): URL storage contract
//! - `RPC_URL`: JSON-RPC endpoint (default: `https://sepolia.base.org`)
//! - `SERVER_PRIVATE_KEY`: signer for `authorize` and `shorten`

use onchain_shortener::application::services::{AllocatorSettings, CodeAllocator, LookupService};
use onchain_shortener::config::{self, Config, RegistryBackend};
use onchain_shortener::domain::repositories::UrlRegistry;
use onchain_shortener::infrastructure::registry::EvmRegistry;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use ethers::types::Address;
use ethers::utils::to_checksum;
use std::sync::Arc;
use std::time::Instant;

/// CLI tool for managing the on-chain URL shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the record stored under a short code
    Lookup {
        code: String,
    },

    /// Check whether a short code is already registered
    Check {
        code: String,
    },

    /// Show contract totals and signer authorization
    Stats,

    /// Grant or revoke registry write access for a server address
    Authorize {
        /// Server address (0x-prefixed)
        address: String,

        /// Revoke instead of grant
        #[arg(long)]
        revoke: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Shorten a URL directly, bypassing payments
    Shorten {
        url: String,

        /// Custom code (3-20 alphanumeric characters)
        #[arg(short, long)]
        code: Option<String>,

        /// Owner address recorded as creator (default: DEFAULT_OWNER)
        #[arg(short, long)]
        owner: Option<String>,
    },

    /// Check RPC connectivity
    Ping,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    if config.registry_backend != RegistryBackend::Evm {
        anyhow::bail!("admin commands require REGISTRY_BACKEND=evm");
    }

    let registry = Arc::new(connect(&config).await?);

    match cli.command {
        Commands::Lookup { code } => lookup(registry, &code).await?,
        Commands::Check { code } => check(registry.as_ref(), &code).await?,
        Commands::Stats => stats(registry.as_ref()).await?,
        Commands::Authorize {
            address,
            revoke,
            yes,
        } => authorize(registry.as_ref(), &address, !revoke, yes).await?,
        Commands::Shorten { url, code, owner } => {
            let owner = owner.unwrap_or_else(|| config.default_owner.clone());
            shorten(registry, &config, &url, code.as_deref(), &owner).await?
        }
        Commands::Ping => ping(registry.as_ref()).await?,
    }

    Ok(())
}

async fn connect(config: &Config) -> Result<EvmRegistry> {
    let contract = config
        .contract_address
        .as_deref()
        .context("CONTRACT_ADDRESS must be set")?;

    EvmRegistry::connect(
        &config.rpc_url,
        contract,
        config.server_private_key.as_deref(),
        config.registry_timeout(),
    )
    .await
    .context("Failed to connect to registry")
}

/// Prints the record for `code`.
async fn lookup(registry: Arc<EvmRegistry>, code: &str) -> Result<()> {
    println!("{}", "🔎 Lookup".bright_blue().bold());
    println!();

    let service = LookupService::new(registry);

    match service.resolve(code).await {
        Ok(record) => {
            println!("  Code:     {}", code.cyan());
            println!("  URL:      {}", record.original_url.bright_white());
            println!("  Creator:  {}", record.creator.bright_black());
            println!(
                "  Created:  {} ({} days ago)",
                record.created_at.format("%Y-%m-%d %H:%M UTC"),
                record.days_since_creation(Utc::now())
            );
        }
        Err(e) => println!("  {} {}", "✗".red(), e),
    }
    println!();

    Ok(())
}

async fn check(registry: &EvmRegistry, code: &str) -> Result<()> {
    let taken = registry
        .exists(code)
        .await
        .map_err(|e| anyhow::anyhow!("Registry error: {}", e))?;

    if taken {
        println!("  {} '{}' is taken", "●".red(), code.cyan());
    } else {
        println!("  {} '{}' is available", "●".green(), code.cyan());
    }

    Ok(())
}

/// Displays contract totals and whether this server may write.
async fn stats(registry: &EvmRegistry) -> Result<()> {
    println!("{}", "📊 Registry".bright_blue().bold());
    println!();

    let stats = registry
        .stats()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read stats: {}", e))?;

    println!(
        "  {:<18} {}",
        "Contract:",
        to_checksum(&registry.contract_address(), None).bright_black()
    );
    println!(
        "  {:<18} {}",
        "Owner:",
        to_checksum(&stats.owner, None).bright_black()
    );
    println!(
        "  {:<18} {}",
        "URLs created:",
        stats.total_urls.to_string().bright_white().bold()
    );

    match registry.signer_address() {
        Some(signer) => {
            let authorized = registry
                .is_authorized(signer)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to read authorization: {}", e))?;
            let status = if authorized {
                "AUTHORIZED".green()
            } else {
                "NOT AUTHORIZED".red()
            };
            println!(
                "  {:<18} {} {}",
                "Signer:",
                to_checksum(&signer, None).bright_black(),
                status
            );
        }
        None => println!("  {:<18} {}", "Signer:", "none (read-only)".yellow()),
    }
    println!();

    Ok(())
}

/// Grants or revokes write access, asking for confirmation unless `--yes`.
async fn authorize(
    registry: &EvmRegistry,
    address: &str,
    grant: bool,
    skip_confirm: bool,
) -> Result<()> {
    let server: Address = address
        .parse()
        .with_context(|| format!("Invalid address '{}'", address))?;

    let action = if grant { "Authorize" } else { "Revoke" };
    println!("{}", format!("🔐 {} server", action).bright_blue().bold());
    println!();
    println!("  Server:   {}", to_checksum(&server, None).cyan());
    println!(
        "  Contract: {}",
        to_checksum(&registry.contract_address(), None).bright_black()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("{} this server?", action))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let tx_hash = registry
        .set_server_authorization(server, grant)
        .await
        .map_err(|e| anyhow::anyhow!("Transaction failed: {}", e))?;

    println!();
    println!("{}", "✅ Done".green().bold());
    println!("  Tx: {}", tx_hash.bright_black());
    println!();

    Ok(())
}

/// Allocates and commits a code through the same allocator the API uses.
async fn shorten(
    registry: Arc<EvmRegistry>,
    config: &Config,
    url: &str,
    code: Option<&str>,
    owner: &str,
) -> Result<()> {
    println!("{}", "✂️  Shorten".bright_blue().bold());
    println!();

    let allocator = CodeAllocator::new(
        registry,
        AllocatorSettings {
            code_length: config.code_length,
            max_attempts: config.max_allocation_attempts,
        },
    );

    let started = Instant::now();
    let allocation = allocator
        .allocate(url, code, owner)
        .await
        .map_err(|e| anyhow::anyhow!("{} ({})", e, e.code()))?;

    println!(
        "  {} {}/s/{}",
        "✅".green(),
        config.app_url,
        allocation.code.bright_yellow().bold()
    );
    println!("  URL:   {}", allocation.original_url);
    println!("  Owner: {}", allocation.owner.bright_black());
    println!(
        "  Took:  {}",
        format!("{:.1}s", started.elapsed().as_secs_f64()).bright_black()
    );
    println!();

    Ok(())
}

async fn ping(registry: &EvmRegistry) -> Result<()> {
    let started = Instant::now();

    if registry.health_check().await {
        println!(
            "{} RPC reachable ({} ms)",
            "✅".green(),
            started.elapsed().as_millis()
        );
        Ok(())
    } else {
        anyhow::bail!("RPC endpoint is unreachable")
    }
}

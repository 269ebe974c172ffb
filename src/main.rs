//! CLI binary for the MeshChain automation client
//!
//! Loads settings, the credential list and the proxy list, then runs the
//! scheduler: every account in order, a short delay between accounts, a
//! long cooldown between passes, forever (or once with `--once`).

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use meshchain_bot::{
    Scheduler,
    config::ConfigLoader,
    proxy::ProxyList,
    types::account::load_credentials,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "meshchain-bot")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Credential list file, one token per line (overrides config)
    #[arg(short, long, value_name = "DATA_FILE")]
    data_file: Option<PathBuf>,

    /// Proxy list file, positionally matched to accounts (overrides config)
    #[arg(short, long, value_name = "PROXY_FILE")]
    proxy_file: Option<PathBuf>,

    /// Run a single pass over all accounts and exit
    #[arg(long)]
    once: bool,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(cli).await {
        error!("{}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Load configuration: defaults < file < environment < CLI flags
    let loader = ConfigLoader::new();
    let mut settings = loader.load(cli.config.as_deref())?;

    if let Some(data_file) = cli.data_file {
        settings.files.credentials = data_file;
    }
    if let Some(proxy_file) = cli.proxy_file {
        settings.files.proxies = proxy_file;
    }

    let credentials = load_credentials(&settings.files.credentials)?;
    if credentials.is_empty() {
        anyhow::bail!(
            "No credentials found in {:?}",
            settings.files.credentials
        );
    }
    info!("Loaded {} accounts", credentials.len());

    let proxies = ProxyList::load(&settings.files.proxies)?;

    let scheduler = Scheduler::new(settings, credentials, proxies)?;

    if cli.once {
        scheduler.run_pass().await;
    } else {
        scheduler.run_forever().await;
    }

    Ok(())
}

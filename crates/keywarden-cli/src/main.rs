//! Keywarden CLI application
//!
//! Configure and verify LLM provider credentials from the terminal.
//!
//! # Modes
//!
//! ## Interactive (default)
//! A menu over every registered provider with ✓/✗ configured markers.
//! Configuring a provider prompts for a value, verifies it with one
//! minimal completion call, and persists it on success (or on explicit
//! override after a failure).
//!
//! - **Command:** `keywarden`
//!
//! ## Batch test
//! Probe every provider with a stored credential and print a pass/fail
//! summary. Never writes to the store.
//!
//! - **Command:** `keywarden --test-all`
//!
//! ## Status
//! Print the configuration table (masked values) and exit.
//!
//! - **Command:** `keywarden --status`
//!
//! Set `RUST_LOG=debug` for verbose logging.

mod args;
mod console;
mod menu;

use clap::Parser;
use colored::*;
use keywarden_core::error::Result;
use keywarden_core::probe::HttpProbeClient;
use keywarden_core::registry::ProviderRegistry;
use keywarden_core::store::EnvFileStore;
use keywarden_core::workflow::manager::ConfigManager;

#[tokio::main]
async fn main() {
    // Initialize logging with environment-based filtering
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = args::Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("{} {}", "✗".red().bold(), err);
        std::process::exit(1);
    }
}

async fn run(cli: args::Cli) -> Result<()> {
    // A store that cannot be loaded or created is the only fatal
    // failure; everything later is reported and the session continues.
    let store = EnvFileStore::load_or_create(&cli.env_file)?;
    let registry = ProviderRegistry::builtin();
    let probe = HttpProbeClient::new()?;
    let manager = ConfigManager::new(registry, store, probe);

    let mut menu = menu::InteractiveMenu::new(manager, cli.verbose);
    if cli.test_all {
        menu.run_test_all().await;
    } else if cli.status {
        menu.print_status();
    } else {
        menu.run().await?;
    }

    Ok(())
}

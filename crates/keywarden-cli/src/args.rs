//! CLI argument definitions using clap
//!
//! Two non-interactive modes and an interactive default:
//! - keywarden                # Interactive menu (default)
//! - keywarden --test-all     # Probe every configured provider, exit
//! - keywarden --status       # Show configuration status, exit

use clap::Parser;

/// Default env file consulted by all commands.
pub const DEFAULT_ENV_FILE: &str = ".env";

#[derive(Parser)]
#[command(name = "keywarden")]
#[command(about = "Keywarden - configure and verify LLM provider credentials")]
#[command(
    long_about = r#"Keywarden - configure and verify LLM provider credentials

USAGE:
  keywarden                      # Start the interactive menu
  keywarden --test-all           # Test all configured providers and exit
  keywarden --status             # Show configuration status and exit
  keywarden --env-file <PATH>    # Use a different credentials file

Credentials are verified with one minimal completion call per provider
before they are saved. Exit code is non-zero only when the credentials
file cannot be loaded or created."#
)]
#[command(version)]
pub struct Cli {
    /// Test every configured provider and exit
    #[arg(long = "test-all", conflicts_with = "status")]
    pub test_all: bool,

    /// Show configuration status and exit
    #[arg(long)]
    pub status: bool,

    /// Path to the env file holding credentials
    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    pub env_file: String,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,
}

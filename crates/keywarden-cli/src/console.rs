//! CLI console utilities

use colored::*;
use console::Term;
use std::io::{self, Write};

/// CLI console for formatted output
pub struct CliConsole {
    verbose: bool,
}

impl CliConsole {
    /// Create a new CLI console
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        println!("{} {}", "ℹ".blue().bold(), message);
    }

    /// Print a debug-level note, shown only in verbose mode
    pub fn note(&self, message: &str) {
        if self.verbose {
            println!("  {}", message.dimmed());
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        println!("{} {}", "✓".green().bold(), message.green());
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        println!("{} {}", "⚠".yellow().bold(), message.yellow());
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    }

    /// Print a header
    pub fn print_header(&self, title: &str) {
        println!();
        println!("{}", title.bold().underline());
        println!("{}", "=".repeat(title.len()).dimmed());
    }

    /// Ask for user confirmation; defaults to no
    pub fn confirm(&self, message: &str) -> io::Result<bool> {
        print!("{} {} [y/N]: ", "?".yellow().bold(), message);
        io::stdout().flush()?;

        let input = Term::stdout().read_line()?;
        Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
    }
}

impl Default for CliConsole {
    fn default() -> Self {
        Self::new(false)
    }
}

//! Interactive configuration menu
//!
//! A plain blocking read-eval loop over the session state machine:
//! list providers, configure one end to end, batch-test, or show
//! status. No single provider failure ends the session.

use crate::console::CliConsole;
use colored::*;
use dialoguer::{Input, Password, Select, theme::ColorfulTheme};
use indicatif::{ProgressBar, ProgressStyle};
use keywarden_core::error::{Error, Result};
use keywarden_core::probe::CompletionProbe;
use keywarden_core::registry::{CredentialKind, ProviderDescriptor};
use keywarden_core::workflow::manager::ConfigManager;
use keywarden_core::workflow::state::{Session, SessionEvent, SessionState};

/// Spinner shown while a probe is in flight.
struct ValidationSpinner {
    bar: ProgressBar,
}

impl ValidationSpinner {
    fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
                .template("{spinner:.blue} {msg}")
                .expect("valid spinner template"),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { bar }
    }

    fn finish_success(&self, message: &str) {
        self.bar
            .finish_with_message(format!("{} {}", "✓".green(), message));
    }

    fn finish_warning(&self, message: &str) {
        self.bar
            .finish_with_message(format!("{} {}", "⚠".yellow(), message));
    }
}

/// Interactive menu over a configuration manager.
pub struct InteractiveMenu<P> {
    manager: ConfigManager<P>,
    console: CliConsole,
}

impl<P: CompletionProbe> InteractiveMenu<P> {
    /// Create a new menu.
    pub fn new(manager: ConfigManager<P>, verbose: bool) -> Self {
        Self {
            manager,
            console: CliConsole::new(verbose),
        }
    }

    /// Run the menu loop until the user exits.
    pub async fn run(&mut self) -> Result<()> {
        self.console.print_header("Provider Credentials");
        self.console
            .note(&format!("store: {}", self.manager.store().path().display()));

        loop {
            println!();
            let statuses = self.manager.provider_status();
            let mut items: Vec<String> = statuses
                .iter()
                .map(|status| {
                    let mark = if status.configured { "✓" } else { "✗" };
                    format!("{} {}", mark, status.display_name)
                })
                .collect();
            items.push("Test all configured".to_string());
            items.push("Show status".to_string());
            items.push("Exit".to_string());

            let selection = Select::with_theme(&ColorfulTheme::default())
                .with_prompt("Select a provider to configure")
                .items(&items)
                .default(0)
                .interact()
                .map_err(|e| Error::invalid_input(format!("selection error: {}", e)))?;

            if selection < statuses.len() {
                let provider = self
                    .manager
                    .registry()
                    .get(&statuses[selection].id)?
                    .clone();
                self.configure(provider).await?;
            } else if selection == statuses.len() {
                self.run_test_all().await;
            } else if selection == statuses.len() + 1 {
                self.print_status();
            } else {
                break;
            }
        }

        Ok(())
    }

    /// Configure one provider end to end: prompt, validate, persist or
    /// discard. Store errors abort this operation, never the session.
    async fn configure(&mut self, provider: ProviderDescriptor) -> Result<()> {
        let mut session = Session::new();
        session.apply(SessionEvent::SelectProvider);
        let mut candidate = String::new();

        loop {
            match session.state() {
                SessionState::ProviderSelected => {
                    if self.manager.is_configured(&provider) {
                        let overwrite = self
                            .console
                            .confirm(&format!(
                                "{} is already configured. Overwrite?",
                                provider.display_name
                            ))
                            .map_err(|e| Error::invalid_input(format!("input error: {}", e)))?;
                        if overwrite {
                            session.apply(SessionEvent::ConfirmOverwrite);
                        } else {
                            self.console
                                .info(&format!("{} left unchanged", provider.display_name));
                            session.apply(SessionEvent::DeclineOverwrite);
                        }
                    } else {
                        session.apply(SessionEvent::ConfirmOverwrite);
                    }
                }
                SessionState::AwaitingValue => {
                    candidate = self.prompt_value(&provider)?;
                    if candidate.trim().is_empty() {
                        self.console
                            .info(&format!("no value entered, skipping {}", provider.display_name));
                        session.apply(SessionEvent::EmptyValue);
                    } else {
                        session.apply(SessionEvent::SubmitValue);
                    }
                }
                SessionState::Validating => {
                    let spinner = ValidationSpinner::new(&format!(
                        "Validating {} credential...",
                        provider.display_name
                    ));
                    let outcome = self
                        .manager
                        .validate_candidate(&provider, candidate.trim())
                        .await;

                    if outcome.success {
                        spinner.finish_success(&outcome.message);
                        session.apply(SessionEvent::ValidationPassed);
                    } else {
                        spinner.finish_warning(&outcome.message);
                        session.apply(SessionEvent::ValidationFailed);
                    }
                }
                SessionState::AwaitingOverrideDecision => {
                    // Escape hatch for transient failures: the value can
                    // be saved unverified.
                    if self
                        .console
                        .confirm("Validation failed. Save the value anyway?")
                        .map_err(|e| Error::invalid_input(format!("input error: {}", e)))?
                    {
                        session.apply(SessionEvent::ForceSave);
                    } else {
                        session.apply(SessionEvent::Discard);
                    }
                }
                SessionState::Saved => {
                    match self.manager.save(&provider, candidate.trim()) {
                        Ok(()) => self
                            .console
                            .success(&format!("{} credential saved", provider.display_name)),
                        Err(err) => self.console.error(&format!(
                            "failed to persist {} credential: {}",
                            provider.display_name, err
                        )),
                    }
                    session.apply(SessionEvent::Finish);
                }
                SessionState::Discarded => {
                    self.console
                        .info(&format!("{} value discarded", provider.display_name));
                    session.apply(SessionEvent::Finish);
                }
                SessionState::MainMenu | SessionState::Exit => break,
            }
        }

        Ok(())
    }

    /// Prompt for a candidate value. Secrets are read without echo;
    /// endpoint URLs are plain input pre-filled with the default.
    fn prompt_value(&self, provider: &ProviderDescriptor) -> Result<String> {
        println!();
        println!("  {}", provider.instructions.dimmed());

        let theme = ColorfulTheme::default();
        let value = match provider.kind {
            CredentialKind::ApiKey => Password::with_theme(&theme)
                .with_prompt(format!(
                    "{} API key (leave blank to skip)",
                    provider.display_name
                ))
                .allow_empty_password(true)
                .interact(),
            CredentialKind::Endpoint => {
                let mut input = Input::<String>::with_theme(&theme)
                    .with_prompt(format!("{} endpoint URL", provider.display_name))
                    .allow_empty(true);
                if let Some(default) = provider.default_value {
                    input = input.default(default.to_string());
                }
                input.interact_text()
            }
        }
        .map_err(|e| Error::invalid_input(format!("input error: {}", e)))?;

        Ok(value)
    }

    /// Probe every configured provider and print a pass/fail summary.
    pub async fn run_test_all(&self) {
        let spinner = ValidationSpinner::new("Testing configured providers...");
        let reports = self.manager.test_all().await;

        if reports.is_empty() {
            spinner.finish_warning("no providers configured");
            return;
        }

        let passed = reports.iter().filter(|r| r.outcome.success).count();
        spinner.finish_success(&format!("{}/{} providers passed", passed, reports.len()));

        for report in &reports {
            let tag = if report.outcome.success {
                "PASS".green().bold()
            } else {
                "FAIL".red().bold()
            };
            println!("  {} {} - {}", tag, report.display_name, report.outcome.message);
        }
    }

    /// Print the configuration status table.
    pub fn print_status(&self) {
        self.console.print_header("Configuration Status");

        let statuses = self.manager.provider_status();
        for status in &statuses {
            let mark = if status.configured {
                "✓".green().bold()
            } else {
                "✗".red()
            };
            let value = match &status.display_value {
                Some(value) => value.cyan(),
                None => "not set".dimmed(),
            };
            println!(
                "  {} {} {} {}",
                mark,
                format!("{:<10}", status.display_name),
                format!("{:<18}", status.credential_slot).dimmed(),
                value
            );
        }

        if statuses.iter().all(|s| !s.configured) {
            println!();
            self.console
                .warn("no providers configured yet; start without flags to add one");
        }
    }
}

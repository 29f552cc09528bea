//! Configuration workflow manager
//!
//! The manager composes the registry, the store, and a probe client.
//! It is the only component that writes to the store; validation reads
//! a candidate and returns a verdict, nothing more.

use crate::error::Result;
use crate::mask::display_value;
use crate::probe::CompletionProbe;
use crate::registry::{ProviderDescriptor, ProviderRegistry};
use crate::store::EnvFileStore;
use crate::validate::{ValidationOutcome, validate};
use serde::Serialize;
use tracing::info;

/// Configured/unconfigured summary for one provider.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderStatus {
    pub id: String,
    pub display_name: String,
    pub credential_slot: String,
    pub configured: bool,
    /// Stored value rendered per the masking rules; absent when
    /// unconfigured
    pub display_value: Option<String>,
}

/// Result of probing one configured provider during batch testing.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub provider_id: String,
    pub display_name: String,
    pub outcome: ValidationOutcome,
}

/// Orchestrates the configuration workflow over a registry, a store,
/// and a probe client.
pub struct ConfigManager<P> {
    registry: ProviderRegistry,
    store: EnvFileStore,
    probe: P,
}

impl<P: CompletionProbe> ConfigManager<P> {
    /// Create a new manager.
    pub fn new(registry: ProviderRegistry, store: EnvFileStore, probe: P) -> Self {
        Self {
            registry,
            store,
            probe,
        }
    }

    /// The provider registry.
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Read-only view of the store.
    pub fn store(&self) -> &EnvFileStore {
        &self.store
    }

    /// Whether a provider currently has a stored value. Derived from
    /// the store on every call; there is no separate configured flag.
    pub fn is_configured(&self, provider: &ProviderDescriptor) -> bool {
        self.store.get(provider.credential_slot).is_some()
    }

    /// Status summary for every provider, in registry order.
    pub fn provider_status(&self) -> Vec<ProviderStatus> {
        self.registry
            .providers()
            .iter()
            .map(|provider| {
                let stored = self.store.get(provider.credential_slot);
                ProviderStatus {
                    id: provider.id.to_string(),
                    display_name: provider.display_name.to_string(),
                    credential_slot: provider.credential_slot.to_string(),
                    configured: stored.is_some(),
                    display_value: stored.map(|value| display_value(provider, value)),
                }
            })
            .collect()
    }

    /// Validate a candidate value without touching the store.
    pub async fn validate_candidate(
        &self,
        provider: &ProviderDescriptor,
        candidate: &str,
    ) -> ValidationOutcome {
        validate(&self.probe, provider, candidate).await
    }

    /// Persist a value for a provider. The sole write path into the
    /// store.
    pub fn save(&mut self, provider: &ProviderDescriptor, value: &str) -> Result<()> {
        self.store.set(provider.credential_slot, value)?;
        info!(
            provider = provider.id,
            slot = provider.credential_slot,
            "credential saved"
        );
        Ok(())
    }

    /// Probe every provider with a stored value, sequentially and in
    /// registry order, and collect a pass/fail report. Testing never
    /// mutates the store.
    pub async fn test_all(&self) -> Vec<ProbeReport> {
        let mut reports = Vec::new();

        for provider in self.registry.providers() {
            let Some(value) = self.store.get(provider.credential_slot) else {
                continue;
            };
            let outcome = validate(&self.probe, provider, value).await;
            reports.push(ProbeReport {
                provider_id: provider.id.to_string(),
                display_name: provider.display_name.to_string(),
                outcome,
            });
        }

        reports
    }
}

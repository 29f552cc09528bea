//! Built-in provider registry
//!
//! The provider table is a closed set fixed at build time. Order is
//! stable so menu numbering stays deterministic across runs.

use crate::error::{Error, Result};

/// How a provider's credential slot is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    /// The stored value is a secret API key.
    ApiKey,
    /// The stored value is a non-secret base URL (locally hosted
    /// providers such as Ollama).
    Endpoint,
}

/// Descriptor for one external completion provider.
#[derive(Debug, Clone)]
pub struct ProviderDescriptor {
    /// Unique provider identifier (e.g., "anthropic")
    pub id: &'static str,
    /// Display name (e.g., "Anthropic")
    pub display_name: &'static str,
    /// Store key under which the credential is persisted
    pub credential_slot: &'static str,
    /// Cheapest model used for the verification probe
    pub test_model: &'static str,
    /// Where and how to obtain a value
    pub instructions: &'static str,
    /// Pre-filled value for endpoint-bearing providers
    pub default_value: Option<&'static str>,
    /// Secret-bearing or endpoint-bearing
    pub kind: CredentialKind,
}

impl ProviderDescriptor {
    /// Whether the stored value is secret material.
    pub fn is_secret(&self) -> bool {
        matches!(self.kind, CredentialKind::ApiKey)
    }
}

/// Registry over the built-in provider table.
pub struct ProviderRegistry {
    providers: Vec<ProviderDescriptor>,
}

impl ProviderRegistry {
    /// Build the registry with the built-in provider table.
    pub fn builtin() -> Self {
        Self {
            providers: vec![
                ProviderDescriptor {
                    id: "openai",
                    display_name: "OpenAI",
                    credential_slot: "OPENAI_API_KEY",
                    test_model: "gpt-4o-mini",
                    instructions: "Create a key at https://platform.openai.com/api-keys",
                    default_value: None,
                    kind: CredentialKind::ApiKey,
                },
                ProviderDescriptor {
                    id: "anthropic",
                    display_name: "Anthropic",
                    credential_slot: "ANTHROPIC_API_KEY",
                    test_model: "claude-3-5-haiku-20241022",
                    instructions: "Create a key at https://console.anthropic.com/settings/keys",
                    default_value: None,
                    kind: CredentialKind::ApiKey,
                },
                ProviderDescriptor {
                    id: "google",
                    display_name: "Google",
                    credential_slot: "GOOGLE_API_KEY",
                    test_model: "gemini-2.0-flash",
                    instructions: "Create a key at https://aistudio.google.com/apikey",
                    default_value: None,
                    kind: CredentialKind::ApiKey,
                },
                ProviderDescriptor {
                    id: "groq",
                    display_name: "Groq",
                    credential_slot: "GROQ_API_KEY",
                    test_model: "llama-3.1-8b-instant",
                    instructions: "Create a key at https://console.groq.com/keys",
                    default_value: None,
                    kind: CredentialKind::ApiKey,
                },
                ProviderDescriptor {
                    id: "ollama",
                    display_name: "Ollama",
                    credential_slot: "OLLAMA_BASE_URL",
                    test_model: "llama3.1",
                    instructions: "Run a local Ollama server (https://ollama.ai) and enter its URL",
                    default_value: Some("http://localhost:11434"),
                    kind: CredentialKind::Endpoint,
                },
            ],
        }
    }

    /// All providers in stable menu order.
    pub fn providers(&self) -> &[ProviderDescriptor] {
        &self.providers
    }

    /// Look up a provider by id.
    pub fn get(&self, id: &str) -> Result<&ProviderDescriptor> {
        self.providers
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::not_found(format!("provider '{}' is not registered", id)))
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_and_slots_are_unique() {
        let registry = ProviderRegistry::builtin();

        let ids: HashSet<_> = registry.providers().iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), registry.providers().len());

        let slots: HashSet<_> = registry
            .providers()
            .iter()
            .map(|p| p.credential_slot)
            .collect();
        assert_eq!(slots.len(), registry.providers().len());
    }

    #[test]
    fn test_order_is_stable() {
        let registry = ProviderRegistry::builtin();
        let ids: Vec<_> = registry.providers().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["openai", "anthropic", "google", "groq", "ollama"]);
    }

    #[test]
    fn test_get_by_id() {
        let registry = ProviderRegistry::builtin();

        let anthropic = registry.get("anthropic").unwrap();
        assert_eq!(anthropic.display_name, "Anthropic");
        assert!(anthropic.is_secret());

        assert!(registry.get("nonexistent").is_err());
    }

    #[test]
    fn test_ollama_is_endpoint_bearing() {
        let registry = ProviderRegistry::builtin();
        let ollama = registry.get("ollama").unwrap();

        assert_eq!(ollama.kind, CredentialKind::Endpoint);
        assert!(!ollama.is_secret());
        assert_eq!(ollama.default_value, Some("http://localhost:11434"));
    }
}

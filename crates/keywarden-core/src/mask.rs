//! Display masking for stored credential values

use crate::registry::{CredentialKind, ProviderDescriptor};

/// Placeholder for secrets too short to partially reveal.
const MASK_PLACEHOLDER: &str = "***";

/// Mask a secret for safe display.
///
/// Values longer than 12 characters keep the first 8 and last 4
/// characters around an ellipsis; anything shorter collapses to a
/// fixed placeholder so the length leaks nothing.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 12 {
        return MASK_PLACEHOLDER.to_string();
    }

    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Render a stored value for display according to the provider's
/// credential kind. Endpoint URLs are not secrets and show in full.
pub fn display_value(provider: &ProviderDescriptor, value: &str) -> String {
    match provider.kind {
        CredentialKind::ApiKey => mask_secret(value),
        CredentialKind::Endpoint => value.to_string(),
    }
}

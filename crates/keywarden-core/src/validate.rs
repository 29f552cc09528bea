//! Probe outcome classification
//!
//! The validation engine issues one minimal completion call and folds
//! every failure into a [`ValidationOutcome`]; it never raises to its
//! caller. Classification is ordered: credential markers win over
//! connectivity markers so an auth failure on a flaky link still reads
//! as a credential problem, and everything else lands in the unknown
//! bucket with the raw text truncated.

use crate::probe::{CompletionProbe, PROBE_TIMEOUT, ProbeRequest};
use crate::registry::{CredentialKind, ProviderDescriptor};
use serde::Serialize;
use std::fmt;
use tokio::time::timeout;
use tracing::debug;

/// Substrings that mark an authorization rejection.
const CREDENTIAL_MARKERS: &[&str] = &[
    "api_key",
    "api key",
    "unauthorized",
    "invalid api key",
    "401",
    "authentication",
];

/// Substrings that mark a connectivity problem. Timeouts count: a
/// probe that cannot complete in its budget is indistinguishable from
/// an unreachable service.
const CONNECTION_MARKERS: &[&str] = &[
    "connection",
    "refused",
    "timeout",
    "timed out",
    "unreachable",
    "dns",
];

/// Display budget for unclassified error text.
const MAX_MESSAGE_CHARS: usize = 200;

/// Classified reason a probe failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeErrorKind {
    /// Authorization rejected; the user must re-enter the value.
    InvalidCredential,
    /// Network or service unreachable; likely transient.
    ConnectionFailure,
    /// Unclassified; the raw (truncated) error text is surfaced.
    Unknown,
}

impl fmt::Display for ProbeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeErrorKind::InvalidCredential => write!(f, "invalid credential"),
            ProbeErrorKind::ConnectionFailure => write!(f, "connection failure"),
            ProbeErrorKind::Unknown => write!(f, "unknown error"),
        }
    }
}

/// Result of validating one candidate value against its provider.
/// Created per probe call and consumed immediately.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutcome {
    /// Whether the probe produced a usable completion
    pub success: bool,
    /// Failure classification; absent on success
    pub error_kind: Option<ProbeErrorKind>,
    /// One-line human-readable detail; never the raw secret
    pub message: String,
}

impl ValidationOutcome {
    /// Build a passing outcome.
    pub fn passed(message: impl Into<String>) -> Self {
        Self {
            success: true,
            error_kind: None,
            message: message.into(),
        }
    }

    /// Build a failing outcome.
    pub fn failed(kind: ProbeErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_kind: Some(kind),
            message: message.into(),
        }
    }
}

/// Validate a candidate value by probing the provider once.
///
/// All failure paths are captured in the returned outcome; transport
/// errors from the probe client stop here. The probe is bounded by
/// [`PROBE_TIMEOUT`] regardless of the client's own limits; an elapsed
/// budget classifies as a connection failure.
pub async fn validate(
    probe: &impl CompletionProbe,
    provider: &ProviderDescriptor,
    candidate: &str,
) -> ValidationOutcome {
    let request = ProbeRequest::minimal(provider, candidate);
    debug!(
        provider = provider.id,
        model = provider.test_model,
        "validating candidate credential"
    );

    match timeout(PROBE_TIMEOUT, probe.complete(&request)).await {
        Ok(Ok(response)) if response.has_content() => ValidationOutcome::passed(format!(
            "{} responded via {}",
            provider.display_name, provider.test_model
        )),
        Ok(Ok(_)) => ValidationOutcome::failed(
            ProbeErrorKind::Unknown,
            format!("{} returned no response content", provider.display_name),
        ),
        Ok(Err(err)) => classify_probe_failure(provider, candidate, &err.to_string()),
        Err(_) => classify_probe_failure(
            provider,
            candidate,
            &format!("probe timed out after {}s", PROBE_TIMEOUT.as_secs()),
        ),
    }
}

/// Map an error message onto the failure taxonomy.
///
/// Credential markers are checked before connectivity markers:
/// credential errors are the actionable majority case and must not be
/// masked by the generic network bucket.
fn classify_probe_failure(
    provider: &ProviderDescriptor,
    candidate: &str,
    error_text: &str,
) -> ValidationOutcome {
    let lowered = error_text.to_lowercase();

    if CREDENTIAL_MARKERS.iter().any(|m| lowered.contains(m)) {
        return ValidationOutcome::failed(
            ProbeErrorKind::InvalidCredential,
            format!(
                "{}: credential rejected by the provider",
                provider.display_name
            ),
        );
    }

    if CONNECTION_MARKERS.iter().any(|m| lowered.contains(m)) {
        // For endpoint-bearing providers the candidate is a non-secret
        // URL; echoing it is the one sanctioned exception to the
        // no-raw-value rule, since "which address did it try" is the
        // question the user needs answered.
        let message = match provider.kind {
            CredentialKind::Endpoint => format!(
                "{}: could not connect to {}",
                provider.display_name, candidate
            ),
            CredentialKind::ApiKey => {
                format!("{}: could not reach the provider", provider.display_name)
            }
        };
        return ValidationOutcome::failed(ProbeErrorKind::ConnectionFailure, message);
    }

    ValidationOutcome::failed(
        ProbeErrorKind::Unknown,
        format!("{}: {}", provider.display_name, truncate_message(error_text)),
    )
}

fn truncate_message(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count <= MAX_MESSAGE_CHARS {
        return text.to_string();
    }

    let truncated: String = text.chars().take(MAX_MESSAGE_CHARS).collect();
    format!(
        "{}... [truncated {} chars]",
        truncated,
        char_count - MAX_MESSAGE_CHARS
    )
}

//! Keywarden Core Library
//!
//! This crate provides the core functionality for Keywarden: the
//! built-in provider registry, the env-file credential store, the
//! completion probe client, the validation engine, and the
//! configuration workflow that ties them together.

pub mod error;
pub mod mask;
pub mod probe;
pub mod registry;
pub mod store;
pub mod validate;
pub mod workflow;

// Re-export commonly used types
pub use error::{Error, Result};
pub use probe::{CompletionProbe, HttpProbeClient, ProbeRequest, ProbeResponse};
pub use registry::{CredentialKind, ProviderDescriptor, ProviderRegistry};
pub use store::EnvFileStore;
pub use validate::{ProbeErrorKind, ValidationOutcome};
pub use workflow::{ConfigManager, ProbeReport, ProviderStatus, Session, SessionEvent, SessionState};

//! End-to-end workflow scenarios against a scripted probe.
//!
//! These tests drive the configuration manager exactly the way the
//! interactive menu and the batch mode do, with the network replaced
//! by a scripted probe double.

use async_trait::async_trait;
use keywarden_core::error::{Error, Result};
use keywarden_core::probe::{CompletionProbe, ProbeRequest, ProbeResponse};
use keywarden_core::registry::ProviderRegistry;
use keywarden_core::store::EnvFileStore;
use keywarden_core::validate::ProbeErrorKind;
use keywarden_core::workflow::manager::ConfigManager;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tempfile::{TempDir, tempdir};

/// What the scripted probe answers for one provider.
enum Script {
    Reply(&'static str),
    Fail(&'static str),
}

/// Call log shared between a probe double and the test body.
type CallLog = Arc<Mutex<Vec<(String, String)>>>;

/// Probe double scripted per provider id; records (provider,
/// credential) for every call.
struct ScriptedProbe {
    scripts: HashMap<&'static str, Script>,
    calls: CallLog,
}

impl ScriptedProbe {
    fn new(scripts: Vec<(&'static str, Script)>) -> (Self, CallLog) {
        let calls = CallLog::default();
        let probe = Self {
            scripts: scripts.into_iter().collect(),
            calls: calls.clone(),
        };
        (probe, calls)
    }
}

#[async_trait]
impl CompletionProbe for ScriptedProbe {
    async fn complete(&self, request: &ProbeRequest) -> Result<ProbeResponse> {
        self.calls
            .lock()
            .unwrap()
            .push((request.provider_id.clone(), request.credential.clone()));

        match self.scripts.get(request.provider_id.as_str()) {
            Some(Script::Reply(text)) => Ok(ProbeResponse {
                choices: vec![text.to_string()],
            }),
            Some(Script::Fail(message)) => Err(Error::probe_with_provider(
                message.to_string(),
                &request.provider_id,
            )),
            None => Err(Error::probe_with_provider(
                "no script for provider",
                &request.provider_id,
            )),
        }
    }
}

fn manager_with(
    scripts: Vec<(&'static str, Script)>,
) -> (ConfigManager<ScriptedProbe>, CallLog, TempDir) {
    let dir = tempdir().unwrap();
    let store = EnvFileStore::load_or_create(dir.path().join(".env")).unwrap();
    let (probe, calls) = ScriptedProbe::new(scripts);
    let manager = ConfigManager::new(ProviderRegistry::builtin(), store, probe);
    (manager, calls, dir)
}

/// A syntactically valid but rejected key leaves the store untouched.
#[tokio::test]
async fn rejected_key_classifies_as_invalid_credential_and_stores_nothing() {
    let (manager, _calls, _dir) = manager_with(vec![(
        "openai",
        Script::Fail("API error (status 401 Unauthorized): invalid key"),
    )]);
    let openai = manager.registry().get("openai").unwrap().clone();

    let outcome = manager
        .validate_candidate(&openai, "sk-looks-plausible-but-rejected")
        .await;

    assert!(!outcome.success);
    assert_eq!(outcome.error_kind, Some(ProbeErrorKind::InvalidCredential));
    // Validation alone never persists anything.
    assert!(manager.store().get("OPENAI_API_KEY").is_none());
}

/// A refused local endpoint reports the attempted URL; a declined
/// override leaves the store unchanged.
#[tokio::test]
async fn refused_endpoint_echoes_url_and_discard_keeps_store_unchanged() {
    let (manager, _calls, _dir) = manager_with(vec![(
        "ollama",
        Script::Fail("request failed: tcp connect error: Connection refused"),
    )]);
    let ollama = manager.registry().get("ollama").unwrap().clone();

    let outcome = manager
        .validate_candidate(&ollama, "http://localhost:11434")
        .await;

    assert_eq!(outcome.error_kind, Some(ProbeErrorKind::ConnectionFailure));
    assert!(outcome.message.contains("http://localhost:11434"));

    // User declines the override: nothing was written.
    assert!(manager.store().get("OLLAMA_BASE_URL").is_none());
}

/// A working key validates, persists exactly once, and a fresh handle
/// observes it unchanged.
#[tokio::test]
async fn working_key_saves_and_survives_reload() {
    let (mut manager, calls, dir) = manager_with(vec![("groq", Script::Reply("OK"))]);
    let groq = manager.registry().get("groq").unwrap().clone();

    let outcome = manager.validate_candidate(&groq, "gsk_live_key_abcdef").await;
    assert!(outcome.success);
    assert_eq!(calls.lock().unwrap().len(), 1);

    manager.save(&groq, "gsk_live_key_abcdef").unwrap();
    assert_eq!(
        manager.store().get("GROQ_API_KEY"),
        Some("gsk_live_key_abcdef")
    );

    let reloaded = EnvFileStore::load_or_create(dir.path().join(".env")).unwrap();
    assert_eq!(reloaded.get("GROQ_API_KEY"), Some("gsk_live_key_abcdef"));
}

/// Batch testing reports exactly the configured providers with correct
/// tags, runs one probe each in registry order, and never mutates the
/// store.
#[tokio::test]
async fn batch_test_reports_configured_providers_without_mutation() {
    let (mut manager, calls, dir) = manager_with(vec![
        ("groq", Script::Reply("OK")),
        (
            "anthropic",
            Script::Fail("API error (status 401): authentication_error"),
        ),
    ]);
    let groq = manager.registry().get("groq").unwrap().clone();
    let anthropic = manager.registry().get("anthropic").unwrap().clone();

    manager.save(&groq, "gsk_live_key_abcdef").unwrap();
    manager.save(&anthropic, "sk-ant-rejected-key").unwrap();
    let before = std::fs::read_to_string(dir.path().join(".env")).unwrap();
    calls.lock().unwrap().clear();

    let reports = manager.test_all().await;

    assert_eq!(reports.len(), 2);
    let groq_report = reports.iter().find(|r| r.provider_id == "groq").unwrap();
    assert!(groq_report.outcome.success);
    let anthropic_report = reports
        .iter()
        .find(|r| r.provider_id == "anthropic")
        .unwrap();
    assert!(!anthropic_report.outcome.success);
    assert_eq!(
        anthropic_report.outcome.error_kind,
        Some(ProbeErrorKind::InvalidCredential)
    );

    // One probe per configured provider, in registry order, each
    // carrying its own stored credential: no cross-contamination.
    let seen = calls.lock().unwrap();
    assert_eq!(
        seen.as_slice(),
        [
            ("anthropic".to_string(), "sk-ant-rejected-key".to_string()),
            ("groq".to_string(), "gsk_live_key_abcdef".to_string()),
        ]
    );
    drop(seen);

    let after = std::fs::read_to_string(dir.path().join(".env")).unwrap();
    assert_eq!(before, after);
}

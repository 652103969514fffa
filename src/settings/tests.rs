// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rstest::rstest;

use super::{
    ApplySession, CaptureSession, Finalizer, HandlerError, LaunchedApplication, RegistryError,
    SessionError, SessionState, SettingHandler, SettingsContext, SettingsManager,
    SettingsRegistry,
};
use crate::model::{PreferenceKey, Preferences, Setting, Value};
use crate::store::{DefaultsStore, MemoryDefaults};

const TEST_SOLUTIONS: &str = r#"[
  {
    "id": "test",
    "settings": [
      { "name": "a", "type": "boolean", "default": false, "handler": { "type": "client" },
        "finalizer": { "type": "client", "name": "count" } },
      { "name": "b", "type": "boolean", "default": false, "handler": { "type": "client" },
        "finalizer": { "type": "client", "name": "count" } },
      { "name": "c", "type": "boolean", "default": false, "handler": { "type": "client" },
        "finalizer": { "type": "client", "name": "count" } },
      { "name": "d", "type": "integer", "default": 3, "handler": { "type": "client" } },
      { "name": "e", "type": "string", "default": "x", "handler": { "type": "client" } },
      { "name": "slow", "type": "boolean", "handler": { "type": "client" } }
    ]
  }
]"#;

const LOCAL_SOLUTIONS: &str = r#"[
  {
    "id": "local",
    "settings": [
      { "name": "flag", "type": "boolean", "default": false,
        "handler": { "type": "read_local_write_remote", "domain": "dom", "key": "flag" },
        "finalizer": { "type": "flush_store", "domain": "dom" } },
      { "name": "shake", "type": "boolean", "default": true,
        "handler": { "type": "read_local_write_remote", "domain": "dom", "key": "noShake",
                     "transform": "negate_boolean" } },
      { "name": "size", "type": "double", "default": 1.0,
        "handler": { "type": "read_local_write_remote", "domain": "dom", "key": "size" },
        "finalizer": { "type": "flush_store", "domain": "other" } },
      { "name": "count", "type": "integer",
        "handler": { "type": "read_local_write_remote", "domain": "dom", "key": "count" } },
      { "name": "label", "type": "string",
        "handler": { "type": "read_local_write_remote", "domain": "dom", "key": "label" } },
      { "name": "elsewhere", "type": "boolean",
        "handler": { "type": "read_local_write_remote", "domain": "missing", "key": "x" } },
      { "name": "elsewhere.label", "type": "string",
        "handler": { "type": "read_local_write_remote", "domain": "missing", "key": "y" } }
    ]
  }
]"#;

fn key(solution: &str, preference: &str) -> PreferenceKey {
    PreferenceKey::parse(solution, preference).expect("key")
}

#[derive(Default)]
struct FakeBackend {
    values: Mutex<HashMap<String, Value>>,
    applied: Mutex<Vec<String>>,
}

impl FakeBackend {
    fn set(&self, name: &str, value: Value) {
        self.values.lock().expect("values").insert(name.to_owned(), value);
    }

    fn applied(&self) -> Vec<String> {
        self.applied.lock().expect("applied").clone()
    }
}

struct FakeHandler {
    backend: Arc<FakeBackend>,
    name: String,
    fail: bool,
}

#[async_trait]
impl SettingHandler for FakeHandler {
    async fn apply(&self, value: &Value) -> Result<(), HandlerError> {
        if self.name == "slow" {
            tokio::time::sleep(Duration::from_secs(10)).await;
        }
        if self.fail {
            return Err(HandlerError::Verification {
                control: self.name.clone(),
            });
        }
        self.backend.set(&self.name, value.clone());
        self.backend.applied.lock().expect("applied").push(self.name.clone());
        Ok(())
    }

    async fn read(&self) -> Result<Value, HandlerError> {
        self.backend
            .values
            .lock()
            .expect("values")
            .get(&self.name)
            .cloned()
            .ok_or_else(|| HandlerError::MissingValue {
                domain: "fake".to_owned(),
                key: self.name.clone(),
            })
    }
}

#[derive(Default)]
struct CountingFinalizer {
    runs: AtomicUsize,
}

#[async_trait]
impl Finalizer for CountingFinalizer {
    async fn run(&self) -> Result<(), HandlerError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Appends its name to a shared log when run.
struct RecordingFinalizer {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Finalizer for RecordingFinalizer {
    async fn run(&self) -> Result<(), HandlerError> {
        self.log.lock().expect("log").push(self.name.to_owned());
        Ok(())
    }
}

/// Records lifecycle calls into the same log as the finalizers.
struct FakeApplication {
    launched: bool,
    log: Arc<Mutex<Vec<String>>>,
}

impl LaunchedApplication for FakeApplication {
    fn forget_launch(&self) {
        self.log.lock().expect("log").push("forget".to_owned());
    }

    fn close_if_launched(&self) -> Result<bool, HandlerError> {
        if self.launched {
            self.log.lock().expect("log").push("close".to_owned());
        }
        Ok(self.launched)
    }
}

const ORDERED_SOLUTIONS: &str = r#"[
  {
    "id": "order",
    "settings": [
      { "name": "x", "type": "boolean", "handler": { "type": "client" },
        "finalizer": { "type": "client", "name": "first" } },
      { "name": "y", "type": "boolean", "handler": { "type": "client" },
        "finalizer": { "type": "client", "name": "second" } },
      { "name": "z", "type": "boolean", "handler": { "type": "client" },
        "finalizer": { "type": "client", "name": "first" } }
    ]
  }
]"#;

fn ordered_context(log: &Arc<Mutex<Vec<String>>>, launched: bool) -> SettingsContext {
    let registry = SettingsRegistry::from_json_str(ORDERED_SOLUTIONS).expect("registry");
    let backend = Arc::new(FakeBackend::default());
    let mut builder = SettingsContext::builder(registry, Arc::new(MemoryDefaults::new()));
    for name in ["x", "y", "z"] {
        let backend = Arc::clone(&backend);
        builder = builder.client_handler(key("order", name), move |setting: &Setting| {
            Box::new(FakeHandler {
                backend: Arc::clone(&backend),
                name: setting.name().to_string(),
                fail: false,
            }) as Box<dyn SettingHandler>
        });
    }
    for name in ["first", "second"] {
        builder = builder.finalizer(
            name,
            Arc::new(RecordingFinalizer {
                name,
                log: Arc::clone(log),
            }),
        );
    }
    builder
        .application(Arc::new(FakeApplication {
            launched,
            log: Arc::clone(log),
        }))
        .build()
}

struct Harness {
    backend: Arc<FakeBackend>,
    finalizer: Arc<CountingFinalizer>,
    context: SettingsContext,
}

fn harness(failing: &'static [&'static str]) -> Harness {
    let backend = Arc::new(FakeBackend::default());
    let finalizer = Arc::new(CountingFinalizer::default());
    let registry = SettingsRegistry::from_json_str(TEST_SOLUTIONS).expect("registry");

    let mut builder = SettingsContext::builder(registry, Arc::new(MemoryDefaults::new()));
    for name in ["a", "b", "c", "d", "e", "slow"] {
        let backend = Arc::clone(&backend);
        let fail = failing.contains(&name);
        builder = builder.client_handler(key("test", name), move |setting: &Setting| {
            Box::new(FakeHandler {
                backend: Arc::clone(&backend),
                name: setting.name().to_string(),
                fail,
            }) as Box<dyn SettingHandler>
        });
    }
    let context = builder.finalizer("count", finalizer.clone()).build();

    Harness {
        backend,
        finalizer,
        context,
    }
}

#[tokio::test]
async fn shared_finalizer_runs_once_per_session() {
    let h = harness(&[]);
    let mut session = ApplySession::new(
        &h.context,
        vec![
            (key("test", "a"), Value::Bool(true)),
            (key("test", "b"), Value::Bool(true)),
            (key("test", "c"), Value::Bool(true)),
        ],
    );
    session.run().await.expect("run");

    assert_eq!(h.finalizer.runs.load(Ordering::SeqCst), 1);
    assert_eq!(session.state(), SessionState::Finished);
}

#[tokio::test]
async fn finalizers_run_last_registered_first() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let context = ordered_context(&log, false);
    let mut session = ApplySession::new(
        &context,
        vec![
            (key("order", "x"), Value::Bool(true)),
            (key("order", "y"), Value::Bool(true)),
            (key("order", "z"), Value::Bool(true)),
        ],
    );
    session.run().await.expect("run");

    assert_eq!(*log.lock().expect("log"), vec!["forget", "second", "first"]);
}

#[rstest]
#[case(true, vec!["forget", "second", "first", "close"])]
#[case(false, vec!["forget", "second", "first"])]
#[tokio::test]
async fn launched_applications_close_after_the_finalizers(
    #[case] launched: bool,
    #[case] expected: Vec<&str>,
) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let context = ordered_context(&log, launched);
    let mut session = ApplySession::new(
        &context,
        vec![
            (key("order", "x"), Value::Bool(true)),
            (key("order", "y"), Value::Bool(true)),
        ],
    );
    session.run().await.expect("run");

    assert_eq!(*log.lock().expect("log"), expected);
}

#[tokio::test]
async fn one_failing_setting_does_not_block_the_batch() {
    let h = harness(&["c"]);
    let pairs = vec![
        (key("test", "a"), Value::Bool(true)),
        (key("test", "b"), Value::Bool(true)),
        (key("test", "c"), Value::Bool(true)),
        (key("test", "d"), Value::Integer(7)),
        (key("test", "e"), Value::String("y".to_owned())),
    ];
    let mut session = ApplySession::new(&h.context, pairs);
    let results = session.run().await.expect("run").clone();

    assert_eq!(results.len(), 5);
    assert_eq!(results[&key("test", "a")], true);
    assert_eq!(results[&key("test", "b")], true);
    assert_eq!(results[&key("test", "c")], false);
    assert_eq!(results[&key("test", "d")], true);
    assert_eq!(results[&key("test", "e")], true);
    assert_eq!(h.backend.applied(), vec!["a", "b", "d", "e"]);
    assert_eq!(h.finalizer.runs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unresolvable_keys_are_absent_from_results() {
    let h = harness(&[]);
    let mut session = ApplySession::new(
        &h.context,
        vec![
            (key("test", "nope"), Value::Bool(true)),
            (key("other", "a"), Value::Bool(true)),
            (key("test", "a"), Value::Bool(true)),
        ],
    );
    let results = session.run().await.expect("run");
    assert_eq!(results.len(), 1);
    assert!(results.contains_key(&key("test", "a")));
}

#[tokio::test]
async fn mistyped_values_fail_without_reaching_the_handler() {
    let h = harness(&[]);
    let mut session = ApplySession::new(
        &h.context,
        vec![
            (key("test", "a"), Value::Integer(1)),
            (key("test", "d"), Value::String("3".to_owned())),
        ],
    );
    let results = session.run().await.expect("run").clone();
    assert_eq!(results[&key("test", "a")], false);
    assert_eq!(results[&key("test", "d")], false);
    assert!(h.backend.applied().is_empty());
}

#[tokio::test]
async fn defaults_are_added_only_for_missing_keys() {
    let h = harness(&[]);
    let mut session = ApplySession::new(&h.context, vec![(key("test", "d"), Value::Integer(9))]);
    session.add_first(key("test", "a"), Value::Bool(true));
    session.add_default_values_from_all_solutions();

    let keys: Vec<String> = session.pairs().iter().map(|(key, _)| key.to_string()).collect();
    assert_eq!(keys, vec!["test.a", "test.d", "test.b", "test.c", "test.e"]);
    assert_eq!(session.pairs()[1].1, Value::Integer(9));
}

#[tokio::test]
async fn a_session_runs_only_once() {
    let h = harness(&[]);
    let mut session = ApplySession::new(&h.context, vec![(key("test", "a"), Value::Bool(true))]);
    session.run().await.expect("first run");
    assert_eq!(session.run().await.err(), Some(SessionError::AlreadyFinished));
}

#[tokio::test(start_paused = true)]
async fn an_abandoned_run_leaves_the_session_running() {
    let h = harness(&[]);
    let mut session =
        ApplySession::new(&h.context, vec![(key("test", "slow"), Value::Bool(true))]);

    let abandoned = tokio::time::timeout(Duration::from_millis(10), session.run()).await;
    assert!(abandoned.is_err());
    assert_eq!(session.state(), SessionState::Running);
    assert_eq!(session.run().await.err(), Some(SessionError::AlreadyRunning));
}

#[rstest]
#[case(false, None)]
#[case(true, Some(Value::Bool(false)))]
#[tokio::test]
async fn capture_elides_default_values_unless_asked(
    #[case] capture_defaults: bool,
    #[case] expected: Option<Value>,
) {
    let h = harness(&[]);
    h.backend.set("a", Value::Bool(false));
    h.backend.set("d", Value::Integer(4));

    let mut seeded = Preferences::new();
    seeded.set(&key("test", "a"), Value::Bool(true));

    let mut session = CaptureSession::with_preferences(&h.context, seeded)
        .capture_default_values(capture_defaults);
    session.add(key("test", "a"));
    session.add(key("test", "d"));
    let captured = session.run().await.expect("run");

    assert_eq!(captured.get(&key("test", "a")), expected.as_ref());
    assert_eq!(captured.get(&key("test", "d")), Some(&Value::Integer(4)));
}

#[tokio::test]
async fn capture_skips_failed_reads() {
    let h = harness(&[]);
    h.backend.set("b", Value::Bool(true));
    let mut session = CaptureSession::new(&h.context);
    session.add_all_solutions();
    let captured = session.run().await.expect("run");
    assert_eq!(captured.key_values(), vec![(key("test", "b"), Value::Bool(true))]);
}

#[tokio::test]
async fn applied_value_reads_back() {
    let h = harness(&[]);
    let manager = SettingsManager::new(h.context);
    assert!(manager.apply(key("test", "a"), Value::Bool(true)).await);
    assert_eq!(manager.capture(key("test", "a")).await, Some(Value::Bool(true)));
    assert!(!manager.apply(key("test", "missing"), Value::Bool(true)).await);
}

fn local_context(store: Arc<MemoryDefaults>) -> SettingsContext {
    let registry = SettingsRegistry::from_json_str(LOCAL_SOLUTIONS).expect("registry");
    SettingsContext::builder(registry, store).build()
}

#[rstest]
#[case("flag", Some(Value::Bool(false)))]
#[case("shake", Some(Value::Bool(true)))]
#[case("size", Some(Value::Double(0.0)))]
#[case("count", Some(Value::Integer(0)))]
#[case("label", None)]
#[case("elsewhere", Some(Value::Bool(false)))]
#[case("elsewhere.label", None)]
#[tokio::test]
async fn missing_local_values_read_as_zero_except_strings(
    #[case] name: &str,
    #[case] expected: Option<Value>,
) {
    let store = Arc::new(MemoryDefaults::new().with_domain("dom"));
    let manager = SettingsManager::new(local_context(store));
    assert_eq!(manager.capture(key("local", name)).await, expected);
}

#[tokio::test]
async fn local_reads_convert_stored_representations() {
    let store = Arc::new(
        MemoryDefaults::new()
            .with_value("dom", "flag", Value::Integer(1))
            .with_value("dom", "noShake", Value::Bool(true))
            .with_value("dom", "size", Value::Integer(2))
            .with_value("dom", "count", Value::String("3".to_owned())),
    );
    let manager = SettingsManager::new(local_context(store));
    assert_eq!(manager.capture(key("local", "flag")).await, Some(Value::Bool(true)));
    assert_eq!(manager.capture(key("local", "shake")).await, Some(Value::Bool(false)));
    assert_eq!(manager.capture(key("local", "size")).await, Some(Value::Double(2.0)));
    assert_eq!(manager.capture(key("local", "count")).await, None);
}

#[tokio::test]
async fn local_writes_without_adapter_fail_and_still_flush_once_per_domain() {
    let store = Arc::new(MemoryDefaults::new().with_domain("dom"));
    let context = local_context(Arc::clone(&store));
    let mut session = ApplySession::new(
        &context,
        vec![
            (key("local", "flag"), Value::Bool(true)),
            (key("local", "size"), Value::Double(1.5)),
            (key("local", "flag"), Value::Bool(false)),
        ],
    );
    let results = session.run().await.expect("run").clone();

    assert_eq!(results[&key("local", "flag")], false);
    assert_eq!(results[&key("local", "size")], false);
    assert_eq!(store.flushes(), vec!["other", "dom"]);
    assert_eq!(store.read("dom", "flag").expect("read"), None);
}

#[test]
fn unknown_handler_type_fails_the_whole_document() {
    let raw = r#"[{ "id": "x", "settings": [
        { "name": "ok", "type": "boolean", "handler": { "type": "client" } },
        { "name": "bad", "type": "boolean", "handler": { "type": "telepathy" } }
    ]}]"#;
    let err = SettingsRegistry::from_json_str(raw).expect_err("unknown handler");
    assert!(matches!(err, RegistryError::Json { .. }));
}

#[rstest]
#[case(r#"[{ "id": "x", "settings": [
    { "name": "n", "type": "integer", "default": "1", "handler": { "type": "client" } }
] }]"#)]
#[case(r#"[{ "id": "x", "settings": [
    { "name": "n", "type": "boolean", "handler": { "type": "client" },
      "finalizer": { "type": "reboot" } }
] }]"#)]
#[case(r#"[{ "id": "x y", "settings": [] }]"#)]
#[case(r#"[{ "id": "x", "settings": [
    { "name": "n", "type": "boolean", "handler": { "type": "client" } },
    { "name": "n", "type": "boolean", "handler": { "type": "client" } }
] }]"#)]
fn invalid_documents_leave_the_registry_unchanged(#[case] raw: &str) {
    let mut registry = SettingsRegistry::from_json_str(TEST_SOLUTIONS).expect("registry");
    let before = registry.clone();
    assert!(registry.extend_from_json_str(raw).is_err());
    assert_eq!(registry, before);
}

#[test]
fn extending_replaces_identical_keys_and_keeps_the_rest() {
    let mut registry = SettingsRegistry::from_json_str(TEST_SOLUTIONS).expect("registry");
    registry
        .extend_from_json_str(
            r#"[
              { "id": "test", "settings": [
                { "name": "d", "type": "integer", "default": 5, "handler": { "type": "client" } },
                { "name": "f", "type": "double", "default": 2, "handler": { "type": "client" } }
              ] },
              { "id": "more", "settings": [] }
            ]"#,
        )
        .expect("extend");

    let d = registry.setting(&key("test", "d")).expect("d");
    assert_eq!(d.default_value(), Some(&Value::Integer(5)));
    let f = registry.setting(&key("test", "f")).expect("f");
    assert_eq!(f.default_value(), Some(&Value::Double(2.0)));
    assert!(registry.setting(&key("test", "a")).is_some());
    assert_eq!(registry.solutions().len(), 2);
    assert_eq!(registry.len(), 7);
    assert_eq!(
        registry.keys().last().map(ToString::to_string).as_deref(),
        Some("test.f")
    );
}

#[test]
fn builtin_document_loads() {
    let registry = super::builtin_registry().expect("builtin");
    assert!(registry
        .setting(&key("com.apple.macos.display", "contrast.enabled"))
        .is_some());
    assert!(registry.setting(&key("com.apple.macos.zoom", "style")).is_some());
    assert!(registry
        .setting(&key("com.apple.macos.voiceover", "enabled"))
        .is_some());
}

#[test]
fn schema_mentions_handler_tags() {
    let schema = super::json_schema().expect("schema");
    assert!(schema.contains("read_local_write_remote"));
    assert!(schema.contains("flush_store"));
}

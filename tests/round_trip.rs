// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tiller::automation::register_builtin_write_adapters;
use tiller::config::AutomationConfig;
use tiller::model::{PreferenceKey, Value};
use tiller::nav::SettingsApp;
use tiller::settings::{
    builtin_registry, ApplySession, CaptureSession, SettingsContext, SettingsManager,
};
use tiller::sim::{SimulatedSettingsApp, SimulatorOptions};
use tiller::store::{DefaultsStore, JsonFileDefaults, MemoryDefaults};

const UA: &str = "com.apple.universalaccess";
const MA: &str = "com.apple.mediaaccessibility";

fn key(solution: &str, preference: &str) -> PreferenceKey {
    PreferenceKey::parse(solution, preference).expect("key")
}

fn context(store: Arc<dyn DefaultsStore>) -> SettingsContext {
    let sim = SimulatedSettingsApp::new(Arc::clone(&store), SimulatorOptions::default())
        .expect("simulator");
    let app = SettingsApp::new(Arc::new(sim), AutomationConfig::default());
    let builder = SettingsContext::builder(builtin_registry().expect("registry"), store);
    register_builtin_write_adapters(builder, &app).expect("adapters").build()
}

fn sorted(mut pairs: Vec<(PreferenceKey, Value)>) -> Vec<(PreferenceKey, Value)> {
    pairs.sort_by(|(a, _), (b, _)| a.cmp(b));
    pairs
}

fn changes() -> Vec<(PreferenceKey, Value)> {
    vec![
        (key("com.apple.macos.display", "reduce.motion"), Value::Bool(true)),
        (key("com.apple.macos.display", "cursor.size"), Value::Double(2.5)),
        (key("com.apple.macos.display", "colorfilter.enabled"), Value::Bool(true)),
        (key("com.apple.macos.display", "colorfilter.type"), Value::Integer(4)),
        (key("com.apple.macos.zoom", "style"), Value::Integer(2)),
    ]
}

#[tokio::test(start_paused = true)]
async fn applied_values_are_flushed_once_per_domain_and_captured_back() {
    let store = Arc::new(MemoryDefaults::new());
    let context = context(store.clone());

    let mut apply = ApplySession::new(&context, changes());
    let results = apply.run().await.expect("apply").clone();
    assert_eq!(results.len(), 5);
    assert!(results.values().all(|applied| *applied), "{results:?}");
    assert_eq!(store.flushes(), vec![MA.to_owned(), UA.to_owned()]);
    assert_eq!(store.read(UA, "closeViewZoomMode").expect("read"), Some(Value::Integer(2)));

    let mut capture = CaptureSession::new(&context);
    capture.add_all_solutions();
    let captured = capture.run().await.expect("capture").key_values();
    assert_eq!(captured, sorted(changes()));
}

#[tokio::test(start_paused = true)]
async fn capture_with_defaults_reports_every_builtin_setting() {
    let store = Arc::new(MemoryDefaults::new());
    let manager = SettingsManager::new(context(store));

    let keys = manager.context().registry().keys();
    let captured = manager.capture_all(keys.clone()).await;
    assert_eq!(captured.len(), keys.len());
    assert_eq!(
        captured.get(&key("com.apple.macos.display", "cursor.shake")),
        Some(&Value::Bool(true))
    );
    assert_eq!(
        captured.get(&key("com.apple.macos.display", "colorfilter.intensity")),
        Some(&Value::Double(1.0))
    );
}

#[tokio::test(start_paused = true)]
async fn unknown_keys_are_reported_as_missing_without_blocking_the_batch() {
    let store = Arc::new(MemoryDefaults::new());
    let manager = SettingsManager::new(context(store));

    let unknown = key("com.apple.macos.display", "nonexistent");
    let motion = key("com.apple.macos.display", "reduce.motion");
    let results = manager
        .apply_all(vec![(unknown.clone(), Value::Bool(true)), (motion.clone(), Value::Bool(true))])
        .await;

    assert_eq!(results.get(&unknown), None);
    assert_eq!(results.get(&motion), Some(&true));
    assert_eq!(manager.capture(motion).await, Some(Value::Bool(true)));
}

#[tokio::test(start_paused = true)]
async fn json_store_survives_a_restart() {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
    let dir: PathBuf =
        env::temp_dir().join(format!("tiller-round-trip-{}-{nanos}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join("defaults.json");

    {
        let store = Arc::new(JsonFileDefaults::open(&path).expect("open"));
        let manager = SettingsManager::new(context(store));
        let results = manager.apply_all(changes()).await;
        assert!(results.values().all(|applied| *applied), "{results:?}");
    }

    let store = Arc::new(JsonFileDefaults::open(&path).expect("reopen"));
    assert_eq!(
        store.read(UA, "mouseDriverCursorSize").expect("read"),
        Some(Value::Double(2.5))
    );
    let context = context(store);
    let mut capture = CaptureSession::new(&context);
    capture.add_all_solutions();
    let captured = capture.run().await.expect("capture").key_values();
    assert_eq!(captured, sorted(changes()));

    let _ = std::fs::remove_dir_all(&dir);
}

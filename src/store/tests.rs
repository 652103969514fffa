// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rstest::rstest;

use super::{DefaultsStore, JsonFileDefaults, MemoryDefaults, StoreError, WriteDurability};
use crate::model::Value;

static TEMP_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("tiller-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).expect("create temp dir");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

#[test]
fn memory_store_distinguishes_missing_key_from_unknown_domain() {
    let store = MemoryDefaults::new().with_domain("com.example.a");

    assert_eq!(store.read("com.example.a", "missing").expect("read"), None);
    let err = store.read("com.example.b", "missing").expect_err("unknown domain");
    assert!(matches!(err, StoreError::UnknownDomain { domain } if domain == "com.example.b"));
}

#[test]
fn memory_store_records_flushes_in_order() {
    let store = MemoryDefaults::new()
        .with_value("a", "x", Value::Bool(true))
        .with_value("b", "y", Value::Integer(3));
    store.flush("b").expect("flush");
    store.flush_all().expect("flush all");
    assert_eq!(store.flushes(), vec!["b", "a", "b"]);
}

#[rstest]
#[case(WriteDurability::BestEffort)]
#[case(WriteDurability::Durable)]
fn json_store_persists_on_flush(#[case] durability: WriteDurability) {
    let tmp = TempDir::new("json-store");
    let path = tmp.path().join("nested").join("defaults.json");

    let store = JsonFileDefaults::open(&path)
        .expect("open")
        .with_durability(durability);
    store
        .write("com.apple.universalaccess", "reduceMotion", Value::Bool(true))
        .expect("write");
    store
        .write("com.apple.universalaccess", "mouseDriverCursorSize", Value::Double(1.5))
        .expect("write");
    assert!(!path.exists());

    store.flush("com.apple.universalaccess").expect("flush");
    assert!(path.exists());

    let reopened = JsonFileDefaults::open(&path).expect("reopen");
    assert_eq!(
        reopened
            .read("com.apple.universalaccess", "reduceMotion")
            .expect("read"),
        Some(Value::Bool(true))
    );
    assert_eq!(
        reopened
            .read("com.apple.universalaccess", "mouseDriverCursorSize")
            .expect("read"),
        Some(Value::Double(1.5))
    );

    let leftovers: Vec<_> = std::fs::read_dir(path.parent().expect("parent"))
        .expect("read dir")
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().starts_with(".tiller.tmp."))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn json_store_flush_of_clean_domain_writes_nothing() {
    let tmp = TempDir::new("json-clean");
    let path = tmp.path().join("defaults.json");
    let store = JsonFileDefaults::open(&path).expect("open");
    store.flush("com.example").expect("flush");
    assert!(!path.exists());
}

#[test]
fn json_store_rejects_malformed_document() {
    let tmp = TempDir::new("json-bad");
    let path = tmp.path().join("defaults.json");
    std::fs::write(&path, b"[1, 2, 3]").expect("seed");
    let err = JsonFileDefaults::open(&path).expect_err("malformed");
    assert!(matches!(err, StoreError::Json { .. }));
}

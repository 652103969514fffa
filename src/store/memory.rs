// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::{DefaultsStore, StoreError};
use crate::model::Value;

#[derive(Debug, Default)]
struct State {
    domains: BTreeMap<String, BTreeMap<String, Value>>,
    flushes: Vec<String>,
}

/// An in-memory store; flushing only records that it happened.
#[derive(Debug, Default)]
pub struct MemoryDefaults {
    state: Mutex<State>,
}

impl MemoryDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_domain(self, domain: impl Into<String>) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.domains.entry(domain.into()).or_default();
        }
        self
    }

    pub fn with_value(self, domain: impl Into<String>, key: impl Into<String>, value: Value) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state
                .domains
                .entry(domain.into())
                .or_default()
                .insert(key.into(), value);
        }
        self
    }

    /// Domains in the order they were flushed, repeats included.
    pub fn flushes(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|state| state.flushes.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl DefaultsStore for MemoryDefaults {
    fn read(&self, domain: &str, key: &str) -> Result<Option<Value>, StoreError> {
        let state = self.lock()?;
        let values = state
            .domains
            .get(domain)
            .ok_or_else(|| StoreError::UnknownDomain {
                domain: domain.to_owned(),
            })?;
        Ok(values.get(key).cloned())
    }

    fn write(&self, domain: &str, key: &str, value: Value) -> Result<(), StoreError> {
        self.lock()?
            .domains
            .entry(domain.to_owned())
            .or_default()
            .insert(key.to_owned(), value);
        Ok(())
    }

    fn flush(&self, domain: &str) -> Result<(), StoreError> {
        self.lock()?.flushes.push(domain.to_owned());
        Ok(())
    }

    fn domains(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.lock()?.domains.keys().cloned().collect())
    }
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, info, warn};

use super::context::SettingsContext;
use super::session::{apply_typed, SessionError, SessionState};
use crate::model::{FinalizerDescriptor, PreferenceKey, Preferences, Value};

/// Writes a batch of values, one at a time and in order.
///
/// A failing setting never stops the batch. `results` is the authoritative record: a key
/// without an entry could not even be resolved and counts as failed.
pub struct ApplySession<'c> {
    context: &'c SettingsContext,
    pairs: Vec<(PreferenceKey, Value)>,
    results: BTreeMap<PreferenceKey, bool>,
    state: SessionState,
}

impl<'c> ApplySession<'c> {
    pub fn new(context: &'c SettingsContext, pairs: Vec<(PreferenceKey, Value)>) -> Self {
        Self {
            context,
            pairs,
            results: BTreeMap::new(),
            state: SessionState::Idle,
        }
    }

    pub fn from_preferences(context: &'c SettingsContext, preferences: &Preferences) -> Self {
        Self::new(context, preferences.key_values())
    }

    pub fn add(&mut self, key: PreferenceKey, value: Value) {
        self.pairs.push((key, value));
    }

    pub fn add_first(&mut self, key: PreferenceKey, value: Value) {
        self.pairs.insert(0, (key, value));
    }

    /// Appends the declared default of every known setting not already in the batch.
    pub fn add_default_values_from_all_solutions(&mut self) {
        let present: HashSet<PreferenceKey> =
            self.pairs.iter().map(|(key, _)| key.clone()).collect();
        for solution in self.context.registry().solutions() {
            for setting in solution.settings() {
                let key = PreferenceKey::new(solution.id().clone(), setting.name().clone());
                if present.contains(&key) {
                    continue;
                }
                if let Some(default) = setting.default_value() {
                    self.pairs.push((key, default.clone()));
                }
            }
        }
    }

    pub fn pairs(&self) -> &[(PreferenceKey, Value)] {
        &self.pairs
    }

    pub fn results(&self) -> &BTreeMap<PreferenceKey, bool> {
        &self.results
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Applies every pair, then runs each distinct finalizer once.
    ///
    /// Finalizers run last-registered first. Applications launched while applying are closed
    /// after the finalizers.
    pub async fn run(&mut self) -> Result<&BTreeMap<PreferenceKey, bool>, SessionError> {
        self.state.begin()?;
        info!(pairs = self.pairs.len(), "apply session started");

        let mut finalizers = self.finalizer_queue();
        for application in self.context.applications() {
            application.forget_launch();
        }

        // Drained from the back, so reversing keeps the original order.
        let mut queue: Vec<(PreferenceKey, Value)> = self.pairs.iter().rev().cloned().collect();
        while let Some((key, value)) = queue.pop() {
            let Some(setting) = self.context.setting(&key) else {
                warn!(%key, "no setting for key; skipping");
                continue;
            };
            let Some(handler) = self.context.create_handler(setting) else {
                warn!(%key, "no handler for setting; skipping");
                continue;
            };
            let applied = match apply_typed(setting, handler.as_ref(), value).await {
                Ok(()) => true,
                Err(err) => {
                    warn!(%key, error = %err, "failed to apply setting");
                    false
                }
            };
            debug!(%key, applied, "applied setting");
            self.results.insert(key, applied);
        }

        while let Some(descriptor) = finalizers.pop() {
            let name = descriptor.unique_representation();
            let Some(finalizer) = self.context.create_finalizer(&descriptor) else {
                warn!(finalizer = %name, "no finalizer registered; skipping");
                continue;
            };
            match finalizer.run().await {
                Ok(()) => debug!(finalizer = %name, "finalizer ran"),
                Err(err) => warn!(finalizer = %name, error = %err, "finalizer failed"),
            }
        }

        for application in self.context.applications() {
            match application.close_if_launched() {
                Ok(true) => info!("closed application launched by this session"),
                Ok(false) => {}
                Err(err) => warn!(error = %err, "failed to close launched application"),
            }
        }

        self.state = SessionState::Finished;
        let failed = self.results.values().filter(|applied| !**applied).count();
        info!(applied = self.results.len() - failed, failed, "apply session finished");
        Ok(&self.results)
    }

    // First occurrence decides a finalizer's position; the queue is drained from the back.
    fn finalizer_queue(&self) -> Vec<FinalizerDescriptor> {
        let mut seen = HashSet::new();
        let mut queue = Vec::new();
        for (key, _) in &self.pairs {
            let Some(descriptor) = self.context.setting(key).and_then(|setting| setting.finalizer())
            else {
                continue;
            };
            if seen.insert(descriptor.unique_representation()) {
                queue.push(descriptor.clone());
            }
        }
        queue
    }
}

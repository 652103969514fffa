// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use tracing::warn;

use super::apply::ApplySession;
use super::capture::CaptureSession;
use super::context::SettingsContext;
use crate::model::{PreferenceKey, Setting, Solution, Value};

/// One-call access to the settings subsystem; each call runs a fresh session.
pub struct SettingsManager {
    context: SettingsContext,
}

impl SettingsManager {
    pub fn new(context: SettingsContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &SettingsContext {
        &self.context
    }

    pub fn solutions(&self) -> &[Solution] {
        self.context.registry().solutions()
    }

    pub fn setting(&self, key: &PreferenceKey) -> Option<&Setting> {
        self.context.setting(key)
    }

    pub async fn apply(&self, key: PreferenceKey, value: Value) -> bool {
        let results = self.apply_all(vec![(key.clone(), value)]).await;
        results.get(&key).copied().unwrap_or(false)
    }

    pub async fn apply_all(
        &self,
        pairs: Vec<(PreferenceKey, Value)>,
    ) -> BTreeMap<PreferenceKey, bool> {
        let mut session = ApplySession::new(&self.context, pairs);
        match session.run().await {
            Ok(results) => results.clone(),
            Err(err) => {
                warn!(error = %err, "apply session rejected");
                BTreeMap::new()
            }
        }
    }

    /// Captures one value, defaults included.
    pub async fn capture(&self, key: PreferenceKey) -> Option<Value> {
        self.capture_all(vec![key.clone()]).await.remove(&key)
    }

    pub async fn capture_all(&self, keys: Vec<PreferenceKey>) -> BTreeMap<PreferenceKey, Value> {
        let mut session = CaptureSession::new(&self.context).capture_default_values(true);
        for key in keys {
            session.add(key);
        }
        if let Err(err) = session.run().await {
            warn!(error = %err, "capture session rejected");
        }
        session.into_preferences().key_values().into_iter().collect()
    }
}

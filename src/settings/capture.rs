// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use tracing::{debug, info, warn};

use super::context::SettingsContext;
use super::session::{read_typed, SessionError, SessionState};
use crate::model::{PreferenceKey, Preferences};

/// Reads a batch of settings into a [`Preferences`] snapshot.
///
/// Unless default values are captured, a value equal to its setting's default is removed from
/// the snapshot instead of written, which keeps snapshots minimal.
pub struct CaptureSession<'c> {
    context: &'c SettingsContext,
    keys: Vec<PreferenceKey>,
    preferences: Preferences,
    capture_default_values: bool,
    state: SessionState,
}

impl<'c> CaptureSession<'c> {
    pub fn new(context: &'c SettingsContext) -> Self {
        Self::with_preferences(context, Preferences::new())
    }

    /// Captures into an existing snapshot, updating it in place.
    pub fn with_preferences(context: &'c SettingsContext, preferences: Preferences) -> Self {
        Self {
            context,
            keys: Vec::new(),
            preferences,
            capture_default_values: false,
            state: SessionState::Idle,
        }
    }

    pub fn capture_default_values(mut self, capture: bool) -> Self {
        self.capture_default_values = capture;
        self
    }

    pub fn add(&mut self, key: PreferenceKey) {
        self.keys.push(key);
    }

    pub fn add_all_solutions(&mut self) {
        self.keys.extend(self.context.registry().keys());
    }

    pub fn keys(&self) -> &[PreferenceKey] {
        &self.keys
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn into_preferences(self) -> Preferences {
        self.preferences
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub async fn run(&mut self) -> Result<&Preferences, SessionError> {
        self.state.begin()?;
        info!(keys = self.keys.len(), "capture session started");

        let mut queue: Vec<PreferenceKey> = self.keys.iter().rev().cloned().collect();
        while let Some(key) = queue.pop() {
            let Some(setting) = self.context.setting(&key) else {
                warn!(%key, "no setting for key; skipping");
                continue;
            };
            let Some(handler) = self.context.create_handler(setting) else {
                warn!(%key, "no handler for setting; skipping");
                continue;
            };
            match read_typed(setting, handler.as_ref()).await {
                Ok(value) if self.capture_default_values || !setting.is_default(&value) => {
                    debug!(%key, %value, "captured setting");
                    self.preferences.set(&key, value);
                }
                Ok(_) => {
                    debug!(%key, "setting is at its default; omitting");
                    self.preferences.remove(&key);
                }
                Err(err) => warn!(%key, error = %err, "failed to capture setting"),
            }
        }

        self.state = SessionState::Finished;
        info!(captured = self.preferences.len(), "capture session finished");
        Ok(&self.preferences)
    }
}

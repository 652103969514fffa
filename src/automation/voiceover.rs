// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Accessibility > VoiceOver.

use async_trait::async_trait;

use super::expect_bool;
use super::script::set_and_verify_checkbox;
use crate::model::{IdError, PreferenceKey, Value};
use crate::nav::{AccessibilityPane, SettingsApp};
use crate::settings::{HandlerError, WriteAdapter};
use crate::wait::Deadline;

pub const SOLUTION: &str = "com.apple.macos.voiceover";
pub const PREFERENCE: &str = "enabled";

pub const VOICEOVER: &str = "AX_VOICEOVER_ENABLE";

pub fn key() -> Result<PreferenceKey, IdError> {
    PreferenceKey::parse(SOLUTION, PREFERENCE)
}

/// Turns VoiceOver on or off.
pub struct VoiceOverAdapter {
    app: SettingsApp,
}

impl VoiceOverAdapter {
    pub fn new(app: SettingsApp) -> Self {
        Self { app }
    }
}

#[async_trait]
impl WriteAdapter for VoiceOverAdapter {
    async fn apply(&self, value: &Value) -> Result<(), HandlerError> {
        let enabled = expect_bool(value)?;
        let deadline = Deadline::after(self.app.config().default_wait());
        let pane = self
            .app
            .navigate_within(&AccessibilityPane::VoiceOver.into(), deadline)
            .await?;
        set_and_verify_checkbox(&pane, VOICEOVER, enabled, deadline).await
    }
}

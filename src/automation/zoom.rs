// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Accessibility > Zoom.

use async_trait::async_trait;

use super::script::{set_and_verify_checkbox, set_and_verify_popup};
use super::{expect_bool, expect_integer, label_for};
use crate::model::{IdError, PreferenceKey, Value};
use crate::nav::{AccessibilityPane, SettingsApp};
use crate::settings::{HandlerError, WriteAdapter};
use crate::wait::Deadline;

pub const SOLUTION: &str = "com.apple.macos.zoom";

pub const SCROLL_GESTURE: &str = "AX_ZOOM_ENABLE_GESTURE";
pub const HOTKEYS: &str = "AX_ZOOM_ENABLE_HOTKEYS";
pub const HOVER_TEXT: &str = "AX_HOVER_TEXT_ENABLE";
pub const STYLE: &str = "AX_ZOOM_STYLE_POPUP";

pub const ZOOM_STYLES: &[(i64, &str)] = &[
    (0, "Full Screen"),
    (1, "Picture-in-Picture"),
    (2, "Split Screen"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomControl {
    ScrollGesture,
    Hotkeys,
    HoverText,
    Style,
}

impl ZoomControl {
    pub const ALL: [ZoomControl; 4] =
        [Self::ScrollGesture, Self::Hotkeys, Self::HoverText, Self::Style];

    pub fn preference(self) -> &'static str {
        match self {
            Self::ScrollGesture => "scroll.enabled",
            Self::Hotkeys => "hotkeys.enabled",
            Self::HoverText => "hovertext.enabled",
            Self::Style => "style",
        }
    }

    pub fn identifier(self) -> &'static str {
        match self {
            Self::ScrollGesture => SCROLL_GESTURE,
            Self::Hotkeys => HOTKEYS,
            Self::HoverText => HOVER_TEXT,
            Self::Style => STYLE,
        }
    }

    pub fn key(self) -> Result<PreferenceKey, IdError> {
        PreferenceKey::parse(SOLUTION, self.preference())
    }
}

pub struct ZoomAdapter {
    app: SettingsApp,
    control: ZoomControl,
}

impl ZoomAdapter {
    pub fn new(app: SettingsApp, control: ZoomControl) -> Self {
        Self { app, control }
    }

    pub fn control(&self) -> ZoomControl {
        self.control
    }
}

#[async_trait]
impl WriteAdapter for ZoomAdapter {
    async fn apply(&self, value: &Value) -> Result<(), HandlerError> {
        let deadline = Deadline::after(self.app.config().default_wait());
        let pane = self
            .app
            .navigate_within(&AccessibilityPane::Zoom.into(), deadline)
            .await?;
        let identifier = self.control.identifier();

        match self.control {
            ZoomControl::ScrollGesture | ZoomControl::Hotkeys | ZoomControl::HoverText => {
                set_and_verify_checkbox(&pane, identifier, expect_bool(value)?, deadline).await
            }
            ZoomControl::Style => {
                let label = label_for(ZOOM_STYLES, expect_integer(value)?, value)?;
                set_and_verify_popup(&pane, identifier, label, deadline).await
            }
        }
    }
}

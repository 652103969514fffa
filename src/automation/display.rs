// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Accessibility > Display.

use async_trait::async_trait;
use tracing::debug;

use super::script::{
    set_and_verify_checkbox, set_and_verify_popup, set_and_verify_radio, set_slider_closest_to,
};
use super::{expect_bool, expect_double, expect_integer, label_for};
use crate::model::{IdError, PreferenceKey, Value};
use crate::nav::{AccessibilityPane, SettingsApp};
use crate::settings::{HandlerError, WriteAdapter};
use crate::wait::Deadline;

pub const SOLUTION: &str = "com.apple.macos.display";

pub const INCREASE_CONTRAST: &str = "AX_INCREASE_CONTRAST";
pub const REDUCE_MOTION: &str = "AX_REDUCE_MOTION";
pub const REDUCE_TRANSPARENCY: &str = "AX_REDUCE_TRANSPARENCY";
pub const DIFFERENTIATE_WITHOUT_COLOR: &str = "AX_DIFFERENTIATE_WITHOUT_COLOR";
pub const INVERT_COLOR: &str = "AX_INVERT_COLOR";
pub const INVERT_COLOR_MODE: &str = "AX_INVERT_COLOR_MODE";
pub const FIND_CURSOR: &str = "AX_FIND_CURSOR";
pub const CURSOR_SIZE: &str = "AX_CURSOR_SIZE";
pub const DISPLAY_FILTER_ENABLED: &str = "AX_DISPLAY_FILTER_ENABLED";
pub const DISPLAY_FILTER_TYPE: &str = "AX_DISPLAY_FILTER_TYPE";
pub const DISPLAY_FILTER_INTENSITY: &str = "AX_DISPLAY_FILTER_INTENSITY";

pub const INVERT_MODE_CLASSIC: &str = "Classic";
pub const INVERT_MODE_SMART: &str = "Smart";

/// Stored color filter type to its menu item title.
pub const COLOR_FILTER_TYPES: &[(i64, &str)] = &[
    (1, "Grayscale"),
    (2, "Red/Green filter (Protanopia)"),
    (4, "Green/Red filter (Deuteranopia)"),
    (8, "Blue/Yellow filter (Tritanopia)"),
    (16, "Color Tint"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayControl {
    IncreaseContrast,
    ReduceMotion,
    ReduceTransparency,
    DifferentiateWithoutColor,
    InvertColors,
    ClassicInvert,
    ShakeToLocate,
    CursorSize,
    ColorFilters,
    ColorFilterType,
    ColorFilterIntensity,
}

impl DisplayControl {
    pub const ALL: [DisplayControl; 11] = [
        Self::IncreaseContrast,
        Self::ReduceMotion,
        Self::ReduceTransparency,
        Self::DifferentiateWithoutColor,
        Self::InvertColors,
        Self::ClassicInvert,
        Self::ShakeToLocate,
        Self::CursorSize,
        Self::ColorFilters,
        Self::ColorFilterType,
        Self::ColorFilterIntensity,
    ];

    pub fn preference(self) -> &'static str {
        match self {
            Self::IncreaseContrast => "contrast.enabled",
            Self::ReduceMotion => "reduce.motion",
            Self::ReduceTransparency => "reduce.transparency",
            Self::DifferentiateWithoutColor => "differentiate-without-color",
            Self::InvertColors => "invert",
            Self::ClassicInvert => "invert.classic",
            Self::ShakeToLocate => "cursor.shake",
            Self::CursorSize => "cursor.size",
            Self::ColorFilters => "colorfilter.enabled",
            Self::ColorFilterType => "colorfilter.type",
            Self::ColorFilterIntensity => "colorfilter.intensity",
        }
    }

    pub fn identifier(self) -> &'static str {
        match self {
            Self::IncreaseContrast => INCREASE_CONTRAST,
            Self::ReduceMotion => REDUCE_MOTION,
            Self::ReduceTransparency => REDUCE_TRANSPARENCY,
            Self::DifferentiateWithoutColor => DIFFERENTIATE_WITHOUT_COLOR,
            Self::InvertColors => INVERT_COLOR,
            Self::ClassicInvert => INVERT_COLOR_MODE,
            Self::ShakeToLocate => FIND_CURSOR,
            Self::CursorSize => CURSOR_SIZE,
            Self::ColorFilters => DISPLAY_FILTER_ENABLED,
            Self::ColorFilterType => DISPLAY_FILTER_TYPE,
            Self::ColorFilterIntensity => DISPLAY_FILTER_INTENSITY,
        }
    }

    pub fn key(self) -> Result<PreferenceKey, IdError> {
        PreferenceKey::parse(SOLUTION, self.preference())
    }
}

/// Writes one Display setting by driving its control.
pub struct DisplayAdapter {
    app: SettingsApp,
    control: DisplayControl,
}

impl DisplayAdapter {
    pub fn new(app: SettingsApp, control: DisplayControl) -> Self {
        Self { app, control }
    }

    pub fn control(&self) -> DisplayControl {
        self.control
    }
}

#[async_trait]
impl WriteAdapter for DisplayAdapter {
    async fn apply(&self, value: &Value) -> Result<(), HandlerError> {
        let deadline = Deadline::after(self.app.config().default_wait());
        let pane = self
            .app
            .navigate_within(&AccessibilityPane::Display.into(), deadline)
            .await?;
        let identifier = self.control.identifier();

        match self.control {
            DisplayControl::IncreaseContrast => {
                let enabled = expect_bool(value)?;
                set_and_verify_checkbox(&pane, identifier, enabled, deadline).await?;
                // The application forces transparency on with contrast but leaves it on after.
                if !enabled {
                    debug!("turning off reduce transparency with contrast");
                    set_and_verify_checkbox(&pane, REDUCE_TRANSPARENCY, false, deadline).await?;
                }
                Ok(())
            }
            DisplayControl::ReduceMotion
            | DisplayControl::ReduceTransparency
            | DisplayControl::DifferentiateWithoutColor
            | DisplayControl::InvertColors
            | DisplayControl::ShakeToLocate
            | DisplayControl::ColorFilters => {
                set_and_verify_checkbox(&pane, identifier, expect_bool(value)?, deadline).await
            }
            DisplayControl::ClassicInvert => {
                let label = if expect_bool(value)? {
                    INVERT_MODE_CLASSIC
                } else {
                    INVERT_MODE_SMART
                };
                set_and_verify_radio(&pane, identifier, label, deadline).await
            }
            DisplayControl::CursorSize | DisplayControl::ColorFilterIntensity => {
                set_slider_closest_to(&pane, identifier, expect_double(value)?, deadline).await
            }
            DisplayControl::ColorFilterType => {
                let label = label_for(COLOR_FILTER_TYPES, expect_integer(value)?, value)?;
                set_and_verify_popup(&pane, identifier, label, deadline).await
            }
        }
    }
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Write adapters that apply settings by driving the settings application's controls.
//!
//! Each adapter navigates to its pane on every write; navigation is idempotent, so consecutive
//! writes to the same pane only pay for the title check.

use std::sync::Arc;

use crate::model::{IdError, Value, ValueType};
use crate::nav::SettingsApp;
use crate::settings::{HandlerError, LaunchedApplication, SettingsContextBuilder};

pub mod display;
mod script;
pub mod voiceover;
pub mod zoom;

pub use display::{DisplayAdapter, DisplayControl};
pub use script::{
    set_and_verify_checkbox, set_and_verify_popup, set_and_verify_radio, set_slider_closest_to,
};
pub use voiceover::VoiceOverAdapter;
pub use zoom::{ZoomAdapter, ZoomControl};

/// Registers a write adapter for every built-in Display, Zoom and VoiceOver setting.
///
/// `app` is also registered as a launched application, so an apply session closes it again
/// when one of its writes had to launch it.
pub fn register_builtin_write_adapters(
    mut builder: SettingsContextBuilder,
    app: &SettingsApp,
) -> Result<SettingsContextBuilder, IdError> {
    for control in DisplayControl::ALL {
        builder = builder.write_adapter(
            control.key()?,
            Arc::new(DisplayAdapter::new(app.clone(), control)),
        );
    }
    for control in ZoomControl::ALL {
        builder = builder.write_adapter(
            control.key()?,
            Arc::new(ZoomAdapter::new(app.clone(), control)),
        );
    }
    builder = builder.write_adapter(
        voiceover::key()?,
        Arc::new(VoiceOverAdapter::new(app.clone())),
    );
    Ok(builder.application(Arc::new(app.clone())))
}

impl LaunchedApplication for SettingsApp {
    fn forget_launch(&self) {
        SettingsApp::forget_launch(self);
    }

    fn close_if_launched(&self) -> Result<bool, HandlerError> {
        Ok(SettingsApp::close_if_launched(self)?)
    }
}

fn mismatch(expected: ValueType, value: &Value) -> HandlerError {
    HandlerError::TypeMismatch {
        expected,
        found: value.value_type(),
    }
}

pub(crate) fn expect_bool(value: &Value) -> Result<bool, HandlerError> {
    value
        .as_bool()
        .ok_or_else(|| mismatch(ValueType::Boolean, value))
}

pub(crate) fn expect_integer(value: &Value) -> Result<i64, HandlerError> {
    value
        .as_integer()
        .ok_or_else(|| mismatch(ValueType::Integer, value))
}

// Integers are accepted for sliders; the registry conforms them anyway.
pub(crate) fn expect_double(value: &Value) -> Result<f64, HandlerError> {
    match value {
        Value::Double(number) => Ok(*number),
        Value::Integer(number) => Ok(*number as f64),
        other => Err(mismatch(ValueType::Double, other)),
    }
}

/// Title of the menu item that stands for `code`.
pub fn label_for(
    labels: &'static [(i64, &'static str)],
    code: i64,
    value: &Value,
) -> Result<&'static str, HandlerError> {
    labels
        .iter()
        .find(|(candidate, _)| *candidate == code)
        .map(|(_, label)| *label)
        .ok_or_else(|| HandlerError::Unmapped {
            value: value.clone(),
        })
}

/// Inverse of [`label_for`].
pub fn code_for(labels: &[(i64, &str)], label: &str) -> Option<i64> {
    labels
        .iter()
        .find(|(_, candidate)| *candidate == label)
        .map(|(code, _)| *code)
}

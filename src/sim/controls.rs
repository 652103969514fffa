// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Controls of the simulated Display and Zoom panes and their backing defaults keys.

use crate::automation::{code_for, display, voiceover, zoom};
use crate::ax::{AccessibilityTree, AttrValue, Attribute, AxError, ElementHandle, Role, TreeQuery};
use crate::model::Value;

const UNIVERSAL_ACCESS: &str = "com.apple.universalaccess";
const MEDIA_ACCESSIBILITY: &str = "com.apple.mediaaccessibility";

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Binding {
    /// `negate` stores the opposite of the checkbox state.
    Checkbox { negate: bool },
    Slider { min: f64, max: f64, step: f64 },
    Popup { labels: &'static [(i64, &'static str)] },
    /// Two radio buttons standing for `true` and `false`.
    Radio {
        when_true: &'static str,
        when_false: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct ControlSpec {
    pub identifier: &'static str,
    pub label: &'static str,
    pub domain: &'static str,
    pub key: &'static str,
    /// Stored value used when the store has none.
    pub initial: Value,
    pub binding: Binding,
}

impl ControlSpec {
    fn new(
        identifier: &'static str,
        label: &'static str,
        domain: &'static str,
        key: &'static str,
        initial: Value,
        binding: Binding,
    ) -> Self {
        Self {
            identifier,
            label,
            domain,
            key,
            initial,
            binding,
        }
    }

    fn checkbox(identifier: &'static str, label: &'static str, key: &'static str) -> Self {
        Self::new(
            identifier,
            label,
            UNIVERSAL_ACCESS,
            key,
            Value::Bool(false),
            Binding::Checkbox { negate: false },
        )
    }

    pub fn role(&self) -> Role {
        match self.binding {
            Binding::Checkbox { .. } => Role::CheckBox,
            Binding::Slider { .. } => Role::Slider,
            Binding::Popup { .. } => Role::PopUpButton,
            Binding::Radio { .. } => Role::RadioGroup,
        }
    }

    /// Control state for a stored value; unusable values fall back to `initial`.
    pub fn control_value(&self, stored: Option<&Value>) -> AttrValue {
        self.try_control_value(stored)
            .or_else(|| self.try_control_value(Some(&self.initial)))
            .unwrap_or(AttrValue::Bool(false))
    }

    fn try_control_value(&self, stored: Option<&Value>) -> Option<AttrValue> {
        let stored = stored?;
        match self.binding {
            Binding::Checkbox { negate } => {
                let flag = match stored {
                    Value::Bool(flag) => *flag,
                    Value::Integer(flag) => *flag != 0,
                    _ => return None,
                };
                Some(AttrValue::Bool(flag != negate))
            }
            Binding::Slider { min, max, .. } => {
                let number = match stored {
                    Value::Double(number) => *number,
                    Value::Integer(number) => *number as f64,
                    _ => return None,
                };
                Some(AttrValue::Number(number.clamp(min, max)))
            }
            Binding::Popup { labels } => {
                let code = stored.as_integer()?;
                labels
                    .iter()
                    .find(|(candidate, _)| *candidate == code)
                    .map(|(_, label)| AttrValue::Text((*label).to_owned()))
            }
            Binding::Radio {
                when_true,
                when_false,
            } => {
                let label = if stored.as_bool()? { when_true } else { when_false };
                Some(AttrValue::Text(label.to_owned()))
            }
        }
    }

    /// Stored value for a control state, or `None` if the state has no stored form.
    pub fn stored_value(&self, control: &AttrValue) -> Option<Value> {
        match (self.binding, control) {
            (Binding::Checkbox { negate }, AttrValue::Bool(checked)) => {
                Some(Value::Bool(*checked != negate))
            }
            (Binding::Slider { .. }, AttrValue::Number(number)) => Some(Value::Double(*number)),
            (Binding::Popup { labels }, AttrValue::Text(label)) => {
                code_for(labels, label).map(Value::Integer)
            }
            (Binding::Radio { when_true, .. }, AttrValue::Text(label)) => {
                Some(Value::Bool(label == when_true))
            }
            _ => None,
        }
    }

    /// Reads the control's state; a radio group reports its selected button's title.
    pub fn current(
        &self,
        tree: &dyn AccessibilityTree,
        element: &ElementHandle,
    ) -> Result<Option<AttrValue>, AxError> {
        if !matches!(self.binding, Binding::Radio { .. }) {
            return tree.attribute(element, Attribute::Value);
        }
        for button in tree.children_with_role(element, &Role::RadioButton)? {
            if tree.attribute(&button, Attribute::Value)? == Some(AttrValue::Bool(true)) {
                return Ok(tree.title(&button)?.map(AttrValue::Text));
            }
        }
        Ok(None)
    }
}

pub(super) fn display_controls() -> Vec<ControlSpec> {
    vec![
        ControlSpec::checkbox(display::INCREASE_CONTRAST, "Increase contrast", "increaseContrast"),
        ControlSpec::checkbox(
            display::REDUCE_TRANSPARENCY,
            "Reduce transparency",
            "reduceTransparency",
        ),
        ControlSpec::checkbox(display::REDUCE_MOTION, "Reduce motion", "reduceMotion"),
        ControlSpec::checkbox(
            display::DIFFERENTIATE_WITHOUT_COLOR,
            "Differentiate without color",
            "differentiateWithoutColor",
        ),
        ControlSpec::checkbox(display::INVERT_COLOR, "Invert colors", "whiteOnBlack"),
        ControlSpec::new(
            display::INVERT_COLOR_MODE,
            "Invert colors mode",
            UNIVERSAL_ACCESS,
            "classicInvert",
            Value::Bool(false),
            Binding::Radio {
                when_true: display::INVERT_MODE_CLASSIC,
                when_false: display::INVERT_MODE_SMART,
            },
        ),
        ControlSpec::new(
            display::FIND_CURSOR,
            "Shake mouse pointer to locate",
            UNIVERSAL_ACCESS,
            "CGDisableCursorLocationMagnification",
            Value::Bool(false),
            Binding::Checkbox { negate: true },
        ),
        ControlSpec::new(
            display::CURSOR_SIZE,
            "Pointer size",
            UNIVERSAL_ACCESS,
            "mouseDriverCursorSize",
            Value::Double(1.0),
            Binding::Slider {
                min: 1.0,
                max: 4.0,
                step: 0.25,
            },
        ),
        ControlSpec::new(
            display::DISPLAY_FILTER_ENABLED,
            "Color filters",
            MEDIA_ACCESSIBILITY,
            "__Color__-MADisplayFilterCategoryEnabled",
            Value::Bool(false),
            Binding::Checkbox { negate: false },
        ),
        ControlSpec::new(
            display::DISPLAY_FILTER_TYPE,
            "Filter type",
            MEDIA_ACCESSIBILITY,
            "__Color__-MADisplayFilterType",
            Value::Integer(1),
            Binding::Popup {
                labels: display::COLOR_FILTER_TYPES,
            },
        ),
        ControlSpec::new(
            display::DISPLAY_FILTER_INTENSITY,
            "Intensity",
            MEDIA_ACCESSIBILITY,
            "__Color__-MADisplayFilterIntensity",
            Value::Double(1.0),
            Binding::Slider {
                min: 0.0,
                max: 1.0,
                step: 0.125,
            },
        ),
    ]
}

pub(super) fn zoom_controls() -> Vec<ControlSpec> {
    vec![
        ControlSpec::checkbox(
            zoom::HOTKEYS,
            "Use keyboard shortcuts to zoom",
            "closeViewHotkeysEnabled",
        ),
        ControlSpec::checkbox(
            zoom::SCROLL_GESTURE,
            "Use scroll gesture with modifier keys to zoom",
            "closeViewScrollWheelToggle",
        ),
        ControlSpec::checkbox(zoom::HOVER_TEXT, "Hover Text", "hoverTextEnabled"),
        ControlSpec::new(
            zoom::STYLE,
            "Zoom style",
            UNIVERSAL_ACCESS,
            "closeViewZoomMode",
            Value::Integer(0),
            Binding::Popup {
                labels: zoom::ZOOM_STYLES,
            },
        ),
    ]
}

pub(super) fn voiceover_controls() -> Vec<ControlSpec> {
    vec![ControlSpec::checkbox(
        voiceover::VOICEOVER,
        "VoiceOver",
        "voiceOverOnOffKey",
    )]
}

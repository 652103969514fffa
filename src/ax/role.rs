// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use smol_str::SmolStr;

/// Accessibility role of a tree node.
///
/// Roles the engine reasons about are named variants; anything else a backend reports is kept
/// verbatim in [`Role::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Application,
    Window,
    Toolbar,
    Group,
    SplitGroup,
    Splitter,
    ScrollArea,
    Outline,
    Row,
    Cell,
    StaticText,
    Button,
    CheckBox,
    Slider,
    PopUpButton,
    Menu,
    MenuItem,
    RadioGroup,
    RadioButton,
    Other(SmolStr),
}

impl Role {
    /// Platform role string (`AXRow`, ...).
    pub fn as_ax_str(&self) -> &str {
        match self {
            Self::Application => "AXApplication",
            Self::Window => "AXWindow",
            Self::Toolbar => "AXToolbar",
            Self::Group => "AXGroup",
            Self::SplitGroup => "AXSplitGroup",
            Self::Splitter => "AXSplitter",
            Self::ScrollArea => "AXScrollArea",
            Self::Outline => "AXOutline",
            Self::Row => "AXRow",
            Self::Cell => "AXCell",
            Self::StaticText => "AXStaticText",
            Self::Button => "AXButton",
            Self::CheckBox => "AXCheckBox",
            Self::Slider => "AXSlider",
            Self::PopUpButton => "AXPopUpButton",
            Self::Menu => "AXMenu",
            Self::MenuItem => "AXMenuItem",
            Self::RadioGroup => "AXRadioGroup",
            Self::RadioButton => "AXRadioButton",
            Self::Other(raw) => raw,
        }
    }

    pub fn from_ax_str(raw: &str) -> Self {
        match raw {
            "AXApplication" => Self::Application,
            "AXWindow" => Self::Window,
            "AXToolbar" => Self::Toolbar,
            "AXGroup" => Self::Group,
            "AXSplitGroup" => Self::SplitGroup,
            "AXSplitter" => Self::Splitter,
            "AXScrollArea" => Self::ScrollArea,
            "AXOutline" => Self::Outline,
            "AXRow" => Self::Row,
            "AXCell" => Self::Cell,
            "AXStaticText" => Self::StaticText,
            "AXButton" => Self::Button,
            "AXCheckBox" => Self::CheckBox,
            "AXSlider" => Self::Slider,
            "AXPopUpButton" => Self::PopUpButton,
            "AXMenu" => Self::Menu,
            "AXMenuItem" => Self::MenuItem,
            "AXRadioGroup" => Self::RadioGroup,
            "AXRadioButton" => Self::RadioButton,
            other => Self::Other(SmolStr::new(other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ax_str())
    }
}

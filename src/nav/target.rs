// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

/// One navigable pane: the stable identifier used to select it and the window-title prefix that
/// confirms it is showing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaneDestination {
    identifier: String,
    title: String,
}

impl PaneDestination {
    pub fn new(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Expected window-title prefix once the pane is showing.
    pub fn title(&self) -> &str {
        &self.title
    }
}

impl fmt::Display for PaneDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// A top-level category plus an optional sub-pane inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NavigationTarget {
    category: PaneDestination,
    subpane: Option<PaneDestination>,
}

impl NavigationTarget {
    pub fn new(category: PaneDestination, subpane: Option<PaneDestination>) -> Self {
        Self { category, subpane }
    }

    pub fn category(&self) -> &PaneDestination {
        &self.category
    }

    pub fn subpane(&self) -> Option<&PaneDestination> {
        self.subpane.as_ref()
    }

    /// The pane that is showing once navigation succeeds.
    pub fn destination(&self) -> &PaneDestination {
        self.subpane.as_ref().unwrap_or(&self.category)
    }
}

impl fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subpane {
            Some(subpane) => write!(f, "{} > {subpane}", self.category),
            None => write!(f, "{}", self.category),
        }
    }
}

impl From<Category> for NavigationTarget {
    fn from(category: Category) -> Self {
        Self::new(category.destination(), None)
    }
}

impl From<AccessibilityPane> for NavigationTarget {
    fn from(pane: AccessibilityPane) -> Self {
        Self::new(
            Category::Accessibility.destination(),
            Some(pane.destination()),
        )
    }
}

/// Top-level categories of the settings application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Accessibility,
    Appearance,
    Displays,
    General,
    Keyboard,
    Mouse,
    Trackpad,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Self::Accessibility,
        Self::Appearance,
        Self::Displays,
        Self::General,
        Self::Keyboard,
        Self::Mouse,
        Self::Trackpad,
    ];

    pub fn identifier(self) -> &'static str {
        match self {
            Self::Accessibility => "com.apple.Accessibility-Settings.extension",
            Self::Appearance => "com.apple.Appearance-Settings.extension",
            Self::Displays => "com.apple.Displays-Settings.extension",
            Self::General => "com.apple.systempreferences.GeneralSettings",
            Self::Keyboard => "com.apple.Keyboard-Settings.extension",
            Self::Mouse => "com.apple.Mouse-Settings.extension",
            Self::Trackpad => "com.apple.Trackpad-Settings.extension",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Accessibility => "Accessibility",
            Self::Appearance => "Appearance",
            Self::Displays => "Displays",
            Self::General => "General",
            Self::Keyboard => "Keyboard",
            Self::Mouse => "Mouse",
            Self::Trackpad => "Trackpad",
        }
    }

    pub fn destination(self) -> PaneDestination {
        PaneDestination::new(self.identifier(), self.title())
    }
}

/// Sub-panes reachable from the Accessibility category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessibilityPane {
    Display,
    SpokenContent,
    VoiceOver,
    Zoom,
}

impl AccessibilityPane {
    pub const ALL: [AccessibilityPane; 4] =
        [Self::Display, Self::SpokenContent, Self::VoiceOver, Self::Zoom];

    pub fn identifier(self) -> &'static str {
        match self {
            Self::Display => "AX_FEATURE_DISPLAY",
            Self::SpokenContent => "AX_FEATURE_SPOKENCONTENT",
            Self::VoiceOver => "AX_FEATURE_VOICEOVER",
            Self::Zoom => "AX_FEATURE_ZOOM",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Display => "Display",
            Self::SpokenContent => "Spoken Content",
            Self::VoiceOver => "VoiceOver",
            Self::Zoom => "Zoom",
        }
    }

    pub fn destination(self) -> PaneDestination {
        PaneDestination::new(self.identifier(), self.title())
    }
}

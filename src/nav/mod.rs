// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Pane navigation inside the settings application.
//!
//! Navigation selects a category in the window's sidebar, unwinds any drill-down already
//! showing in it, and confirms arrival by matching the window title prefix. Sub-panes repeat
//! the same steps against the revealed detail group.

pub mod app;
pub mod error;
pub mod main_window;
pub mod pane;
pub mod target;

pub use app::SettingsApp;
pub use error::NavigationError;
pub use main_window::{MainWindow, SplitView};
pub use pane::DetailPane;
pub use target::{AccessibilityPane, Category, NavigationTarget, PaneDestination};

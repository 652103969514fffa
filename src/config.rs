// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Timing and retry parameters for driving the settings application.
//!
//! The defaults were measured against one settings application; other targets should be
//! re-measured rather than assumed to share them.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct AutomationConfig {
    /// Interval between predicate evaluations while waiting.
    pub poll_interval_ms: u64,
    /// Budget used when a caller does not supply one.
    pub default_wait_ms: u64,
    /// Upper bound for each navigation level (category, sub-pane).
    pub pane_wait_cap_ms: u64,
    /// Maximum number of Back presses when returning to a pane's root.
    pub back_navigation_ceiling: u32,
    /// How long to wait for the title to change after pressing Back.
    pub title_change_wait_ms: u64,
    pub back_stack_policy: BackStackPolicy,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 20,
            default_wait_ms: 8_000,
            pane_wait_cap_ms: 2_000,
            back_navigation_ceiling: 8,
            title_change_wait_ms: 250,
            back_stack_policy: BackStackPolicy::StopAtTitle,
        }
    }
}

impl AutomationConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn default_wait(&self) -> Duration {
        Duration::from_millis(self.default_wait_ms)
    }

    pub fn pane_wait_cap(&self) -> Duration {
        Duration::from_millis(self.pane_wait_cap_ms)
    }

    pub fn title_change_wait(&self) -> Duration {
        Duration::from_millis(self.title_change_wait_ms)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn load_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// How back-navigation decides that a pane is back at its root.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BackStackPolicy {
    /// Stop pressing Back as soon as the title matches the destination.
    #[default]
    StopAtTitle,
    /// Keep pressing until the Back control disappears; a visible Back control after the
    /// ceiling is a failure.
    RequireEmpty,
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Json { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "invalid config at {path:?}: {source}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

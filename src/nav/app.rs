// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use super::error::NavigationError;
use super::main_window::MainWindow;
use super::pane::DetailPane;
use super::target::NavigationTarget;
use crate::ax::AccessibilityTree;
use crate::config::AutomationConfig;
use crate::wait::{wait_every, Deadline};

/// Entry point for driving the settings application through its accessibility tree.
///
/// Clones share one launch flag, so every adapter holding a clone sees a launch made by any
/// other.
#[derive(Clone)]
pub struct SettingsApp {
    tree: Arc<dyn AccessibilityTree>,
    config: AutomationConfig,
    launched: Arc<AtomicBool>,
}

impl SettingsApp {
    pub fn new(tree: Arc<dyn AccessibilityTree>, config: AutomationConfig) -> Self {
        Self {
            tree,
            config,
            launched: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn tree(&self) -> &dyn AccessibilityTree {
        self.tree.as_ref()
    }

    pub fn config(&self) -> &AutomationConfig {
        &self.config
    }

    /// Waits for the application to expose a main window.
    pub async fn main_window(&self, deadline: Deadline) -> Result<MainWindow<'_>, NavigationError> {
        let tree = self.tree.as_ref();
        let appeared = wait_every::<_, NavigationError>(deadline, self.config.poll_interval(), || {
            Ok(tree.main_window()?.is_some())
        })
        .await?;
        let window = if appeared { tree.main_window()? } else { None };
        let window = window.ok_or_else(|| NavigationError::timeout("settings main window"))?;
        MainWindow::new(tree, window, &self.config)
    }

    /// Launches the application unless it is running, then waits for its main window.
    pub async fn launch_or_attach(
        &self,
        deadline: Deadline,
    ) -> Result<MainWindow<'_>, NavigationError> {
        if !self.tree.is_running()? {
            info!("launching settings application");
            self.tree.launch()?;
            self.launched.store(true, Ordering::SeqCst);
        }
        self.main_window(deadline).await
    }

    /// Whether this handle launched the application since the last [`Self::forget_launch`].
    pub fn launched(&self) -> bool {
        self.launched.load(Ordering::SeqCst)
    }

    pub fn forget_launch(&self) {
        self.launched.store(false, Ordering::SeqCst);
    }

    /// Terminates the application if it was launched through this handle; returns whether it
    /// was.
    pub fn close_if_launched(&self) -> Result<bool, NavigationError> {
        if !self.launched.swap(false, Ordering::SeqCst) {
            return Ok(false);
        }
        info!("terminating launched settings application");
        self.tree.terminate()?;
        Ok(true)
    }

    /// Shows `target` and returns its detail pane.
    ///
    /// Calling this again for the pane that is already showing is a no-op apart from
    /// unwinding any drill-down inside it.
    pub async fn navigate_to(
        &self,
        target: &NavigationTarget,
        wait_at_most: Duration,
    ) -> Result<DetailPane<'_>, NavigationError> {
        self.navigate_within(target, Deadline::after(wait_at_most))
            .await
    }

    /// Like [`SettingsApp::navigate_to`] with an absolute deadline shared by every step.
    ///
    /// Each level waits at most the configured pane cap, never past `deadline`.
    pub async fn navigate_within(
        &self,
        target: &NavigationTarget,
        deadline: Deadline,
    ) -> Result<DetailPane<'_>, NavigationError> {
        debug!(%target, "navigating");
        let window = self.launch_or_attach(deadline).await?;
        let cap = self.config.pane_wait_cap();
        let split = window.split_view()?;

        let category = target.category();
        let split = window
            .select_category(&split, category, deadline.capped(cap))
            .await?;
        let pane = DetailPane::new(window, split, category.clone());

        match target.subpane() {
            Some(subpane) => pane.open(subpane, deadline.capped(cap)).await,
            None => Ok(pane),
        }
    }
}

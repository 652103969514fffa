// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use tracing::{debug, warn};

use super::error::NavigationError;
use super::target::PaneDestination;
use crate::ax::{
    AccessibilityTree, Button, ElementHandle, ElementIdentifier, Role, Row, TreeQuery, Window,
};
use crate::config::{AutomationConfig, BackStackPolicy};
use crate::wait::{pause, wait_every, Deadline};

/// The two halves of the settings window: category list and detail pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitView {
    pub group: ElementHandle,
    pub sidebar: ElementHandle,
    pub detail: ElementHandle,
}

/// The settings application's main window.
#[derive(Clone)]
pub struct MainWindow<'a> {
    tree: &'a dyn AccessibilityTree,
    window: ElementHandle,
    config: &'a AutomationConfig,
}

impl<'a> MainWindow<'a> {
    pub fn new(
        tree: &'a dyn AccessibilityTree,
        window: ElementHandle,
        config: &'a AutomationConfig,
    ) -> Result<Self, NavigationError> {
        let window = Window::new(tree, window)?.element().clone();
        Ok(Self {
            tree,
            window,
            config,
        })
    }

    pub(crate) fn tree(&self) -> &'a dyn AccessibilityTree {
        self.tree
    }

    pub(crate) fn config(&self) -> &'a AutomationConfig {
        self.config
    }

    pub fn element(&self) -> &ElementHandle {
        &self.window
    }

    pub fn title(&self) -> Result<Option<String>, NavigationError> {
        Ok(self.tree.title(&self.window)?)
    }

    /// Prefix match tolerates version-specific title suffixes.
    pub fn title_starts_with(&self, prefix: &str) -> Result<bool, NavigationError> {
        Ok(self
            .title()?
            .is_some_and(|title| title.starts_with(prefix)))
    }

    pub async fn wait_for_title(
        &self,
        prefix: &str,
        deadline: Deadline,
    ) -> Result<bool, NavigationError> {
        wait_every::<_, NavigationError>(deadline, self.config.poll_interval(), || {
            self.title_starts_with(prefix)
        })
        .await
    }

    /// Locates the category list and detail pane.
    ///
    /// The split group's children are partitioned by splitters; exactly two sides, each a
    /// single group, are expected.
    pub fn split_view(&self) -> Result<SplitView, NavigationError> {
        let content = self
            .tree
            .first_child(&self.window, &Role::Group)?
            .ok_or_else(|| NavigationError::shape("window content group"))?;
        let split = self
            .tree
            .first_child(&content, &Role::SplitGroup)?
            .ok_or_else(|| NavigationError::shape("split group"))?;
        self.partition(split)
    }

    /// Re-reads the sides of an already located split view.
    ///
    /// The application may swap the detail group when a pane is shown; the split group itself
    /// stays, so the window is not searched again.
    pub fn refresh(&self, split: &SplitView) -> Result<SplitView, NavigationError> {
        self.partition(split.group.clone())
    }

    fn partition(&self, split: ElementHandle) -> Result<SplitView, NavigationError> {
        let mut sides: Vec<Vec<ElementHandle>> = vec![Vec::new()];
        for child in self.tree.children(&split)? {
            if child.role() == &Role::Splitter {
                sides.push(Vec::new());
            } else if let Some(side) = sides.last_mut() {
                side.push(child);
            }
        }
        if sides.len() != 2 {
            return Err(NavigationError::shape("two-pane split view"));
        }

        let mut groups = sides.into_iter().map(|side| match side.as_slice() {
            [group] if group.role() == &Role::Group => Ok(group.clone()),
            _ => Err(NavigationError::shape("single group on each side of the split view")),
        });
        let sidebar = groups
            .next()
            .ok_or_else(|| NavigationError::shape("category list"))??;
        let detail = groups
            .next()
            .ok_or_else(|| NavigationError::shape("detail pane"))??;
        Ok(SplitView {
            group: split,
            sidebar,
            detail,
        })
    }

    /// The toolbar's Back control, if it is currently shown.
    pub fn back_button(&self) -> Result<Option<ElementHandle>, NavigationError> {
        let toolbar = self
            .tree
            .first_child(&self.window, &Role::Toolbar)?
            .ok_or_else(|| NavigationError::shape("toolbar"))?;
        Ok(self
            .tree
            .descendant(&toolbar, &ElementIdentifier::label("Back", Role::Button), Some(2))?)
    }

    /// Shows `destination`'s pane and returns the split view with its current detail group.
    pub async fn select_category(
        &self,
        split: &SplitView,
        destination: &PaneDestination,
        deadline: Deadline,
    ) -> Result<SplitView, NavigationError> {
        let identifier = ElementIdentifier::stable(destination.identifier());
        let (_, lineage) = self
            .tree
            .descendant_with_lineage(&split.sidebar, &identifier, None)?
            .ok_or_else(|| NavigationError::shape(format!("category {destination:?}")))?;
        let row = lineage
            .first_ancestor(&Role::Row)
            .cloned()
            .ok_or_else(|| NavigationError::shape(format!("row containing {destination:?}")))?;
        let row = Row::new(self.tree, row)?;

        if row.is_selected()? {
            debug!(pane = %destination, "category already selected; returning to its root");
            self.return_to_pane_root(destination).await?;
        } else {
            debug!(pane = %destination, "selecting category");
            row.select()?;
        }

        if !self.wait_for_title(destination.title(), deadline).await? {
            return Err(NavigationError::timeout(format!(
                "window title {:?}",
                destination.title()
            )));
        }
        self.refresh(split)
    }

    /// Presses Back until the pane is at its root, bounded by the configured ceiling.
    ///
    /// Each press waits for the title to change on its own short sub-deadline; the attempt
    /// ceiling bounds an application that keeps changing its title without ever arriving.
    async fn return_to_pane_root(
        &self,
        destination: &PaneDestination,
    ) -> Result<(), NavigationError> {
        let ceiling = self.config.back_navigation_ceiling;
        let policy = self.config.back_stack_policy;
        let mut attempts = 0;

        while attempts < ceiling {
            let Some(back) = self.back_button()? else {
                debug!(pane = %destination, attempts, "no back control; pane is at its root");
                return Ok(());
            };

            match self.title()? {
                Some(before) => {
                    Button::new(self.tree, back)?.press()?;
                    let changed = wait_every::<_, NavigationError>(
                        Deadline::after(self.config.title_change_wait()),
                        self.config.poll_interval(),
                        || Ok(self.title()?.as_deref() != Some(before.as_str())),
                    )
                    .await?;
                    debug!(pane = %destination, attempt = attempts + 1, changed, "pressed back");
                }
                None => pause(self.config.title_change_wait()).await,
            }
            attempts += 1;

            if policy == BackStackPolicy::StopAtTitle
                && self.title_starts_with(destination.title())?
            {
                return Ok(());
            }
        }

        if self.back_button()?.is_none() {
            return Ok(());
        }
        match policy {
            BackStackPolicy::RequireEmpty => Err(NavigationError::unspecified(format!(
                "back stack still not empty after {ceiling} attempts"
            ))),
            BackStackPolicy::StopAtTitle => {
                warn!(pane = %destination, ceiling, "back navigation ceiling reached");
                Ok(())
            }
        }
    }
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use tracing::debug;

use super::error::NavigationError;
use super::main_window::{MainWindow, SplitView};
use super::target::PaneDestination;
use crate::ax::{
    AccessibilityTree, Button, Checkbox, ElementHandle, ElementIdentifier, PopUpButton,
    RadioGroup, Role, Row, Slider, TreeQuery,
};
use crate::wait::Deadline;

/// The detail pane currently showing in the settings window.
///
/// Controls are looked up by stable identifier on every call, so a pane that rebuilt itself
/// between two calls is still addressed correctly.
#[derive(Clone)]
pub struct DetailPane<'a> {
    window: MainWindow<'a>,
    split: SplitView,
    destination: PaneDestination,
}

impl<'a> DetailPane<'a> {
    pub fn new(window: MainWindow<'a>, split: SplitView, destination: PaneDestination) -> Self {
        Self {
            window,
            split,
            destination,
        }
    }

    pub fn window(&self) -> &MainWindow<'a> {
        &self.window
    }

    pub fn group(&self) -> &ElementHandle {
        &self.split.detail
    }

    pub fn destination(&self) -> &PaneDestination {
        &self.destination
    }

    fn tree(&self) -> &'a dyn AccessibilityTree {
        self.window.tree()
    }

    pub fn find(&self, identifier: &str) -> Result<ElementHandle, NavigationError> {
        self.tree()
            .descendant(&self.split.detail, &ElementIdentifier::stable(identifier), None)?
            .ok_or_else(|| {
                NavigationError::shape(format!("control {identifier} in {}", self.destination))
            })
    }

    pub fn checkbox(&self, identifier: &str) -> Result<Checkbox<'a>, NavigationError> {
        Ok(Checkbox::new(self.tree(), self.find(identifier)?)?)
    }

    pub fn slider(&self, identifier: &str) -> Result<Slider<'a>, NavigationError> {
        Ok(Slider::new(self.tree(), self.find(identifier)?)?)
    }

    pub fn popup(&self, identifier: &str) -> Result<PopUpButton<'a>, NavigationError> {
        Ok(PopUpButton::new(self.tree(), self.find(identifier)?)?)
    }

    pub fn radio_group(&self, identifier: &str) -> Result<RadioGroup<'a>, NavigationError> {
        Ok(RadioGroup::new(self.tree(), self.find(identifier)?)?)
    }

    pub fn checkbox_value(&self, identifier: &str) -> Result<bool, NavigationError> {
        Ok(self.checkbox(identifier)?.value()?)
    }

    pub fn set_checkbox_value(&self, identifier: &str, value: bool) -> Result<(), NavigationError> {
        Ok(self.checkbox(identifier)?.set_value(value)?)
    }

    pub fn slider_value(&self, identifier: &str) -> Result<f64, NavigationError> {
        Ok(self.slider(identifier)?.value()?)
    }

    pub fn popup_value(&self, identifier: &str) -> Result<String, NavigationError> {
        Ok(self.popup(identifier)?.value()?)
    }

    /// Picks `value` from the pop-up's menu, failing with a timeout if the menu never opens.
    pub async fn select_popup_value(
        &self,
        identifier: &str,
        value: &str,
        deadline: Deadline,
    ) -> Result<(), NavigationError> {
        let popup = self.popup(identifier)?;
        let poll_interval = self.window.config().poll_interval();
        if popup.select(value, deadline, poll_interval).await? {
            Ok(())
        } else {
            Err(NavigationError::timeout(format!("menu of {identifier}")))
        }
    }

    pub fn selected_radio_label(
        &self,
        identifier: &str,
    ) -> Result<Option<String>, NavigationError> {
        Ok(self.radio_group(identifier)?.selected_label()?)
    }

    pub fn select_radio(&self, identifier: &str, label: &str) -> Result<(), NavigationError> {
        Ok(self.radio_group(identifier)?.select(label)?)
    }

    pub fn press_button(&self, identifier: &str) -> Result<(), NavigationError> {
        Ok(Button::new(self.tree(), self.find(identifier)?)?.press()?)
    }

    /// Opens a sub-pane reachable from this pane and returns it.
    ///
    /// The entry is selected if it sits in a row of a list, pressed otherwise.
    pub async fn open(
        self,
        destination: &PaneDestination,
        deadline: Deadline,
    ) -> Result<DetailPane<'a>, NavigationError> {
        let tree = self.tree();
        let identifier = ElementIdentifier::stable(destination.identifier());
        let (entry, lineage) = tree
            .descendant_with_lineage(&self.split.detail, &identifier, None)?
            .ok_or_else(|| {
                NavigationError::shape(format!("entry for {destination} in {}", self.destination))
            })?;

        match lineage.first_ancestor(&Role::Row) {
            Some(row) => {
                let row = Row::new(tree, row.clone())?;
                if !row.is_selected()? {
                    row.select()?;
                }
            }
            None => Button::new(tree, entry)?.press()?,
        }
        debug!(from = %self.destination, to = %destination, "opening sub-pane");

        if !self.window.wait_for_title(destination.title(), deadline).await? {
            return Err(NavigationError::timeout(format!(
                "window title {:?}",
                destination.title()
            )));
        }
        let split = self.window.refresh(&self.split)?;
        Ok(DetailPane::new(self.window, split, destination.clone()))
    }
}

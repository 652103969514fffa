// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! An in-process settings application.
//!
//! [`SimulatedSettingsApp`] exposes the same tree shape the navigator expects from the real
//! application: a window with a toolbar, a split view with a category outline and a detail
//! group, sub-pane entries and bound controls. Control changes are mirrored into a
//! [`DefaultsStore`] the way the real application persists its preferences.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::automation::display;
use crate::ax::{
    AccessibilityTree, Action, AttrValue, Attribute, AxError, ElementHandle, MemoryTree, NodeSpec,
    Role,
};
use crate::nav::{AccessibilityPane, Category};
use crate::store::{DefaultsStore, StoreError};

mod controls;

use controls::{display_controls, voiceover_controls, zoom_controls, Binding, ControlSpec};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatorOptions {
    /// Title reads that still report the previous title after a navigation.
    pub title_lag_reads: u32,
    /// Back changes the title but never pops the drill-down stack.
    pub stuck_back_navigation: bool,
    /// Value reads of a slider before a queued step takes effect.
    pub step_lag_reads: u32,
    /// Leaves the split view out of the window.
    pub omit_split_view: bool,
    pub initial_category: Category,
    pub initial_subpane: Option<AccessibilityPane>,
    /// Starts without a running process; the window appears once launched.
    pub not_running: bool,
    /// Control identifiers left out of their panes.
    pub omit_controls: Vec<&'static str>,
}

impl Default for SimulatorOptions {
    fn default() -> Self {
        Self {
            title_lag_reads: 0,
            step_lag_reads: 0,
            stuck_back_navigation: false,
            omit_split_view: false,
            initial_category: Category::General,
            initial_subpane: None,
            not_running: false,
            omit_controls: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Location {
    category: Category,
    stack: Vec<AccessibilityPane>,
}

impl Location {
    fn title(&self) -> &'static str {
        match self.stack.last() {
            Some(pane) => pane.title(),
            None => self.category.title(),
        }
    }
}

#[derive(Debug)]
struct PendingTitle {
    title: String,
    reads_left: u32,
}

#[derive(Debug)]
struct PendingStep {
    element: ElementHandle,
    action: Action,
    reads_left: u32,
}

#[derive(Debug)]
struct State {
    location: Location,
    window: ElementHandle,
    toolbar: ElementHandle,
    detail: Option<ElementHandle>,
    back: Option<ElementHandle>,
    rows: Vec<(ElementHandle, Category)>,
    entries: Vec<(ElementHandle, AccessibilityPane)>,
    bound: Vec<(ElementHandle, ControlSpec)>,
    pending_title: Option<PendingTitle>,
    pending_steps: Vec<PendingStep>,
    back_presses: u32,
    running: bool,
    launches: u32,
}

pub struct SimulatedSettingsApp {
    tree: MemoryTree,
    store: Arc<dyn DefaultsStore>,
    options: SimulatorOptions,
    state: Mutex<State>,
}

fn store_failure(err: StoreError) -> AxError {
    AxError::Backend(format!("settings store: {err}"))
}

impl SimulatedSettingsApp {
    /// Builds the window and seeds `store` with a value for every bound key it lacks.
    pub fn new(store: Arc<dyn DefaultsStore>, options: SimulatorOptions) -> Result<Self, AxError> {
        for spec in all_controls() {
            if matches!(store.read(spec.domain, spec.key), Ok(Some(_))) {
                continue;
            }
            store
                .write(spec.domain, spec.key, spec.initial.clone())
                .map_err(store_failure)?;
        }

        let tree = MemoryTree::new();
        let window = tree.insert(None, NodeSpec::new(Role::Window))?;
        if !options.not_running {
            tree.set_main_window(Some(&window))?;
        }
        let toolbar = tree.insert(Some(&window), NodeSpec::new(Role::Toolbar))?;
        let content = tree.insert(Some(&window), NodeSpec::new(Role::Group))?;

        let mut rows = Vec::new();
        let mut detail = None;
        if !options.omit_split_view {
            let split = tree.insert(Some(&content), NodeSpec::new(Role::SplitGroup))?;
            let sidebar = tree.insert(Some(&split), NodeSpec::new(Role::Group))?;
            let outline = tree.insert(Some(&sidebar), NodeSpec::new(Role::Outline))?;
            for category in Category::ALL {
                let row = tree.insert(
                    Some(&outline),
                    NodeSpec::new(Role::Row).selected(category == options.initial_category),
                )?;
                let cell = tree.insert(Some(&row), NodeSpec::new(Role::Cell))?;
                tree.insert(
                    Some(&cell),
                    NodeSpec::new(Role::StaticText)
                        .identifier(category.identifier())
                        .description(category.title()),
                )?;
                rows.push((row, category));
            }
            tree.insert(Some(&split), NodeSpec::new(Role::Splitter))?;
            detail = Some(tree.insert(Some(&split), NodeSpec::new(Role::Group))?);
        }

        let running = !options.not_running;
        let location = Location {
            category: options.initial_category,
            stack: options.initial_subpane.into_iter().collect(),
        };
        let sim = Self {
            tree,
            store,
            options,
            state: Mutex::new(State {
                location,
                window,
                toolbar,
                detail,
                back: None,
                rows,
                entries: Vec::new(),
                bound: Vec::new(),
                pending_title: None,
                pending_steps: Vec::new(),
                back_presses: 0,
                running,
                launches: 0,
            }),
        };
        {
            let mut state = sim.lock()?;
            sim.show(&mut state, false)?;
        }
        Ok(sim)
    }

    pub fn store(&self) -> &Arc<dyn DefaultsStore> {
        &self.store
    }

    /// Number of times Back was pressed.
    pub fn back_presses(&self) -> u32 {
        self.lock().map(|state| state.back_presses).unwrap_or(0)
    }

    /// Number of times the application was launched.
    pub fn launches(&self) -> u32 {
        self.lock().map(|state| state.launches).unwrap_or(0)
    }

    /// Slider steps queued but not yet applied.
    pub fn pending_steps(&self) -> usize {
        self.lock().map(|state| state.pending_steps.len()).unwrap_or(0)
    }

    pub fn category(&self) -> Option<Category> {
        self.lock().ok().map(|state| state.location.category)
    }

    /// Drill-down stack inside the current category, outermost first.
    pub fn subpanes(&self) -> Vec<AccessibilityPane> {
        self.lock()
            .map(|state| state.location.stack.clone())
            .unwrap_or_default()
    }

    /// Removes the main window, as when the application is quitting.
    pub fn close_window(&self) -> Result<(), AxError> {
        self.tree.set_main_window(None)
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, AxError> {
        self.state
            .lock()
            .map_err(|_| AxError::Backend("simulator state lock poisoned".to_owned()))
    }

    /// Rebuilds the toolbar and detail pane for the current location.
    fn show(&self, state: &mut State, lagging: bool) -> Result<(), AxError> {
        if let Some(back) = state.back.take() {
            self.tree.remove(&back)?;
        }
        if !state.location.stack.is_empty() {
            let back = NodeSpec::new(Role::Button).description("Back");
            state.back = Some(self.tree.insert(Some(&state.toolbar), back)?);
        }

        state.entries.clear();
        state.bound.clear();
        if let Some(detail) = state.detail.clone() {
            self.tree.clear_children(&detail)?;
            let title = state.location.title();
            self.tree
                .insert(Some(&detail), NodeSpec::new(Role::StaticText).description(title))?;

            match (state.location.category, state.location.stack.last()) {
                (Category::Accessibility, None) => {
                    for pane in AccessibilityPane::ALL {
                        let entry = NodeSpec::new(Role::Button)
                            .identifier(pane.identifier())
                            .description(pane.title());
                        state
                            .entries
                            .push((self.tree.insert(Some(&detail), entry)?, pane));
                    }
                }
                (_, Some(pane)) => {
                    let specs = match pane {
                        AccessibilityPane::Display => display_controls(),
                        AccessibilityPane::Zoom => zoom_controls(),
                        AccessibilityPane::VoiceOver => voiceover_controls(),
                        AccessibilityPane::SpokenContent => Vec::new(),
                    };
                    for spec in specs {
                        if self.options.omit_controls.contains(&spec.identifier) {
                            continue;
                        }
                        let element = self.build_control(&detail, &spec)?;
                        state.bound.push((element, spec));
                    }
                }
                _ => {}
            }
        }

        let title = state.location.title().to_owned();
        debug!(%title, lagging, "simulated pane shown");
        self.set_title(state, title, lagging)
    }

    fn set_title(&self, state: &mut State, title: String, lagging: bool) -> Result<(), AxError> {
        if lagging && self.options.title_lag_reads > 0 {
            state.pending_title = Some(PendingTitle {
                title,
                reads_left: self.options.title_lag_reads,
            });
            return Ok(());
        }
        state.pending_title = None;
        self.tree
            .store_attribute(&state.window, Attribute::Title, Some(AttrValue::Text(title)))
    }

    fn build_control(
        &self,
        parent: &ElementHandle,
        spec: &ControlSpec,
    ) -> Result<ElementHandle, AxError> {
        let stored = self.store.read(spec.domain, spec.key).ok().flatten();
        let value = spec.control_value(stored.as_ref());
        let node = NodeSpec::new(spec.role())
            .identifier(spec.identifier)
            .description(spec.label);

        match spec.binding {
            Binding::Checkbox { .. } => self.tree.insert(Some(parent), node.value(value)),
            Binding::Slider { min, max, step } => self
                .tree
                .insert(Some(parent), node.value(value).range(min, max, step)),
            Binding::Popup { labels } => self.tree.insert(
                Some(parent),
                node.value(value)
                    .options(labels.iter().map(|(_, label)| *label)),
            ),
            Binding::Radio {
                when_true,
                when_false,
            } => {
                let group = self.tree.insert(Some(parent), node)?;
                for label in [when_true, when_false] {
                    let selected = value == AttrValue::Text(label.to_owned());
                    self.tree.insert(
                        Some(&group),
                        NodeSpec::new(Role::RadioButton)
                            .title(label)
                            .value(AttrValue::Bool(selected)),
                    )?;
                }
                Ok(group)
            }
        }
    }

    fn go_back(&self, state: &mut State) -> Result<(), AxError> {
        state.back_presses += 1;
        if self.options.stuck_back_navigation {
            let title = format!("{} {}", state.location.title(), state.back_presses);
            return self.set_title(state, title, false);
        }
        state.location.stack.pop();
        self.show(state, true)
    }

    // Turning contrast on forces reduce transparency on, as the real application does.
    fn apply_linked_controls(&self, state: &State, pressed: &ElementHandle) -> Result<(), AxError> {
        let is_contrast = state.bound.iter().any(|(element, spec)| {
            element == pressed && spec.identifier == display::INCREASE_CONTRAST
        });
        if !is_contrast
            || self.tree.attribute(pressed, Attribute::Value)? != Some(AttrValue::Bool(true))
        {
            return Ok(());
        }
        if let Some((transparency, _)) = state
            .bound
            .iter()
            .find(|(_, spec)| spec.identifier == display::REDUCE_TRANSPARENCY)
        {
            self.tree.store_attribute(
                transparency,
                Attribute::Value,
                Some(AttrValue::Bool(true)),
            )?;
        }
        Ok(())
    }

    /// Writes every bound control whose state differs from the store.
    fn sync_controls(&self, state: &State) -> Result<(), AxError> {
        for (element, spec) in &state.bound {
            let current = match spec.current(&self.tree, element) {
                Ok(Some(current)) => current,
                Ok(None) | Err(AxError::Stale { .. }) => continue,
                Err(err) => return Err(err),
            };
            let Some(value) = spec.stored_value(&current) else {
                continue;
            };
            let stored = self.store.read(spec.domain, spec.key).ok().flatten();
            if stored.as_ref() != Some(&value) {
                debug!(domain = spec.domain, key = spec.key, %value, "simulated app stored value");
                self.store
                    .write(spec.domain, spec.key, value)
                    .map_err(store_failure)?;
            }
        }
        Ok(())
    }

    // Queued steps apply in order, each after its own lag.
    fn settle_step(&self, element: &ElementHandle) -> Result<(), AxError> {
        let mut state = self.lock()?;
        let Some(ix) = state.pending_steps.iter().position(|step| &step.element == element) else {
            return Ok(());
        };
        if state.pending_steps[ix].reads_left > 0 {
            state.pending_steps[ix].reads_left -= 1;
            return Ok(());
        }
        let step = state.pending_steps.remove(ix);
        self.tree.perform(&step.element, step.action)?;
        self.sync_controls(&state)
    }

    fn settle_title(&self, element: &ElementHandle) -> Result<(), AxError> {
        let mut state = self.lock()?;
        if element != &state.window {
            return Ok(());
        }
        let Some(pending) = state.pending_title.as_mut() else {
            return Ok(());
        };
        if pending.reads_left > 0 {
            pending.reads_left -= 1;
            return Ok(());
        }
        let title = pending.title.clone();
        self.set_title(&mut state, title, false)
    }
}

fn all_controls() -> impl Iterator<Item = ControlSpec> {
    display_controls()
        .into_iter()
        .chain(zoom_controls())
        .chain(voiceover_controls())
}

impl AccessibilityTree for SimulatedSettingsApp {
    fn main_window(&self) -> Result<Option<ElementHandle>, AxError> {
        if !self.lock()?.running {
            return Ok(None);
        }
        self.tree.main_window()
    }

    fn children(&self, element: &ElementHandle) -> Result<Vec<ElementHandle>, AxError> {
        self.tree.children(element)
    }

    fn attribute(
        &self,
        element: &ElementHandle,
        attribute: Attribute,
    ) -> Result<Option<AttrValue>, AxError> {
        match attribute {
            Attribute::Title => self.settle_title(element)?,
            Attribute::Value => self.settle_step(element)?,
            _ => {}
        }
        self.tree.attribute(element, attribute)
    }

    fn set_attribute(
        &self,
        element: &ElementHandle,
        attribute: Attribute,
        value: AttrValue,
    ) -> Result<(), AxError> {
        let selects_row = element.role() == &Role::Row
            && attribute == Attribute::Selected
            && value == AttrValue::Bool(true);
        self.tree.set_attribute(element, attribute, value)?;

        let mut state = self.lock()?;
        if selects_row {
            let category = state
                .rows
                .iter()
                .find(|(row, _)| row == element)
                .map(|(_, category)| *category);
            if let Some(category) = category {
                debug!(category = category.title(), "simulated category selected");
                state.location = Location {
                    category,
                    stack: Vec::new(),
                };
                return self.show(&mut state, true);
            }
        }
        self.sync_controls(&state)
    }

    fn perform(&self, element: &ElementHandle, action: Action) -> Result<(), AxError> {
        let steps = matches!(action, Action::Increment | Action::Decrement);
        if steps && self.options.step_lag_reads > 0 {
            // Validates the handle without moving the slider yet.
            self.tree.attribute(element, Attribute::Value)?;
            let mut state = self.lock()?;
            state.pending_steps.push(PendingStep {
                element: element.clone(),
                action,
                reads_left: self.options.step_lag_reads,
            });
            return Ok(());
        }
        self.tree.perform(element, action)?;

        let mut state = self.lock()?;
        if action == Action::Press {
            if state.back.as_ref() == Some(element) {
                return self.go_back(&mut state);
            }
            let entry = state
                .entries
                .iter()
                .find(|(entry, _)| entry == element)
                .map(|(_, pane)| *pane);
            if let Some(pane) = entry {
                state.location.stack.push(pane);
                return self.show(&mut state, true);
            }
            self.apply_linked_controls(&state, element)?;
        }
        self.sync_controls(&state)
    }

    fn is_running(&self) -> Result<bool, AxError> {
        Ok(self.lock()?.running)
    }

    fn launch(&self) -> Result<(), AxError> {
        let mut state = self.lock()?;
        if state.running {
            return Ok(());
        }
        state.running = true;
        state.launches += 1;
        debug!(launches = state.launches, "simulated app launched");
        self.tree.set_main_window(Some(&state.window))?;
        self.show(&mut state, false)
    }

    fn terminate(&self) -> Result<(), AxError> {
        let mut state = self.lock()?;
        state.running = false;
        state.pending_title = None;
        state.pending_steps.clear();
        debug!("simulated app terminated");
        self.tree.set_main_window(None)
    }
}

#[cfg(test)]
mod tests;

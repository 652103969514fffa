// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! An in-process accessibility tree.
//!
//! Nodes live in an arena keyed by [`ElementId`]; ids are never reused, so a handle to a removed
//! node reliably goes stale. Generic control behaviour (toggling checkboxes, stepping sliders,
//! opening pop-up menus, single selection of rows and radio buttons) is built in; application
//! behaviour is layered on top by wrapping the tree.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use smol_str::SmolStr;

use super::element::{Action, AttrValue, Attribute, ElementHandle, ElementId};
use super::error::AxError;
use super::role::Role;
use super::tree::AccessibilityTree;

/// Description of a node to insert.
#[derive(Debug, Clone)]
pub struct NodeSpec {
    role: Role,
    attributes: BTreeMap<Attribute, AttrValue>,
    options: Vec<String>,
    step: Option<f64>,
}

impl NodeSpec {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            attributes: BTreeMap::new(),
            options: Vec::new(),
            step: None,
        }
    }

    pub fn attr(mut self, attribute: Attribute, value: AttrValue) -> Self {
        self.attributes.insert(attribute, value);
        self
    }

    pub fn identifier(self, id: impl Into<String>) -> Self {
        self.attr(Attribute::Identifier, AttrValue::Text(id.into()))
    }

    pub fn title(self, title: impl Into<String>) -> Self {
        self.attr(Attribute::Title, AttrValue::Text(title.into()))
    }

    pub fn description(self, description: impl Into<String>) -> Self {
        self.attr(Attribute::Description, AttrValue::Text(description.into()))
    }

    pub fn value(self, value: AttrValue) -> Self {
        self.attr(Attribute::Value, value)
    }

    pub fn selected(self, selected: bool) -> Self {
        self.attr(Attribute::Selected, AttrValue::Bool(selected))
    }

    /// Slider bounds and the amount one increment/decrement moves the value.
    pub fn range(self, min: f64, max: f64, step: f64) -> Self {
        let mut spec = self
            .attr(Attribute::MinValue, AttrValue::Number(min))
            .attr(Attribute::MaxValue, AttrValue::Number(max));
        spec.step = Some(step);
        spec
    }

    /// Menu item titles offered by a pop-up button.
    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug)]
struct Node {
    role: Role,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    attributes: BTreeMap<Attribute, AttrValue>,
    options: Vec<String>,
    step: Option<f64>,
}

#[derive(Debug, Default)]
struct Arena {
    nodes: HashMap<ElementId, Node>,
    next_id: u64,
    main_window: Option<ElementId>,
}

impl Arena {
    fn node(&self, handle: &ElementHandle) -> Result<&Node, AxError> {
        match self.nodes.get(&handle.id()) {
            Some(node) if &node.role == handle.role() => Ok(node),
            _ => Err(AxError::Stale {
                element: handle.id(),
            }),
        }
    }

    fn node_mut(&mut self, handle: &ElementHandle) -> Result<&mut Node, AxError> {
        match self.nodes.get_mut(&handle.id()) {
            Some(node) if &node.role == handle.role() => Ok(node),
            _ => Err(AxError::Stale {
                element: handle.id(),
            }),
        }
    }

    fn handle(&self, id: ElementId) -> Option<ElementHandle> {
        let node = self.nodes.get(&id)?;
        let label = node
            .attributes
            .get(&Attribute::Description)
            .or_else(|| node.attributes.get(&Attribute::Title))
            .and_then(AttrValue::as_text)
            .map(SmolStr::new);
        Some(ElementHandle::new(id, node.role.clone(), label))
    }

    fn insert(&mut self, parent: Option<ElementId>, spec: NodeSpec) -> ElementHandle {
        self.next_id += 1;
        let id = ElementId::new(self.next_id);
        let role = spec.role.clone();
        let label = spec
            .attributes
            .get(&Attribute::Description)
            .or_else(|| spec.attributes.get(&Attribute::Title))
            .and_then(AttrValue::as_text)
            .map(SmolStr::new);
        self.nodes.insert(
            id,
            Node {
                role: spec.role,
                parent,
                children: Vec::new(),
                attributes: spec.attributes,
                options: spec.options,
                step: spec.step,
            },
        );
        if let Some(parent) = parent.and_then(|parent| self.nodes.get_mut(&parent)) {
            parent.children.push(id);
        }
        ElementHandle::new(id, role, label)
    }

    fn remove_subtree(&mut self, id: ElementId) {
        if let Some(parent) = self.nodes.get(&id).and_then(|node| node.parent) {
            if let Some(parent) = self.nodes.get_mut(&parent) {
                parent.children.retain(|child| *child != id);
            }
        }
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                pending.extend(node.children);
            }
        }
        if self.main_window == Some(id) {
            self.main_window = None;
        }
    }

    fn siblings_with_role(&self, id: ElementId, role: &Role) -> Vec<ElementId> {
        let Some(parent) = self.nodes.get(&id).and_then(|node| node.parent) else {
            return Vec::new();
        };
        self.nodes
            .get(&parent)
            .map(|parent| {
                parent
                    .children
                    .iter()
                    .copied()
                    .filter(|child| {
                        *child != id
                            && self.nodes.get(child).is_some_and(|node| &node.role == role)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn set(&mut self, id: ElementId, attribute: Attribute, value: AttrValue) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.attributes.insert(attribute, value);
        }
    }

    fn number(&self, id: ElementId, attribute: Attribute) -> Option<f64> {
        match self.nodes.get(&id)?.attributes.get(&attribute)? {
            AttrValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    fn clamp_to_range(&self, id: ElementId, value: f64) -> f64 {
        let min = self.number(id, Attribute::MinValue).unwrap_or(f64::NEG_INFINITY);
        let max = self.number(id, Attribute::MaxValue).unwrap_or(f64::INFINITY);
        value.clamp(min, max)
    }
}

#[derive(Debug, Default)]
pub struct MemoryTree {
    arena: Mutex<Arena>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Arena>, AxError> {
        self.arena
            .lock()
            .map_err(|_| AxError::Backend("memory tree lock poisoned".to_owned()))
    }

    /// Inserts a node as the last child of `parent` (or as a detached root).
    pub fn insert(
        &self,
        parent: Option<&ElementHandle>,
        spec: NodeSpec,
    ) -> Result<ElementHandle, AxError> {
        let mut arena = self.lock()?;
        let parent = match parent {
            Some(parent) => {
                arena.node(parent)?;
                Some(parent.id())
            }
            None => None,
        };
        Ok(arena.insert(parent, spec))
    }

    pub fn set_main_window(&self, window: Option<&ElementHandle>) -> Result<(), AxError> {
        let mut arena = self.lock()?;
        arena.main_window = match window {
            Some(window) => {
                arena.node(window)?;
                Some(window.id())
            }
            None => None,
        };
        Ok(())
    }

    /// Removes `element` and everything below it; their handles go stale.
    pub fn remove(&self, element: &ElementHandle) -> Result<(), AxError> {
        let mut arena = self.lock()?;
        arena.node(element)?;
        arena.remove_subtree(element.id());
        Ok(())
    }

    pub fn clear_children(&self, element: &ElementHandle) -> Result<(), AxError> {
        let mut arena = self.lock()?;
        let children = arena.node(element)?.children.clone();
        for child in children {
            arena.remove_subtree(child);
        }
        Ok(())
    }

    /// Writes an attribute without any control semantics, as the owning application would.
    pub fn store_attribute(
        &self,
        element: &ElementHandle,
        attribute: Attribute,
        value: Option<AttrValue>,
    ) -> Result<(), AxError> {
        let mut arena = self.lock()?;
        let node = arena.node_mut(element)?;
        match value {
            Some(value) => node.attributes.insert(attribute, value),
            None => node.attributes.remove(&attribute),
        };
        Ok(())
    }

    pub fn parent(&self, element: &ElementHandle) -> Result<Option<ElementHandle>, AxError> {
        let arena = self.lock()?;
        let parent = arena.node(element)?.parent;
        Ok(parent.and_then(|parent| arena.handle(parent)))
    }

    pub fn contains(&self, element: &ElementHandle) -> bool {
        self.lock()
            .map(|arena| arena.node(element).is_ok())
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.lock().map(|arena| arena.nodes.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn press(arena: &mut Arena, element: &ElementHandle) -> Result<(), AxError> {
        let id = element.id();
        match element.role() {
            Role::CheckBox => {
                let current = match arena.node(element)?.attributes.get(&Attribute::Value) {
                    Some(AttrValue::Bool(value)) => *value,
                    Some(AttrValue::Number(value)) => *value != 0.0,
                    _ => false,
                };
                arena.set(id, Attribute::Value, AttrValue::Bool(!current));
                Ok(())
            }
            Role::RadioButton => {
                for sibling in arena.siblings_with_role(id, &Role::RadioButton) {
                    arena.set(sibling, Attribute::Value, AttrValue::Bool(false));
                }
                arena.set(id, Attribute::Value, AttrValue::Bool(true));
                Ok(())
            }
            Role::PopUpButton => {
                let node = arena.node(element)?;
                let has_menu = node
                    .children
                    .iter()
                    .any(|child| arena.nodes.get(child).is_some_and(|n| n.role == Role::Menu));
                if has_menu {
                    return Ok(());
                }
                let options = node.options.clone();
                let menu = arena.insert(Some(id), NodeSpec::new(Role::Menu));
                for option in options {
                    arena.insert(Some(menu.id()), NodeSpec::new(Role::MenuItem).title(option));
                }
                Ok(())
            }
            Role::MenuItem => {
                let node = arena.node(element)?;
                let title = node.attributes.get(&Attribute::Title).cloned();
                let menu = node.parent;
                let popup = menu.and_then(|menu| arena.nodes.get(&menu)?.parent);
                if let (Some(menu), Some(popup), Some(title)) = (menu, popup, title) {
                    arena.set(popup, Attribute::Value, title);
                    arena.remove_subtree(menu);
                }
                Ok(())
            }
            Role::Button => {
                arena.node(element)?;
                Ok(())
            }
            _ => Err(AxError::Unsupported {
                element: id,
                action: Action::Press,
            }),
        }
    }

    fn step(arena: &mut Arena, element: &ElementHandle, action: Action) -> Result<(), AxError> {
        let node = arena.node(element)?;
        let (Role::Slider, Some(step)) = (&node.role, node.step) else {
            return Err(AxError::Unsupported {
                element: element.id(),
                action,
            });
        };
        let current = arena.number(element.id(), Attribute::Value).unwrap_or(0.0);
        let next = match action {
            Action::Increment => current + step,
            _ => current - step,
        };
        let next = arena.clamp_to_range(element.id(), next);
        arena.set(element.id(), Attribute::Value, AttrValue::Number(next));
        Ok(())
    }
}

impl AccessibilityTree for MemoryTree {
    fn main_window(&self) -> Result<Option<ElementHandle>, AxError> {
        let arena = self.lock()?;
        Ok(arena.main_window.and_then(|id| arena.handle(id)))
    }

    fn children(&self, element: &ElementHandle) -> Result<Vec<ElementHandle>, AxError> {
        let arena = self.lock()?;
        let node = arena.node(element)?;
        Ok(node
            .children
            .iter()
            .filter_map(|child| arena.handle(*child))
            .collect())
    }

    fn attribute(
        &self,
        element: &ElementHandle,
        attribute: Attribute,
    ) -> Result<Option<AttrValue>, AxError> {
        let arena = self.lock()?;
        Ok(arena.node(element)?.attributes.get(&attribute).cloned())
    }

    fn set_attribute(
        &self,
        element: &ElementHandle,
        attribute: Attribute,
        value: AttrValue,
    ) -> Result<(), AxError> {
        let mut arena = self.lock()?;
        arena.node(element)?;
        let id = element.id();
        match (element.role(), attribute, value) {
            (Role::Row, Attribute::Selected, AttrValue::Bool(true)) => {
                for sibling in arena.siblings_with_role(id, &Role::Row) {
                    arena.set(sibling, Attribute::Selected, AttrValue::Bool(false));
                }
                arena.set(id, Attribute::Selected, AttrValue::Bool(true));
            }
            (Role::Slider, Attribute::Value, AttrValue::Number(value)) => {
                let value = arena.clamp_to_range(id, value);
                arena.set(id, Attribute::Value, AttrValue::Number(value));
            }
            (_, attribute, value) => arena.set(id, attribute, value),
        }
        Ok(())
    }

    fn perform(&self, element: &ElementHandle, action: Action) -> Result<(), AxError> {
        let mut arena = self.lock()?;
        match action {
            Action::Press => Self::press(&mut arena, element),
            Action::Increment | Action::Decrement => Self::step(&mut arena, element, action),
            Action::Cancel => {
                arena.node(element)?;
                if element.role() == &Role::Menu {
                    arena.remove_subtree(element.id());
                    Ok(())
                } else {
                    Err(AxError::Unsupported {
                        element: element.id(),
                        action,
                    })
                }
            }
        }
    }
}

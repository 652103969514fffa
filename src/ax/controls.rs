// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Typed views over individual controls.
//!
//! Each wrapper checks the element's role on construction and reads through the tree on every
//! call; nothing is cached beyond the handle itself.

use std::time::Duration;

use super::element::{Action, AttrValue, Attribute, ElementHandle};
use super::error::AxError;
use super::role::Role;
use super::tree::{AccessibilityTree, TreeQuery};
use crate::wait::{wait_every, Deadline};

fn expect_role(element: &ElementHandle, role: Role) -> Result<(), AxError> {
    if element.role() == &role {
        Ok(())
    } else {
        Err(AxError::WrongRole {
            element: element.id(),
            expected: role,
            found: element.role().clone(),
        })
    }
}

fn required(
    tree: &dyn AccessibilityTree,
    element: &ElementHandle,
    attribute: Attribute,
) -> Result<AttrValue, AxError> {
    tree.attribute(element, attribute)?
        .ok_or(AxError::MissingAttribute {
            element: element.id(),
            attribute,
        })
}

// Toggle-like controls report either a bool or 0/1.
fn read_flag(
    tree: &dyn AccessibilityTree,
    element: &ElementHandle,
    attribute: Attribute,
) -> Result<bool, AxError> {
    match required(tree, element, attribute)? {
        AttrValue::Bool(value) => Ok(value),
        AttrValue::Number(value) => Ok(value != 0.0),
        other => Err(AxError::AttributeType {
            element: element.id(),
            attribute,
            expected: "bool",
            found: other.kind(),
        }),
    }
}

fn read_number(
    tree: &dyn AccessibilityTree,
    element: &ElementHandle,
    attribute: Attribute,
) -> Result<f64, AxError> {
    match required(tree, element, attribute)? {
        AttrValue::Number(value) => Ok(value),
        other => Err(AxError::AttributeType {
            element: element.id(),
            attribute,
            expected: "number",
            found: other.kind(),
        }),
    }
}

fn read_text(
    tree: &dyn AccessibilityTree,
    element: &ElementHandle,
    attribute: Attribute,
) -> Result<String, AxError> {
    tree.text_attribute(element, attribute)?
        .ok_or(AxError::MissingAttribute {
            element: element.id(),
            attribute,
        })
}

pub struct Checkbox<'t> {
    tree: &'t dyn AccessibilityTree,
    element: ElementHandle,
}

impl<'t> Checkbox<'t> {
    pub fn new(tree: &'t dyn AccessibilityTree, element: ElementHandle) -> Result<Self, AxError> {
        expect_role(&element, Role::CheckBox)?;
        Ok(Self { tree, element })
    }

    pub fn element(&self) -> &ElementHandle {
        &self.element
    }

    pub fn value(&self) -> Result<bool, AxError> {
        read_flag(self.tree, &self.element, Attribute::Value)
    }

    /// Presses the checkbox when its state differs from `value`.
    pub fn set_value(&self, value: bool) -> Result<(), AxError> {
        if self.value()? != value {
            self.tree.perform(&self.element, Action::Press)?;
        }
        Ok(())
    }
}

pub struct Slider<'t> {
    tree: &'t dyn AccessibilityTree,
    element: ElementHandle,
}

impl<'t> Slider<'t> {
    pub fn new(tree: &'t dyn AccessibilityTree, element: ElementHandle) -> Result<Self, AxError> {
        expect_role(&element, Role::Slider)?;
        Ok(Self { tree, element })
    }

    pub fn value(&self) -> Result<f64, AxError> {
        read_number(self.tree, &self.element, Attribute::Value)
    }

    pub fn min_value(&self) -> Result<f64, AxError> {
        read_number(self.tree, &self.element, Attribute::MinValue)
    }

    pub fn max_value(&self) -> Result<f64, AxError> {
        read_number(self.tree, &self.element, Attribute::MaxValue)
    }

    pub fn set_value(&self, value: f64) -> Result<(), AxError> {
        self.tree
            .set_attribute(&self.element, Attribute::Value, AttrValue::Number(value))
    }

    pub fn increment(&self) -> Result<(), AxError> {
        self.tree.perform(&self.element, Action::Increment)
    }

    pub fn decrement(&self) -> Result<(), AxError> {
        self.tree.perform(&self.element, Action::Decrement)
    }
}

pub struct PopUpButton<'t> {
    tree: &'t dyn AccessibilityTree,
    element: ElementHandle,
}

impl<'t> PopUpButton<'t> {
    pub fn new(tree: &'t dyn AccessibilityTree, element: ElementHandle) -> Result<Self, AxError> {
        expect_role(&element, Role::PopUpButton)?;
        Ok(Self { tree, element })
    }

    pub fn value(&self) -> Result<String, AxError> {
        read_text(self.tree, &self.element, Attribute::Value)
    }

    /// Opens the menu and picks the item titled exactly `value`.
    ///
    /// Returns `Ok(false)` if the menu does not appear before `deadline`.
    pub async fn select(
        &self,
        value: &str,
        deadline: Deadline,
        poll_interval: Duration,
    ) -> Result<bool, AxError> {
        if self.value()? == value {
            return Ok(true);
        }

        self.tree.perform(&self.element, Action::Press)?;
        let tree = self.tree;
        let element = &self.element;
        let opened = wait_every::<_, AxError>(deadline, poll_interval, || {
            Ok(tree.first_child(element, &Role::Menu)?.is_some())
        })
        .await?;
        if !opened {
            return Ok(false);
        }
        let Some(menu) = tree.first_child(element, &Role::Menu)? else {
            return Ok(false);
        };

        for item in tree.children_with_role(&menu, &Role::MenuItem)? {
            if tree.title(&item)?.as_deref() == Some(value) {
                tree.perform(&item, Action::Press)?;
                return Ok(true);
            }
        }

        tree.perform(&menu, Action::Cancel)?;
        Err(AxError::NoSuchItem {
            element: element.id(),
            label: value.to_owned(),
        })
    }
}

pub struct RadioGroup<'t> {
    tree: &'t dyn AccessibilityTree,
    element: ElementHandle,
}

impl<'t> RadioGroup<'t> {
    pub fn new(tree: &'t dyn AccessibilityTree, element: ElementHandle) -> Result<Self, AxError> {
        expect_role(&element, Role::RadioGroup)?;
        Ok(Self { tree, element })
    }

    /// Title of the selected radio button, or `None` when nothing is selected.
    pub fn selected_label(&self) -> Result<Option<String>, AxError> {
        for button in self.tree.children_with_role(&self.element, &Role::RadioButton)? {
            if read_flag(self.tree, &button, Attribute::Value)? {
                return read_text(self.tree, &button, Attribute::Title).map(Some);
            }
        }
        Ok(None)
    }

    pub fn select(&self, label: &str) -> Result<(), AxError> {
        for button in self.tree.children_with_role(&self.element, &Role::RadioButton)? {
            if self.tree.title(&button)?.as_deref() == Some(label) {
                if !read_flag(self.tree, &button, Attribute::Value)? {
                    self.tree.perform(&button, Action::Press)?;
                }
                return Ok(());
            }
        }
        Err(AxError::NoSuchItem {
            element: self.element.id(),
            label: label.to_owned(),
        })
    }
}

pub struct Button<'t> {
    tree: &'t dyn AccessibilityTree,
    element: ElementHandle,
}

impl<'t> Button<'t> {
    pub fn new(tree: &'t dyn AccessibilityTree, element: ElementHandle) -> Result<Self, AxError> {
        expect_role(&element, Role::Button)?;
        Ok(Self { tree, element })
    }

    pub fn press(&self) -> Result<(), AxError> {
        self.tree.perform(&self.element, Action::Press)
    }
}

pub struct Row<'t> {
    tree: &'t dyn AccessibilityTree,
    element: ElementHandle,
}

impl<'t> Row<'t> {
    pub fn new(tree: &'t dyn AccessibilityTree, element: ElementHandle) -> Result<Self, AxError> {
        expect_role(&element, Role::Row)?;
        Ok(Self { tree, element })
    }

    pub fn is_selected(&self) -> Result<bool, AxError> {
        read_flag(self.tree, &self.element, Attribute::Selected)
    }

    pub fn select(&self) -> Result<(), AxError> {
        self.tree
            .set_attribute(&self.element, Attribute::Selected, AttrValue::Bool(true))
    }
}

pub struct Window<'t> {
    tree: &'t dyn AccessibilityTree,
    element: ElementHandle,
}

impl<'t> Window<'t> {
    pub fn new(tree: &'t dyn AccessibilityTree, element: ElementHandle) -> Result<Self, AxError> {
        expect_role(&element, Role::Window)?;
        Ok(Self { tree, element })
    }

    pub fn element(&self) -> &ElementHandle {
        &self.element
    }

    /// The window title; a window may legitimately have none while it is loading.
    pub fn title(&self) -> Result<Option<String>, AxError> {
        self.tree.title(&self.element)
    }
}

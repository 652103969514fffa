// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use smallvec::SmallVec;
use smol_str::SmolStr;

use super::role::Role;

/// Backend-assigned token for a tree node. Only meaningful to the backend that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A non-owning reference to a node in a foreign tree.
///
/// The cached role and label describe the node as it was when the handle was issued. Backends
/// revalidate the handle on every call and report [`AxError::Stale`](super::AxError::Stale) when
/// the node is gone or no longer has the cached role.
#[derive(Debug, Clone)]
pub struct ElementHandle {
    id: ElementId,
    role: Role,
    label: Option<SmolStr>,
}

impl ElementHandle {
    pub fn new(id: ElementId, role: Role, label: Option<SmolStr>) -> Self {
        Self { id, role, label }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl PartialEq for ElementHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.role == other.role
    }
}

impl Eq for ElementHandle {}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{}{} {label:?}", self.role, self.id),
            None => write!(f, "{}{}", self.role, self.id),
        }
    }
}

/// How to find an element.
///
/// Stable ids survive localization and layout changes and are preferred; label lookup requires
/// a role to disambiguate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementIdentifier {
    ByStableId(String),
    ByVisibleLabel { label: String, role: Role },
}

impl ElementIdentifier {
    pub fn stable(id: impl Into<String>) -> Self {
        Self::ByStableId(id.into())
    }

    pub fn label(label: impl Into<String>, role: Role) -> Self {
        Self::ByVisibleLabel {
            label: label.into(),
            role,
        }
    }
}

impl fmt::Display for ElementIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByStableId(id) => write!(f, "id {id:?}"),
            Self::ByVisibleLabel { label, role } => write!(f, "{role} labelled {label:?}"),
        }
    }
}

/// The path from a found element up to the search root, captured at discovery time.
///
/// Index 0 is the element itself; the last entry is the root the search started from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lineage {
    path: SmallVec<[ElementHandle; 8]>,
}

impl Lineage {
    pub(crate) fn from_path(path: SmallVec<[ElementHandle; 8]>) -> Self {
        Self { path }
    }

    pub fn element(&self) -> Option<&ElementHandle> {
        self.path.first()
    }

    /// Ancestors from nearest to farthest.
    pub fn ancestors(&self) -> &[ElementHandle] {
        self.path.get(1..).unwrap_or(&[])
    }

    /// Nearest ancestor with `role`, scanning the snapshot without touching the live tree.
    pub fn first_ancestor(&self, role: &Role) -> Option<&ElementHandle> {
        self.ancestors().iter().find(|handle| handle.role() == role)
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ElementHandle> {
        self.path.iter()
    }
}

/// Node attributes the engine reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attribute {
    Identifier,
    Title,
    Description,
    Value,
    MinValue,
    MaxValue,
    Selected,
    Enabled,
}

impl Attribute {
    pub fn as_ax_str(self) -> &'static str {
        match self {
            Self::Identifier => "AXIdentifier",
            Self::Title => "AXTitle",
            Self::Description => "AXDescription",
            Self::Value => "AXValue",
            Self::MinValue => "AXMinValue",
            Self::MaxValue => "AXMaxValue",
            Self::Selected => "AXSelected",
            Self::Enabled => "AXEnabled",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ax_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl AttrValue {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Actions a node can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Press,
    Increment,
    Decrement,
    Cancel,
}

impl Action {
    pub fn as_ax_str(self) -> &'static str {
        match self {
            Self::Press => "AXPress",
            Self::Increment => "AXIncrement",
            Self::Decrement => "AXDecrement",
            Self::Cancel => "AXCancel",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ax_str())
    }
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use super::element::{Action, Attribute, ElementId};
use super::role::Role;

/// Failure of a single tree query or control accessor.
///
/// Accessors never substitute a default for a missing or mistyped value; they report one of
/// these instead.
#[derive(Debug, Clone, PartialEq)]
pub enum AxError {
    /// The node was destroyed or restructured since the handle was issued.
    Stale { element: ElementId },
    WrongRole {
        element: ElementId,
        expected: Role,
        found: Role,
    },
    MissingAttribute {
        element: ElementId,
        attribute: Attribute,
    },
    AttributeType {
        element: ElementId,
        attribute: Attribute,
        expected: &'static str,
        found: &'static str,
    },
    /// More than one child matched where exactly one was required.
    Ambiguous {
        parent: ElementId,
        role: Role,
        count: usize,
    },
    /// A labelled item (menu item, radio button) does not exist.
    NoSuchItem { element: ElementId, label: String },
    Unsupported { element: ElementId, action: Action },
    /// Platform-level failure (permission denied, app not running, ...).
    Backend(String),
}

impl fmt::Display for AxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stale { element } => write!(f, "element {element} is no longer in the tree"),
            Self::WrongRole {
                element,
                expected,
                found,
            } => write!(f, "element {element} has role {found}, expected {expected}"),
            Self::MissingAttribute { element, attribute } => {
                write!(f, "element {element} has no {attribute}")
            }
            Self::AttributeType {
                element,
                attribute,
                expected,
                found,
            } => write!(
                f,
                "element {element} {attribute} is a {found}, expected a {expected}"
            ),
            Self::Ambiguous {
                parent,
                role,
                count,
            } => write!(f, "element {parent} has {count} {role} children, expected one"),
            Self::NoSuchItem { element, label } => {
                write!(f, "element {element} has no item labelled {label:?}")
            }
            Self::Unsupported { element, action } => {
                write!(f, "element {element} does not support {action}")
            }
            Self::Backend(message) => write!(f, "accessibility backend error: {message}"),
        }
    }
}

impl std::error::Error for AxError {}

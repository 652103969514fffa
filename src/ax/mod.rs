// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Accessibility tree adapter.
//!
//! A foreign application's UI is reached only through non-owning [`ElementHandle`]s that the
//! backend revalidates on every call. Searches capture a [`Lineage`] so ancestor lookups do not
//! depend on the live tree still exposing parents.

pub mod controls;
pub mod element;
pub mod error;
pub mod memory;
pub mod role;
pub mod tree;

pub use controls::{Button, Checkbox, PopUpButton, RadioGroup, Row, Slider, Window};
pub use element::{
    Action, AttrValue, Attribute, ElementHandle, ElementId, ElementIdentifier, Lineage,
};
pub use error::AxError;
pub use memory::{MemoryTree, NodeSpec};
pub use role::Role;
pub use tree::{AccessibilityTree, TreeQuery};

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smallvec::SmallVec;

use super::element::{Action, AttrValue, Attribute, ElementHandle, ElementIdentifier, Lineage};
use super::error::AxError;
use super::role::Role;

/// Primitive access to a foreign accessibility tree.
///
/// Implementations translate these calls to the platform and must revalidate every handle they
/// receive. No composition policy belongs here; searching and control semantics are layered on
/// top by [`TreeQuery`] and the control wrappers.
pub trait AccessibilityTree: Send + Sync {
    /// The target application's main window, if it currently has one.
    fn main_window(&self) -> Result<Option<ElementHandle>, AxError>;

    fn children(&self, element: &ElementHandle) -> Result<Vec<ElementHandle>, AxError>;

    fn attribute(
        &self,
        element: &ElementHandle,
        attribute: Attribute,
    ) -> Result<Option<AttrValue>, AxError>;

    fn set_attribute(
        &self,
        element: &ElementHandle,
        attribute: Attribute,
        value: AttrValue,
    ) -> Result<(), AxError>;

    fn perform(&self, element: &ElementHandle, action: Action) -> Result<(), AxError>;

    /// Whether the target application's process is running.
    ///
    /// A tree attached to a live process has nothing to launch, hence the default.
    fn is_running(&self) -> Result<bool, AxError> {
        Ok(true)
    }

    /// Starts the target application; its window may appear later.
    fn launch(&self) -> Result<(), AxError> {
        Err(AxError::Backend("launching the application is not supported".to_owned()))
    }

    fn terminate(&self) -> Result<(), AxError> {
        Err(AxError::Backend("terminating the application is not supported".to_owned()))
    }
}

/// Searches and typed reads composed from [`AccessibilityTree`] primitives.
pub trait TreeQuery: AccessibilityTree {
    /// Reads a text attribute; a present value of another kind is an error.
    fn text_attribute(
        &self,
        element: &ElementHandle,
        attribute: Attribute,
    ) -> Result<Option<String>, AxError> {
        match self.attribute(element, attribute)? {
            None => Ok(None),
            Some(AttrValue::Text(text)) => Ok(Some(text)),
            Some(other) => Err(AxError::AttributeType {
                element: element.id(),
                attribute,
                expected: "text",
                found: other.kind(),
            }),
        }
    }

    fn matches(
        &self,
        element: &ElementHandle,
        identifier: &ElementIdentifier,
    ) -> Result<bool, AxError> {
        match identifier {
            ElementIdentifier::ByStableId(id) => {
                Ok(self.text_attribute(element, Attribute::Identifier)?.as_deref() == Some(id))
            }
            ElementIdentifier::ByVisibleLabel { label, role } => {
                if element.role() != role {
                    return Ok(false);
                }
                Ok(self.text_attribute(element, Attribute::Description)?.as_deref()
                    == Some(label.as_str()))
            }
        }
    }

    /// First descendant of `root` matching `identifier`, breadth first.
    ///
    /// `max_depth` of `Some(1)` only considers direct children; `None` is unbounded.
    fn descendant(
        &self,
        root: &ElementHandle,
        identifier: &ElementIdentifier,
        max_depth: Option<usize>,
    ) -> Result<Option<ElementHandle>, AxError> {
        Ok(self
            .descendant_with_lineage(root, identifier, max_depth)?
            .map(|(found, _)| found))
    }

    /// Like [`TreeQuery::descendant`], also returning the path back to `root` as seen during
    /// the search.
    ///
    /// Nodes that disappear while the search runs are treated as non-matching; only a stale
    /// `root` is an error.
    fn descendant_with_lineage(
        &self,
        root: &ElementHandle,
        identifier: &ElementIdentifier,
        max_depth: Option<usize>,
    ) -> Result<Option<(ElementHandle, Lineage)>, AxError> {
        // (handle, parent index, depth); parents are recorded so lineages can be rebuilt.
        let mut visited: Vec<(ElementHandle, Option<usize>, usize)> =
            vec![(root.clone(), None, 0)];
        let mut cursor = 0;

        while cursor < visited.len() {
            let depth = visited[cursor].2;
            if max_depth.is_some_and(|max| depth >= max) {
                cursor += 1;
                continue;
            }

            let children = match self.children(&visited[cursor].0) {
                Ok(children) => children,
                Err(AxError::Stale { .. }) if cursor > 0 => {
                    cursor += 1;
                    continue;
                }
                Err(err) => return Err(err),
            };

            for child in children {
                let matched = match self.matches(&child, identifier) {
                    Ok(matched) => matched,
                    Err(AxError::Stale { .. }) => continue,
                    Err(err) => return Err(err),
                };
                visited.push((child, Some(cursor), depth + 1));
                if matched {
                    let found = visited.len() - 1;
                    return Ok(Some(lineage_of(&visited, found)));
                }
            }
            cursor += 1;
        }

        Ok(None)
    }

    fn children_with_role(
        &self,
        parent: &ElementHandle,
        role: &Role,
    ) -> Result<Vec<ElementHandle>, AxError> {
        Ok(self
            .children(parent)?
            .into_iter()
            .filter(|child| child.role() == role)
            .collect())
    }

    fn first_child(
        &self,
        parent: &ElementHandle,
        role: &Role,
    ) -> Result<Option<ElementHandle>, AxError> {
        Ok(self
            .children(parent)?
            .into_iter()
            .find(|child| child.role() == role))
    }

    /// The single child with `role`; more than one is an error rather than `None`.
    fn only_child(
        &self,
        parent: &ElementHandle,
        role: &Role,
    ) -> Result<Option<ElementHandle>, AxError> {
        let mut matches = self.children_with_role(parent, role)?;
        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            count => Err(AxError::Ambiguous {
                parent: parent.id(),
                role: role.clone(),
                count,
            }),
        }
    }

    fn title(&self, element: &ElementHandle) -> Result<Option<String>, AxError> {
        self.text_attribute(element, Attribute::Title)
    }
}

impl<T: AccessibilityTree + ?Sized> TreeQuery for T {}

fn lineage_of(
    visited: &[(ElementHandle, Option<usize>, usize)],
    found: usize,
) -> (ElementHandle, Lineage) {
    let mut path: SmallVec<[ElementHandle; 8]> = SmallVec::new();
    let mut next = Some(found);
    while let Some(ix) = next {
        let (handle, parent, _) = &visited[ix];
        path.push(handle.clone());
        next = *parent;
    }
    (visited[found].0.clone(), Lineage::from_path(path))
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use crate::ax::AxError;

#[derive(Debug, Clone, PartialEq)]
pub enum NavigationError {
    /// Navigation ended in a state that is neither the target nor a recognizable failure.
    Unspecified { reason: String },
    /// A condition never became true within the budget.
    Timeout { waiting_for: String },
    /// The application's UI is not shaped as expected (missing split view, toolbar, row, ...).
    ShapeMismatch { expected: String },
    Accessibility(AxError),
}

impl NavigationError {
    pub(crate) fn unspecified(reason: impl Into<String>) -> Self {
        Self::Unspecified {
            reason: reason.into(),
        }
    }

    pub(crate) fn timeout(waiting_for: impl Into<String>) -> Self {
        Self::Timeout {
            waiting_for: waiting_for.into(),
        }
    }

    pub(crate) fn shape(expected: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            expected: expected.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unspecified { reason } => write!(f, "navigation failed: {reason}"),
            Self::Timeout { waiting_for } => {
                write!(f, "timed out waiting for {waiting_for}")
            }
            Self::ShapeMismatch { expected } => {
                write!(f, "settings window has unexpected shape: missing {expected}")
            }
            Self::Accessibility(source) => write!(f, "accessibility error: {source}"),
        }
    }
}

impl std::error::Error for NavigationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Accessibility(source) => Some(source),
            _ => None,
        }
    }
}

impl From<AxError> for NavigationError {
    fn from(source: AxError) -> Self {
        Self::Accessibility(source)
    }
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ids::{IdError, SettingName, SolutionId};

/// The stable external identifier of a setting: `(solution, preference)`.
///
/// Persisted preference stores and handler registries all key off this pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PreferenceKey {
    solution: SolutionId,
    preference: SettingName,
}

impl PreferenceKey {
    pub fn new(solution: SolutionId, preference: SettingName) -> Self {
        Self {
            solution,
            preference,
        }
    }

    /// Convenience constructor validating both halves.
    pub fn parse(solution: &str, preference: &str) -> Result<Self, IdError> {
        Ok(Self::new(
            SolutionId::new(solution)?,
            SettingName::new(preference)?,
        ))
    }

    pub fn solution(&self) -> &SolutionId {
        &self.solution
    }

    pub fn preference(&self) -> &SettingName {
        &self.preference
    }
}

impl fmt::Display for PreferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.solution, self.preference)
    }
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;

use super::ids::{SettingName, SolutionId};
use super::setting::Setting;

/// A named collection of settings, kept in document order with a by-name index.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    id: SolutionId,
    settings: Vec<Setting>,
    by_name: HashMap<SettingName, usize>,
}

impl Solution {
    pub fn new(id: SolutionId) -> Self {
        Self {
            id,
            settings: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn id(&self) -> &SolutionId {
        &self.id
    }

    pub fn settings(&self) -> &[Setting] {
        &self.settings
    }

    pub fn setting(&self, name: &str) -> Option<&Setting> {
        self.by_name.get(name).map(|&ix| &self.settings[ix])
    }

    /// Inserts `setting`, replacing an existing setting of the same name in place.
    ///
    /// Returns the replaced setting, if any.
    pub fn insert(&mut self, setting: Setting) -> Option<Setting> {
        match self.by_name.get(setting.name()) {
            Some(&ix) => Some(std::mem::replace(&mut self.settings[ix], setting)),
            None => {
                self.by_name.insert(setting.name().clone(), self.settings.len());
                self.settings.push(setting);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}

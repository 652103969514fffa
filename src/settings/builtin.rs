// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::registry::{RegistryError, SettingsRegistry};

/// The schema document shipped with the binary.
pub const BUILTIN_SOLUTIONS: &str = include_str!("../../data/solutions.json");

pub fn builtin_registry() -> Result<SettingsRegistry, RegistryError> {
    SettingsRegistry::from_json_str(BUILTIN_SOLUTIONS)
}

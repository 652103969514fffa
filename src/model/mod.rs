// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Settings data model.
//!
//! Solutions group settings; a setting is addressed externally by its `(solution, preference)`
//! key and carries its type, default, handler strategy and optional finalizer.

pub mod ids;
pub mod key;
pub mod preferences;
pub mod setting;
pub mod solution;
pub mod value;

pub use ids::{Id, IdError, SettingName, SolutionId};
pub use key::PreferenceKey;
pub use preferences::Preferences;
pub use setting::{
    DefaultTypeMismatch, FinalizerDescriptor, HandlerDescriptor, Setting, Transform,
};
pub use solution::Solution;
pub use value::{ParseValueError, UnknownValueType, Value, ValueType};

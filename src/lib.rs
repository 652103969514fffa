// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Tiller: settings synchronization driven through a settings application's accessibility tree.
//!
//! The crate has two halves. The automation engine ([`wait`], [`ax`], [`nav`], [`automation`])
//! finds and drives controls of a foreign application. The sync pipeline ([`model`], [`settings`],
//! [`store`]) declares settings, resolves their handlers and runs apply/capture sessions.

pub mod automation;
pub mod ax;
pub mod config;
pub mod model;
pub mod nav;
pub mod settings;
pub mod sim;
pub mod store;
pub mod wait;

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Settings synchronization.
//!
//! A [`SettingsRegistry`] describes every setting; a [`SettingsContext`] resolves settings to
//! handlers and finalizers; [`ApplySession`] and [`CaptureSession`] drain batches through them
//! sequentially, turning per-setting failures into per-key results.

pub mod apply;
pub mod builtin;
pub mod capture;
pub mod context;
pub mod finalizer;
pub mod handler;
pub mod local_remote;
pub mod manager;
pub mod registry;
pub mod schema;
pub mod session;

pub use apply::ApplySession;
pub use builtin::{builtin_registry, BUILTIN_SOLUTIONS};
pub use capture::CaptureSession;
pub use context::{ClientHandlerFactory, SettingsContext, SettingsContextBuilder};
pub use finalizer::{Finalizer, FlushStoreFinalizer};
pub use handler::{HandlerError, LaunchedApplication, SettingHandler, WriteAdapter};
pub use local_remote::ReadLocalWriteRemote;
pub use manager::SettingsManager;
pub use registry::{RegistryError, SettingsRegistry};
pub use schema::{json_schema, SchemaDocument};
pub use session::{SessionError, SessionState};

#[cfg(test)]
mod tests;

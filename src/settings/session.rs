// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use super::handler::{HandlerError, SettingHandler};
use crate::model::{Setting, Value};

/// Lifecycle of a single-shot session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Finished,
}

impl SessionState {
    /// Moves `Idle` to `Running`; any other state rejects the run.
    pub(crate) fn begin(&mut self) -> Result<(), SessionError> {
        match self {
            Self::Idle => {
                *self = Self::Running;
                Ok(())
            }
            Self::Running => Err(SessionError::AlreadyRunning),
            Self::Finished => Err(SessionError::AlreadyFinished),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// A previous run never completed (its future was dropped mid-run).
    AlreadyRunning,
    AlreadyFinished,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRunning => f.write_str("session is already running"),
            Self::AlreadyFinished => f.write_str("session has already run"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Applies `value` after checking it against the setting's declared type.
pub(crate) async fn apply_typed(
    setting: &Setting,
    handler: &dyn SettingHandler,
    value: Value,
) -> Result<(), HandlerError> {
    let expected = setting.value_type();
    let found = value.value_type();
    let value = value.conform_to(expected).ok_or(HandlerError::TypeMismatch { expected, found })?;
    handler.apply(&value).await
}

/// Reads a value and rejects one that does not match the setting's declared type.
pub(crate) async fn read_typed(
    setting: &Setting,
    handler: &dyn SettingHandler,
) -> Result<Value, HandlerError> {
    let value = handler.read().await?;
    let expected = setting.value_type();
    let found = value.value_type();
    value.conform_to(expected).ok_or(HandlerError::TypeMismatch { expected, found })
}

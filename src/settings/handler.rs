// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use async_trait::async_trait;

use crate::ax::AxError;
use crate::model::{PreferenceKey, Value, ValueType};
use crate::nav::NavigationError;
use crate::store::StoreError;

/// Reads and writes one setting.
///
/// Both operations fail by default so a strategy only implements what it supports.
#[async_trait]
pub trait SettingHandler: Send + Sync {
    async fn apply(&self, _value: &Value) -> Result<(), HandlerError> {
        Err(HandlerError::Unsupported { operation: "apply" })
    }

    async fn read(&self) -> Result<Value, HandlerError> {
        Err(HandlerError::Unsupported { operation: "read" })
    }
}

/// Writes a value by driving the settings application.
#[async_trait]
pub trait WriteAdapter: Send + Sync {
    async fn apply(&self, value: &Value) -> Result<(), HandlerError>;
}

/// An application that write adapters launch when it is not already running.
///
/// An apply session forgets earlier launches when it starts and closes the application after
/// its finalizers only if the session itself launched it.
pub trait LaunchedApplication: Send + Sync {
    fn forget_launch(&self);

    /// Quits the application if it was launched since the last [`Self::forget_launch`].
    ///
    /// Returns whether it was closed.
    fn close_if_launched(&self) -> Result<bool, HandlerError>;
}

#[derive(Debug)]
pub enum HandlerError {
    TypeMismatch {
        expected: ValueType,
        found: ValueType,
    },
    NoWriteAdapter {
        key: PreferenceKey,
    },
    Unsupported {
        operation: &'static str,
    },
    /// A string setting with no stored value; there is no meaningful zero value to report.
    MissingValue {
        domain: String,
        key: String,
    },
    /// The value has no counterpart in the control (e.g. no menu item for it).
    Unmapped {
        value: Value,
    },
    OutOfRange {
        value: f64,
        min: f64,
        max: f64,
    },
    /// The control never reported the written value back.
    Verification {
        control: String,
    },
    Store(StoreError),
    Navigation(NavigationError),
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { expected, found } => {
                write!(f, "expected a {expected} value, got {found}")
            }
            Self::NoWriteAdapter { key } => write!(f, "no write adapter registered for {key}"),
            Self::Unsupported { operation } => write!(f, "handler does not support {operation}"),
            Self::MissingValue { domain, key } => {
                write!(f, "no value stored for {key} in {domain}")
            }
            Self::Unmapped { value } => write!(f, "value {value} has no matching control option"),
            Self::OutOfRange { value, min, max } => {
                write!(f, "value {value} is outside [{min}, {max}]")
            }
            Self::Verification { control } => {
                write!(f, "{control} did not report the written value")
            }
            Self::Store(source) => write!(f, "defaults store error: {source}"),
            Self::Navigation(source) => write!(f, "{source}"),
        }
    }
}

impl std::error::Error for HandlerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(source) => Some(source),
            Self::Navigation(source) => Some(source),
            _ => None,
        }
    }
}

impl From<StoreError> for HandlerError {
    fn from(source: StoreError) -> Self {
        Self::Store(source)
    }
}

impl From<NavigationError> for HandlerError {
    fn from(source: NavigationError) -> Self {
        Self::Navigation(source)
    }
}

impl From<AxError> for HandlerError {
    fn from(source: AxError) -> Self {
        Self::Navigation(NavigationError::Accessibility(source))
    }
}

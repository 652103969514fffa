// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use super::ids::SettingName;
use super::key::PreferenceKey;
use super::value::{Value, ValueType};

/// A controllable setting as declared by the schema document. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Setting {
    name: SettingName,
    value_type: ValueType,
    default: Option<Value>,
    handler: HandlerDescriptor,
    finalizer: Option<FinalizerDescriptor>,
}

impl Setting {
    /// Builds a setting; `default` must already conform to `value_type`.
    pub fn new(
        name: SettingName,
        value_type: ValueType,
        default: Option<Value>,
        handler: HandlerDescriptor,
    ) -> Result<Self, DefaultTypeMismatch> {
        if let Some(default) = &default {
            if default.value_type() != value_type {
                return Err(DefaultTypeMismatch {
                    declared: value_type,
                    found: default.value_type(),
                });
            }
        }
        Ok(Self {
            name,
            value_type,
            default,
            handler,
            finalizer: None,
        })
    }

    pub fn with_finalizer(mut self, finalizer: FinalizerDescriptor) -> Self {
        self.finalizer = Some(finalizer);
        self
    }

    pub fn name(&self) -> &SettingName {
        &self.name
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn handler(&self) -> &HandlerDescriptor {
        &self.handler
    }

    pub fn finalizer(&self) -> Option<&FinalizerDescriptor> {
        self.finalizer.as_ref()
    }

    /// Whether `value` equals the declared default, compared per declared type.
    ///
    /// A setting without a default never reports a default value, and a value of another type
    /// never equals the default.
    pub fn is_default(&self, value: &Value) -> bool {
        let Some(default) = &self.default else {
            return false;
        };
        match (self.value_type, default, value) {
            (ValueType::Boolean, Value::Bool(a), Value::Bool(b)) => a == b,
            (ValueType::Integer, Value::Integer(a), Value::Integer(b)) => a == b,
            (ValueType::Double, Value::Double(a), Value::Double(b)) => a == b,
            (ValueType::String, Value::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultTypeMismatch {
    pub declared: ValueType,
    pub found: ValueType,
}

impl fmt::Display for DefaultTypeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "default value is {} but the setting is declared {}",
            self.found, self.declared
        )
    }
}

impl std::error::Error for DefaultTypeMismatch {}

/// Which strategy reads and writes a setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerDescriptor {
    /// Custom code registered for this key.
    Client { key: PreferenceKey },
    /// Reads a local key/value store; writes by driving the settings application.
    ReadLocalWriteRemote {
        domain: String,
        key: String,
        transform: Option<Transform>,
        /// The key under which the write adapter is registered.
        adapter_key: PreferenceKey,
    },
}

/// Post-read transformation for [`HandlerDescriptor::ReadLocalWriteRemote`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    NegateBoolean,
}

impl Transform {
    /// Returns `None` when the value has a type the transform does not accept.
    pub fn apply(self, value: Value) -> Option<Value> {
        match (self, value) {
            (Self::NegateBoolean, Value::Bool(value)) => Some(Value::Bool(!value)),
            _ => None,
        }
    }
}

/// A post-batch action shared by one or more settings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FinalizerDescriptor {
    /// A finalizer registered by name at startup.
    Client { name: String },
    /// Flushes a local store domain once all writes are done.
    FlushStore { domain: String },
}

impl FinalizerDescriptor {
    /// Identity used to run each finalizer at most once per session.
    pub fn unique_representation(&self) -> String {
        match self {
            Self::Client { name } => format!("client:{name}"),
            Self::FlushStore { domain } => format!("flush_store:{domain}"),
        }
    }
}

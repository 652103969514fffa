// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use async_trait::async_trait;

use super::handler::{HandlerError, SettingHandler, WriteAdapter};
use crate::model::{PreferenceKey, Transform, Value, ValueType};
use crate::store::{DefaultsStore, StoreError};

/// Reads a setting from a local store and writes it through a [`WriteAdapter`].
pub struct ReadLocalWriteRemote {
    store: Arc<dyn DefaultsStore>,
    domain: String,
    key: String,
    transform: Option<Transform>,
    value_type: ValueType,
    adapter_key: PreferenceKey,
    adapter: Option<Arc<dyn WriteAdapter>>,
}

impl ReadLocalWriteRemote {
    pub fn new(
        store: Arc<dyn DefaultsStore>,
        domain: impl Into<String>,
        key: impl Into<String>,
        value_type: ValueType,
        adapter_key: PreferenceKey,
    ) -> Self {
        Self {
            store,
            domain: domain.into(),
            key: key.into(),
            transform: None,
            value_type,
            adapter_key,
            adapter: None,
        }
    }

    pub fn with_transform(mut self, transform: Option<Transform>) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_adapter(mut self, adapter: Option<Arc<dyn WriteAdapter>>) -> Self {
        self.adapter = adapter;
        self
    }

    // Missing numeric and boolean keys read as their zero value, as the platform store does.
    // A domain nothing was ever written to holds no keys at all.
    fn stored_value(&self) -> Result<Value, HandlerError> {
        let stored = match self.store.read(&self.domain, &self.key) {
            Ok(stored) => stored,
            Err(StoreError::UnknownDomain { .. }) => None,
            Err(err) => return Err(err.into()),
        };
        match (stored, self.value_type) {
            (None, ValueType::Boolean) => Ok(Value::Bool(false)),
            (None, ValueType::Integer) => Ok(Value::Integer(0)),
            (None, ValueType::Double) => Ok(Value::Double(0.0)),
            (None, ValueType::String) => Err(HandlerError::MissingValue {
                domain: self.domain.clone(),
                key: self.key.clone(),
            }),
            (Some(Value::Integer(flag)), ValueType::Boolean) => Ok(Value::Bool(flag != 0)),
            (Some(value), ty) => {
                let found = value.value_type();
                value.conform_to(ty).ok_or(HandlerError::TypeMismatch {
                    expected: ty,
                    found,
                })
            }
        }
    }
}

#[async_trait]
impl SettingHandler for ReadLocalWriteRemote {
    async fn apply(&self, value: &Value) -> Result<(), HandlerError> {
        let Some(adapter) = &self.adapter else {
            return Err(HandlerError::NoWriteAdapter {
                key: self.adapter_key.clone(),
            });
        };
        adapter.apply(value).await
    }

    async fn read(&self) -> Result<Value, HandlerError> {
        let value = self.stored_value()?;
        match self.transform {
            Some(transform) => {
                let found = value.value_type();
                transform.apply(value).ok_or(HandlerError::TypeMismatch {
                    expected: ValueType::Boolean,
                    found,
                })
            }
            None => Ok(value),
        }
    }
}

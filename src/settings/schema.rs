// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Wire format of the settings schema document.
//!
//! The document is a JSON array of solutions. Handler and finalizer records are internally
//! tagged by `type`; an unknown tag fails decoding of the whole document.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::{Value, ValueType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SchemaDocument {
    pub solutions: Vec<SolutionRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SolutionRecord {
    pub id: String,
    #[serde(default)]
    pub settings: Vec<SettingRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SettingRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub handler: HandlerRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finalizer: Option<FinalizerRecord>,
}

/// How a setting is read and written.
///
/// `solution`/`preference` name the key the strategy is registered under; both default to the
/// setting's own key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum HandlerRecord {
    Client {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        solution: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        preference: Option<String>,
    },
    ReadLocalWriteRemote {
        domain: String,
        key: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        transform: Option<TransformRecord>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        solution: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        preference: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransformRecord {
    NegateBoolean,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum FinalizerRecord {
    Client { name: String },
    FlushStore { domain: String },
}

/// JSON Schema of [`SchemaDocument`], pretty-printed.
pub fn json_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schemars::schema_for!(SchemaDocument))
}

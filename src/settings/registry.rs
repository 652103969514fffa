// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::schema::{
    FinalizerRecord, HandlerRecord, SchemaDocument, SettingRecord, SolutionRecord,
    TransformRecord,
};
use crate::model::{
    FinalizerDescriptor, HandlerDescriptor, PreferenceKey, Setting, SettingName, Solution,
    SolutionId, Transform,
};

/// All known solutions, indexed for `(solution, preference)` lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsRegistry {
    solutions: Vec<Solution>,
    by_id: HashMap<SolutionId, usize>,
}

impl SettingsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(raw: &str) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.extend_from_json_str(raw)?;
        Ok(registry)
    }

    pub fn load_path(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.extend_from_path(path)?;
        Ok(registry)
    }

    /// Adds every solution of `raw`.
    ///
    /// The document is validated completely before anything is added, so a bad document leaves
    /// the registry unchanged. Settings with an existing key replace the old entry.
    pub fn extend_from_json_str(&mut self, raw: &str) -> Result<(), RegistryError> {
        let document: SchemaDocument =
            serde_json::from_str(raw).map_err(|source| RegistryError::Json { path: None, source })?;
        self.extend(document)
    }

    pub fn extend_from_path(&mut self, path: impl AsRef<Path>) -> Result<(), RegistryError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document: SchemaDocument =
            serde_json::from_str(&raw).map_err(|source| RegistryError::Json {
                path: Some(path.to_path_buf()),
                source,
            })?;
        self.extend(document)
    }

    pub fn extend(&mut self, document: SchemaDocument) -> Result<(), RegistryError> {
        let solutions = document
            .solutions
            .into_iter()
            .map(build_solution)
            .collect::<Result<Vec<_>, _>>()?;

        for solution in solutions {
            match self.by_id.get(solution.id()) {
                Some(&ix) => {
                    for setting in solution.settings() {
                        self.solutions[ix].insert(setting.clone());
                    }
                }
                None => {
                    self.by_id.insert(solution.id().clone(), self.solutions.len());
                    self.solutions.push(solution);
                }
            }
        }
        Ok(())
    }

    pub fn solutions(&self) -> &[Solution] {
        &self.solutions
    }

    pub fn solution(&self, id: &str) -> Option<&Solution> {
        self.by_id.get(id).map(|&ix| &self.solutions[ix])
    }

    pub fn setting(&self, key: &PreferenceKey) -> Option<&Setting> {
        self.solution(key.solution().as_str())?
            .setting(key.preference().as_str())
    }

    /// Every setting key in document order.
    pub fn keys(&self) -> Vec<PreferenceKey> {
        self.solutions
            .iter()
            .flat_map(|solution| {
                solution
                    .settings()
                    .iter()
                    .map(|setting| {
                        PreferenceKey::new(solution.id().clone(), setting.name().clone())
                    })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.solutions.iter().map(Solution::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn build_solution(record: SolutionRecord) -> Result<Solution, RegistryError> {
    let id = SolutionId::new(record.id.clone()).map_err(|err| RegistryError::Invalid {
        solution: record.id.clone(),
        setting: None,
        reason: format!("invalid solution id: {err}"),
    })?;
    let mut solution = Solution::new(id.clone());
    for setting in record.settings {
        let name = setting.name.clone();
        let built = build_setting(&id, setting).map_err(|reason| RegistryError::Invalid {
            solution: record.id.clone(),
            setting: Some(name.clone()),
            reason,
        })?;
        if solution.insert(built).is_some() {
            return Err(RegistryError::Invalid {
                solution: record.id.clone(),
                setting: Some(name),
                reason: "duplicate setting name".to_owned(),
            });
        }
    }
    Ok(solution)
}

fn build_setting(solution: &SolutionId, record: SettingRecord) -> Result<Setting, String> {
    let name = SettingName::new(record.name).map_err(|err| format!("invalid setting name: {err}"))?;
    let own_key = PreferenceKey::new(solution.clone(), name.clone());

    let default = match record.default {
        Some(value) => {
            let found = value.value_type();
            Some(value.conform_to(record.value_type).ok_or_else(|| {
                format!(
                    "default value is {found} but the setting is declared {}",
                    record.value_type
                )
            })?)
        }
        None => None,
    };

    let handler = match record.handler {
        HandlerRecord::Client {
            solution,
            preference,
        } => HandlerDescriptor::Client {
            key: registered_key(&own_key, solution, preference)?,
        },
        HandlerRecord::ReadLocalWriteRemote {
            domain,
            key,
            transform,
            solution,
            preference,
        } => HandlerDescriptor::ReadLocalWriteRemote {
            domain,
            key,
            transform: transform.map(|TransformRecord::NegateBoolean| Transform::NegateBoolean),
            adapter_key: registered_key(&own_key, solution, preference)?,
        },
    };

    let setting = Setting::new(name, record.value_type, default, handler)
        .map_err(|err| err.to_string())?;
    Ok(match record.finalizer {
        Some(FinalizerRecord::Client { name }) => {
            setting.with_finalizer(FinalizerDescriptor::Client { name })
        }
        Some(FinalizerRecord::FlushStore { domain }) => {
            setting.with_finalizer(FinalizerDescriptor::FlushStore { domain })
        }
        None => setting,
    })
}

fn registered_key(
    own: &PreferenceKey,
    solution: Option<String>,
    preference: Option<String>,
) -> Result<PreferenceKey, String> {
    let solution = match solution {
        Some(solution) => {
            SolutionId::new(solution).map_err(|err| format!("invalid handler solution: {err}"))?
        }
        None => own.solution().clone(),
    };
    let preference = match preference {
        Some(preference) => SettingName::new(preference)
            .map_err(|err| format!("invalid handler preference: {err}"))?,
        None => own.preference().clone(),
    };
    Ok(PreferenceKey::new(solution, preference))
}

#[derive(Debug)]
pub enum RegistryError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },
    Invalid {
        solution: String,
        setting: Option<String>,
        reason: String,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json {
                path: Some(path),
                source,
            } => write!(f, "invalid schema document {path:?}: {source}"),
            Self::Json { path: None, source } => write!(f, "invalid schema document: {source}"),
            Self::Invalid {
                solution,
                setting: Some(setting),
                reason,
            } => write!(f, "invalid setting {solution}.{setting}: {reason}"),
            Self::Invalid {
                solution,
                setting: None,
                reason,
            } => write!(f, "invalid solution {solution}: {reason}"),
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Invalid { .. } => None,
        }
    }
}

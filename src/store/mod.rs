// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Local key/value stores ("defaults").
//!
//! Settings that cannot be written directly are still readable from the platform's local
//! preference domains. A store groups values by domain and key; writes are buffered until the
//! domain is flushed.

pub mod json_file;
pub mod memory;

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::model::Value;

pub use json_file::{JsonFileDefaults, WriteDurability};
pub use memory::MemoryDefaults;

/// A store of preference values grouped by domain.
pub trait DefaultsStore: Send + Sync {
    /// Reads `key` from `domain`.
    ///
    /// A missing key is `Ok(None)`; a domain the store has never seen is
    /// [`StoreError::UnknownDomain`].
    fn read(&self, domain: &str, key: &str) -> Result<Option<Value>, StoreError>;

    /// Writes `key` in `domain`, creating the domain if needed.
    fn write(&self, domain: &str, key: &str, value: Value) -> Result<(), StoreError>;

    /// Persists pending writes to `domain`.
    fn flush(&self, domain: &str) -> Result<(), StoreError>;

    fn domains(&self) -> Result<Vec<String>, StoreError>;

    fn flush_all(&self) -> Result<(), StoreError> {
        for domain in self.domains()? {
            self.flush(&domain)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    UnknownDomain {
        domain: String,
    },
    Poisoned,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::UnknownDomain { domain } => write!(f, "unknown defaults domain {domain:?}"),
            Self::Poisoned => f.write_str("defaults store lock poisoned"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::UnknownDomain { .. } | Self::Poisoned => None,
        }
    }
}

#[cfg(test)]
mod tests;

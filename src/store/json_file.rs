// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! A defaults store persisted as one JSON document: `{ "<domain>": { "<key>": <value> } }`.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use super::{DefaultsStore, StoreError};
use crate::model::Value;

type Domains = BTreeMap<String, BTreeMap<String, Value>>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Writes a temp file and renames it into place, without fsync.
    #[default]
    BestEffort,

    /// Additionally syncs the file contents and, on unix, the containing directory.
    Durable,
}

#[derive(Debug, Default)]
struct State {
    domains: Domains,
    dirty: BTreeSet<String>,
}

#[derive(Debug)]
pub struct JsonFileDefaults {
    path: PathBuf,
    durability: WriteDurability,
    state: Mutex<State>,
}

impl JsonFileDefaults {
    /// Loads `path`; a missing file starts an empty store that is created on first flush.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let domains = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice::<Domains>(&bytes).map_err(|source| {
                StoreError::Json {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => Domains::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(Self {
            path,
            durability: WriteDurability::default(),
            state: Mutex::new(State {
                domains,
                dirty: BTreeSet::new(),
            }),
        })
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl DefaultsStore for JsonFileDefaults {
    fn read(&self, domain: &str, key: &str) -> Result<Option<Value>, StoreError> {
        let state = self.lock()?;
        let values = state
            .domains
            .get(domain)
            .ok_or_else(|| StoreError::UnknownDomain {
                domain: domain.to_owned(),
            })?;
        Ok(values.get(key).cloned())
    }

    fn write(&self, domain: &str, key: &str, value: Value) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        state
            .domains
            .entry(domain.to_owned())
            .or_default()
            .insert(key.to_owned(), value);
        state.dirty.insert(domain.to_owned());
        Ok(())
    }

    /// Rewrites the whole document if `domain` has pending writes.
    fn flush(&self, domain: &str) -> Result<(), StoreError> {
        let mut state = self.lock()?;
        if !state.dirty.contains(domain) {
            return Ok(());
        }

        let mut contents =
            serde_json::to_vec_pretty(&state.domains).map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })?;
        contents.push(b'\n');
        write_atomic(&self.path, &contents, self.durability)?;

        // The document holds every domain, so everything pending is now on disk.
        state.dirty.clear();
        debug!(path = ?self.path, domain, "flushed defaults");
        Ok(())
    }

    fn domains(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.lock()?.domains.keys().cloned().collect())
    }
}

fn write_atomic(path: &Path, contents: &[u8], durability: WriteDurability) -> Result<(), StoreError> {
    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(|source| StoreError::Io {
        path: parent.clone(),
        source,
    })?;

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".tiller.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    file.write_all(contents).map_err(|source| StoreError::Io {
        path: tmp_path.clone(),
        source,
    })?;
    if durability == WriteDurability::Durable {
        file.sync_all().map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    }
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    #[cfg(unix)]
    if durability == WriteDurability::Durable {
        let dir = fs::File::open(&parent).map_err(|source| StoreError::Io {
            path: parent.clone(),
            source,
        })?;
        dir.sync_all().map_err(|source| StoreError::Io {
            path: parent.clone(),
            source,
        })?;
    }

    Ok(())
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tiller-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tiller and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ids::{SettingName, SolutionId};
use super::key::PreferenceKey;
use super::value::Value;

/// A snapshot of setting values grouped by solution, as produced by a capture.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    solutions: BTreeMap<SolutionId, BTreeMap<SettingName, Value>>,
}

impl Preferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &PreferenceKey) -> Option<&Value> {
        self.solutions
            .get(key.solution())
            .and_then(|values| values.get(key.preference()))
    }

    pub fn set(&mut self, key: &PreferenceKey, value: Value) {
        self.solutions
            .entry(key.solution().clone())
            .or_default()
            .insert(key.preference().clone(), value);
    }

    /// Removes `key`; a solution left without values is dropped entirely.
    pub fn remove(&mut self, key: &PreferenceKey) -> Option<Value> {
        let values = self.solutions.get_mut(key.solution())?;
        let removed = values.remove(key.preference());
        if values.is_empty() {
            self.solutions.remove(key.solution());
        }
        removed
    }

    pub fn contains(&self, key: &PreferenceKey) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.solutions.values().map(BTreeMap::len).sum()
    }

    /// All `(key, value)` pairs, ordered by solution then preference.
    pub fn key_values(&self) -> Vec<(PreferenceKey, Value)> {
        self.solutions
            .iter()
            .flat_map(|(solution, values)| {
                values.iter().map(move |(preference, value)| {
                    (
                        PreferenceKey::new(solution.clone(), preference.clone()),
                        value.clone(),
                    )
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Preferences;
    use crate::model::{PreferenceKey, Value};

    fn key(solution: &str, preference: &str) -> PreferenceKey {
        PreferenceKey::parse(solution, preference).expect("key")
    }

    #[test]
    fn remove_drops_empty_solution() {
        let mut prefs = Preferences::new();
        prefs.set(&key("display", "zoom"), Value::Double(1.0));
        assert_eq!(prefs.remove(&key("display", "zoom")), Some(Value::Double(1.0)));
        assert!(prefs.is_empty());
        assert_eq!(serde_json::to_string(&prefs).expect("encode"), "{\"solutions\":{}}");
    }

    #[test]
    fn key_values_are_sorted_and_complete() {
        let mut prefs = Preferences::new();
        prefs.set(&key("zoom", "style"), Value::Integer(1));
        prefs.set(&key("display", "invert"), Value::Bool(true));
        prefs.set(&key("display", "contrast.enabled"), Value::Bool(false));

        let keys: Vec<String> = prefs.key_values().iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(
            keys,
            vec!["display.contrast.enabled", "display.invert", "zoom.style"]
        );
        assert_eq!(prefs.len(), 3);
    }

    #[test]
    fn serde_round_trip_preserves_types() {
        let mut prefs = Preferences::new();
        prefs.set(&key("display", "cursor.size"), Value::Double(2.0));
        prefs.set(&key("display", "invert"), Value::Bool(true));
        let json = serde_json::to_string(&prefs).expect("encode");
        let decoded: Preferences = serde_json::from_str(&json).expect("decode");
        assert_eq!(decoded, prefs);
    }
}

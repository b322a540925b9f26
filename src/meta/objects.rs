use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Named metadata values attached to one subset of axes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetaObjects {
    values: BTreeMap<String, Value>,
}

impl MetaObjects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    pub fn insert_serialized<S: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &S,
    ) -> serde_json::Result<Option<Value>> {
        Ok(self.values.insert(key.into(), serde_json::to_value(value)?))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_as<D: DeserializeOwned>(&self, key: &str) -> Option<serde_json::Result<D>> {
        self.values
            .get(key)
            .map(|value| serde_json::from_value(value.clone()))
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Adds the entries of `other` whose keys are not present yet.
    /// Returns the keys that were already taken.
    pub fn merge_missing(&mut self, other: MetaObjects) -> Vec<String> {
        let mut conflicts = Vec::new();
        for (key, value) in other.values {
            if self.values.contains_key(&key) {
                conflicts.push(key);
            } else {
                self.values.insert(key, value);
            }
        }
        conflicts
    }
}

impl From<BTreeMap<String, Value>> for MetaObjects {
    fn from(values: BTreeMap<String, Value>) -> Self {
        Self { values }
    }
}

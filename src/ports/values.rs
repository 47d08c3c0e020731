// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One per-node array together with the unit it is expressed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortValue {
    pub values: Vec<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}

impl PortValue {
    pub fn new(values: Vec<f64>, unit: Option<&str>) -> Self {
        Self {
            values,
            unit: unit.map(str::to_string),
        }
    }

    /// A constant array of `count` entries.
    pub fn broadcast(value: f64, count: usize, unit: Option<&str>) -> Self {
        Self::new(vec![value; count], unit)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Newtype wrapper for a name -> value mapping passed in and out of computations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortValues(pub BTreeMap<String, PortValue>);

impl PortValues {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: PortValue) {
        self.0.insert(name.into(), value);
    }

    /// Builder-style insert, handy in tests and demos
    pub fn with(mut self, name: impl Into<String>, value: PortValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&PortValue> {
        self.0.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<PortValue> {
        self.0.remove(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PortValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, PortValue>> for PortValues {
    fn from(map: BTreeMap<String, PortValue>) -> Self {
        Self(map)
    }
}

impl From<PortValues> for BTreeMap<String, PortValue> {
    fn from(values: PortValues) -> Self {
        values.0
    }
}

impl IntoIterator for PortValues {
    type Item = (String, PortValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, PortValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

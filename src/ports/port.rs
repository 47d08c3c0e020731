// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;
use std::collections::BTreeMap;

/// Whether a port consumes or produces a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Input,
    Output,
}

/// A named, unit-tagged value slot on a stage.
///
/// `default` only matters for inputs: an input with a default that nothing
/// produces is filled with the default broadcast across the node batch
/// instead of being required from the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Port {
    pub name: String,
    pub unit: Option<String>,
    pub direction: Direction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<f64>,
}

impl Port {
    pub fn input(name: impl Into<String>, unit: Option<&str>) -> Self {
        Self {
            name: name.into(),
            unit: unit.map(str::to_string),
            direction: Direction::Input,
            default: None,
        }
    }

    pub fn output(name: impl Into<String>, unit: Option<&str>) -> Self {
        Self {
            name: name.into(),
            unit: unit.map(str::to_string),
            direction: Direction::Output,
            default: None,
        }
    }

    /// Attach a fallback value used when nothing is connected to this input.
    pub fn with_default(mut self, value: f64) -> Self {
        self.default = Some(value);
        self
    }
}

/// The realized set of inputs and outputs of one stage instance.
///
/// Ports are keyed by name so iteration order is deterministic, which keeps
/// everything derived from a manifest (the wiring map in particular)
/// reproducible between builds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PortManifest {
    inputs: BTreeMap<String, Port>,
    outputs: BTreeMap<String, Port>,
}

impl PortManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. A later port with the same name and direction
    /// replaces the earlier one, so names stay unique within a manifest.
    pub fn with(mut self, port: Port) -> Self {
        self.insert(port);
        self
    }

    pub fn insert(&mut self, port: Port) {
        let slot = match port.direction {
            Direction::Input => &mut self.inputs,
            Direction::Output => &mut self.outputs,
        };
        slot.insert(port.name.clone(), port);
    }

    pub fn inputs(&self) -> impl Iterator<Item = &Port> {
        self.inputs.values()
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Port> {
        self.outputs.values()
    }

    pub fn input(&self, name: &str) -> Option<&Port> {
        self.inputs.get(name)
    }

    pub fn output(&self, name: &str) -> Option<&Port> {
        self.outputs.get(name)
    }

    pub fn has_input(&self, name: &str) -> bool {
        self.inputs.contains_key(name)
    }

    pub fn has_output(&self, name: &str) -> bool {
        self.outputs.contains_key(name)
    }

    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.inputs.keys().map(String::as_str)
    }

    pub fn output_names(&self) -> impl Iterator<Item = &str> {
        self.outputs.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && self.outputs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_separates_directions() {
        let manifest = PortManifest::new()
            .with(Port::input("shaft_power", Some("hp")))
            .with(Port::output("shaft_power", Some("hp")))
            .with(Port::output("thrust", Some("lbf")));

        assert!(manifest.has_input("shaft_power"));
        assert!(manifest.has_output("shaft_power"));
        assert!(!manifest.has_input("thrust"));
        assert_eq!(manifest.outputs().count(), 2);
    }

    #[test]
    fn test_manifest_names_are_unique_per_direction() {
        let manifest = PortManifest::new()
            .with(Port::output("rpm", Some("rpm")))
            .with(Port::output("rpm", Some("rad/s")));

        assert_eq!(manifest.outputs().count(), 1);
        assert_eq!(manifest.output("rpm").unwrap().unit.as_deref(), Some("rad/s"));
    }

    #[test]
    fn test_manifest_iterates_in_name_order() {
        let manifest = PortManifest::new()
            .with(Port::input("velocity", None))
            .with(Port::input("density", None))
            .with(Port::input("rpm", None));

        let names: Vec<&str> = manifest.input_names().collect();
        assert_eq!(names, vec!["density", "rpm", "velocity"]);
    }
}

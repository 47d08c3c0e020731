// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::PipelineError;
use crate::ports::units;
use crate::ports::{ConventionRole, Direction, PortManifest};

/// Which resolution rule produced a binding. Recorded for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WiringRule {
    /// Promoted under its own name
    PassThrough,
    /// Kept inside its instance, neither exposed nor connectable
    Internal,
    /// Power-source thrust routed to the combiner
    TurboshaftThrust,
    /// Power-source output joined to a gearbox input
    ReductionLink,
    /// Rotational speed joined from power-source to gearbox
    RpmLink,
    /// Constant source bound in place of a computed value
    FixedValue,
    /// Computed value superseded by a fixed value
    OverrideDiscard,
    /// Gearbox `_out` port feeding a propeller input by canonical name
    ReductionOutput,
    /// Max-power propeller branch renames
    MaxPowerBranch,
    /// Propeller thrust routed to the combiner
    PropellerThrust,
    /// Combiner totals exposed under canonical thrust names
    Combiner,
}

/// A port on a named instance, e.g. `gearbox.rpm_in`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PortRef {
    pub instance: String,
    pub port: String,
}

impl PortRef {
    pub fn new(instance: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
            port: port.into(),
        }
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.instance, self.port)
    }
}

/// How one instance port is promoted into the pipeline namespace.
/// `promoted == None` means the port is internal to its instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortBinding {
    pub port: PortRef,
    pub direction: Direction,
    pub promoted: Option<String>,
    pub rule: WiringRule,
}

impl PortBinding {
    pub fn is_aliased(&self) -> bool {
        self.promoted.as_deref().is_some_and(|p| p != self.port.port)
    }
}

/// One producer -> consumer connection.
///
/// `alias` is set when either end was renamed to meet; a plain same-name
/// connection carries `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WiringEdge {
    pub producer: PortRef,
    pub consumer: PortRef,
    pub alias: Option<String>,
}

/// A promoted input that nothing inside the pipeline produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExposedInput {
    pub name: String,
    pub unit: Option<String>,
    pub default: Option<f64>,
    pub consumers: Vec<PortRef>,
}

impl ExposedInput {
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// A promoted output visible to callers of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExposedOutput {
    pub name: String,
    pub unit: Option<String>,
    pub producer: PortRef,
}

/// The complete, immutable result of port resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WiringMap {
    bindings: Vec<PortBinding>,
    edges: Vec<WiringEdge>,
    exposed_inputs: Vec<ExposedInput>,
    exposed_outputs: Vec<ExposedOutput>,
}

impl WiringMap {
    /// Derive edges and the exposed surface from per-port bindings.
    ///
    /// `manifests` must hold every instance named by `bindings`. Fails when two
    /// producers share a promoted name or when a connection joins units that
    /// cannot be converted.
    pub fn assemble(
        bindings: Vec<PortBinding>,
        manifests: &BTreeMap<&str, &PortManifest>,
    ) -> Result<Self, PipelineError> {
        let mut producers: BTreeMap<&str, Vec<&PortBinding>> = BTreeMap::new();
        for binding in bindings.iter().filter(|b| b.direction == Direction::Output) {
            if let Some(promoted) = binding.promoted.as_deref() {
                producers.entry(promoted).or_default().push(binding);
            }
        }

        for (name, sources) in &producers {
            if sources.len() > 1 {
                return Err(PipelineError::AmbiguousPort {
                    name: name.to_string(),
                    producers: sources.iter().map(|b| b.port.to_string()).collect(),
                });
            }
        }

        let unit_of = |port: &PortRef, direction: Direction| -> Option<String> {
            let manifest = manifests.get(port.instance.as_str())?;
            let found = match direction {
                Direction::Input => manifest.input(&port.port),
                Direction::Output => manifest.output(&port.port),
            };
            found.and_then(|p| p.unit.clone())
        };
        let default_of = |port: &PortRef| -> Option<f64> {
            manifests
                .get(port.instance.as_str())
                .and_then(|m| m.input(&port.port))
                .and_then(|p| p.default)
        };

        let mut edges = Vec::new();
        let mut unfed: BTreeMap<&str, Vec<&PortBinding>> = BTreeMap::new();
        for binding in bindings.iter().filter(|b| b.direction == Direction::Input) {
            let Some(promoted) = binding.promoted.as_deref() else {
                continue;
            };
            match producers.get(promoted).and_then(|p| p.first()) {
                Some(producer) => {
                    let from = unit_of(&producer.port, Direction::Output);
                    let to = unit_of(&binding.port, Direction::Input);
                    units::check_compatible(from.as_deref(), to.as_deref()).map_err(|source| {
                        PipelineError::UnitMismatch {
                            name: promoted.to_string(),
                            producer: producer.port.to_string(),
                            consumer: binding.port.to_string(),
                            source,
                        }
                    })?;

                    let alias = (producer.is_aliased() || binding.is_aliased())
                        .then(|| promoted.to_string());
                    edges.push(WiringEdge {
                        producer: producer.port.clone(),
                        consumer: binding.port.clone(),
                        alias,
                    });
                }
                None => unfed.entry(promoted).or_default().push(binding),
            }
        }

        let exposed_inputs = unfed
            .into_iter()
            .map(|(name, consumers)| {
                let first = &consumers[0].port;
                // Every consumer must carry a default for the input to be optional.
                let default = consumers
                    .iter()
                    .map(|c| default_of(&c.port))
                    .collect::<Option<Vec<f64>>>()
                    .and_then(|defaults| defaults.first().copied());
                ExposedInput {
                    name: name.to_string(),
                    unit: unit_of(first, Direction::Input),
                    default,
                    consumers: consumers.iter().map(|c| c.port.clone()).collect(),
                }
            })
            .collect();

        let exposed_outputs = producers
            .iter()
            .filter(|(name, _)| !ConventionRole::Discarded.matches(name))
            .map(|(name, sources)| ExposedOutput {
                name: name.to_string(),
                unit: unit_of(&sources[0].port, Direction::Output),
                producer: sources[0].port.clone(),
            })
            .collect();

        Ok(Self {
            bindings,
            edges,
            exposed_inputs,
            exposed_outputs,
        })
    }

    pub fn bindings(&self) -> &[PortBinding] {
        &self.bindings
    }

    pub fn edges(&self) -> &[WiringEdge] {
        &self.edges
    }

    pub fn exposed_inputs(&self) -> &[ExposedInput] {
        &self.exposed_inputs
    }

    pub fn exposed_outputs(&self) -> &[ExposedOutput] {
        &self.exposed_outputs
    }

    pub fn binding(&self, instance: &str, direction: Direction, port: &str) -> Option<&PortBinding> {
        self.bindings.iter().find(|b| {
            b.direction == direction && b.port.instance == instance && b.port.port == port
        })
    }

    /// Promoted name of an instance port, `None` when internal or unknown.
    pub fn promoted(&self, instance: &str, direction: Direction, port: &str) -> Option<&str> {
        self.binding(instance, direction, port)
            .and_then(|b| b.promoted.as_deref())
    }

    pub fn exposed_output(&self, name: &str) -> Option<&ExposedOutput> {
        self.exposed_outputs.iter().find(|o| o.name == name)
    }

    pub fn exposed_input(&self, name: &str) -> Option<&ExposedInput> {
        self.exposed_inputs.iter().find(|i| i.name == name)
    }

    /// The edge feeding a given consumer port, if any.
    pub fn edge_into(&self, instance: &str, port: &str) -> Option<&WiringEdge> {
        self.edges
            .iter()
            .find(|e| e.consumer.instance == instance && e.consumer.port == port)
    }

    /// True when any binding promotes something under `name`.
    pub fn mentions(&self, name: &str) -> bool {
        self.bindings
            .iter()
            .any(|b| b.promoted.as_deref() == Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::Port;

    fn binding(instance: &str, direction: Direction, port: &str, promoted: Option<&str>) -> PortBinding {
        PortBinding {
            port: PortRef::new(instance, port),
            direction,
            promoted: promoted.map(str::to_string),
            rule: WiringRule::PassThrough,
        }
    }

    #[test]
    fn test_same_name_connection_has_no_alias() {
        let source = PortManifest::new().with(Port::output("shaft_power", Some("hp")));
        let sink = PortManifest::new().with(Port::input("shaft_power", Some("kW")));
        let manifests = BTreeMap::from([("source", &source), ("sink", &sink)]);

        let map = WiringMap::assemble(
            vec![
                binding("source", Direction::Output, "shaft_power", Some("shaft_power")),
                binding("sink", Direction::Input, "shaft_power", Some("shaft_power")),
            ],
            &manifests,
        )
        .unwrap();

        assert_eq!(map.edges().len(), 1);
        assert_eq!(map.edges()[0].alias, None);
        assert!(map.exposed_inputs().is_empty());
        assert_eq!(map.exposed_outputs()[0].unit.as_deref(), Some("hp"));
    }

    #[test]
    fn test_two_producers_for_one_name_is_ambiguous() {
        let a = PortManifest::new().with(Port::output("torque", None));
        let b = PortManifest::new().with(Port::output("torque", None));
        let manifests = BTreeMap::from([("a", &a), ("b", &b)]);

        let err = WiringMap::assemble(
            vec![
                binding("a", Direction::Output, "torque", Some("torque")),
                binding("b", Direction::Output, "torque", Some("torque")),
            ],
            &manifests,
        )
        .unwrap_err();

        assert!(matches!(err, PipelineError::AmbiguousPort { ref name, .. } if name == "torque"));
    }

    #[test]
    fn test_incompatible_units_rejected_at_wiring() {
        let source = PortManifest::new().with(Port::output("rpm", Some("rpm")));
        let sink = PortManifest::new().with(Port::input("rpm", Some("lbf")));
        let manifests = BTreeMap::from([("source", &source), ("sink", &sink)]);

        let err = WiringMap::assemble(
            vec![
                binding("source", Direction::Output, "rpm", Some("rpm")),
                binding("sink", Direction::Input, "rpm", Some("rpm")),
            ],
            &manifests,
        )
        .unwrap_err();

        assert!(matches!(err, PipelineError::UnitMismatch { .. }));
    }

    #[test]
    fn test_discarded_outputs_are_not_exposed_and_unfed_inputs_are() {
        let source = PortManifest::new().with(Port::output("rpm", Some("rpm")));
        let sink = PortManifest::new()
            .with(Port::input("velocity", Some("ft/s")))
            .with(Port::input("bias", None).with_default(0.0));
        let manifests = BTreeMap::from([("source", &source), ("sink", &sink)]);

        let map = WiringMap::assemble(
            vec![
                binding("source", Direction::Output, "rpm", Some("AUTO_OVERRIDE:rpm")),
                binding("sink", Direction::Input, "bias", Some("bias")),
                binding("sink", Direction::Input, "velocity", Some("velocity")),
            ],
            &manifests,
        )
        .unwrap();

        assert!(map.exposed_outputs().is_empty());
        let velocity = map.exposed_input("velocity").unwrap();
        assert!(velocity.is_required());
        assert_eq!(map.exposed_input("bias").unwrap().default, Some(0.0));
    }
}

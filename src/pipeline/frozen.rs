// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::errors::{EvaluationError, PipelineError};
use crate::observability::messages::pipeline::PipelineFrozen;
use crate::observability::messages::StructuredLog;
use crate::pipeline::states::StageInstance;
use crate::ports::{units, Direction, PortValue, PortValues};
use crate::traits::{BuildPhase, Computation};
use crate::wiring::WiringMap;

/// An instance input and where its value comes from.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundInput {
    pub port: String,
    /// Promoted name read from the value store; `None` when internal
    pub source: Option<String>,
    pub unit: Option<String>,
    pub default: Option<f64>,
}

/// An instance output and where its value is published.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundOutput {
    pub port: String,
    /// Promoted name written to the value store; `None` when internal
    pub target: Option<String>,
    pub unit: Option<String>,
}

/// One instance of a frozen pipeline with its ports bound to promoted names.
#[derive(Clone)]
pub struct FrozenInstance {
    id: String,
    computation: Arc<dyn Computation>,
    inputs: Vec<BoundInput>,
    outputs: Vec<BoundOutput>,
}

impl fmt::Debug for FrozenInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrozenInstance")
            .field("id", &self.id)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .finish()
    }
}

impl FrozenInstance {
    fn bind(instance: StageInstance, wiring: &WiringMap) -> Self {
        let manifest = instance.computation.manifest();
        let inputs = manifest
            .inputs()
            .map(|p| BoundInput {
                port: p.name.clone(),
                source: wiring
                    .promoted(&instance.id, Direction::Input, &p.name)
                    .map(str::to_string),
                unit: p.unit.clone(),
                default: p.default,
            })
            .collect();
        let outputs = manifest
            .outputs()
            .map(|p| BoundOutput {
                port: p.name.clone(),
                target: wiring
                    .promoted(&instance.id, Direction::Output, &p.name)
                    .map(str::to_string),
                unit: p.unit.clone(),
            })
            .collect();

        Self {
            id: instance.id,
            computation: instance.computation,
            inputs,
            outputs,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn inputs(&self) -> &[BoundInput] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[BoundOutput] {
        &self.outputs
    }

    pub fn computation(&self) -> Arc<dyn Computation> {
        Arc::clone(&self.computation)
    }

    /// Collect this instance's inputs from the value store.
    ///
    /// Values are converted into the input's unit. An input with nothing in
    /// the store falls back to its default, broadcast to `expected_len`
    /// (or a single value for batch phases).
    pub fn gather(
        &self,
        store: &PortValues,
        expected_len: Option<usize>,
    ) -> Result<PortValues, EvaluationError> {
        let mut gathered = PortValues::new();
        for input in &self.inputs {
            let available = input.source.as_deref().and_then(|s| store.get(s));
            let value = match (available, input.default) {
                (Some(value), _) => {
                    let values =
                        units::convert_all(&value.values, value.unit.as_deref(), input.unit.as_deref())
                            .map_err(|source| EvaluationError::UnitConversion {
                                instance: self.id.clone(),
                                port: input.port.clone(),
                                source,
                            })?;
                    PortValue::new(values, input.unit.as_deref())
                }
                (None, Some(default)) => {
                    PortValue::broadcast(default, expected_len.unwrap_or(1), input.unit.as_deref())
                }
                (None, None) => {
                    return Err(EvaluationError::MissingInput {
                        instance: self.id.clone(),
                        port: input.port.clone(),
                        promoted: input
                            .source
                            .clone()
                            .unwrap_or_else(|| format!("{}.{}", self.id, input.port)),
                    })
                }
            };
            self.check_len(&input.port, &value, expected_len)?;
            gathered.insert(input.port.clone(), value);
        }
        Ok(gathered)
    }

    /// Run the computation on already gathered inputs.
    pub fn run(&self, inputs: &PortValues) -> Result<PortValues, EvaluationError> {
        run_computation(&self.id, self.computation.as_ref(), inputs)
    }

    /// Check outputs against the manifest and publish the promoted ones.
    pub fn publish(
        &self,
        mut produced: PortValues,
        expected_len: Option<usize>,
        store: &mut PortValues,
    ) -> Result<(), EvaluationError> {
        for output in &self.outputs {
            let value = produced
                .remove(&output.port)
                .ok_or_else(|| EvaluationError::MissingOutput {
                    instance: self.id.clone(),
                    port: output.port.clone(),
                })?;
            self.check_len(&output.port, &value, expected_len)?;

            let Some(target) = &output.target else {
                continue;
            };
            let values =
                units::convert_all(&value.values, value.unit.as_deref(), output.unit.as_deref())
                    .map_err(|source| EvaluationError::UnitConversion {
                        instance: self.id.clone(),
                        port: output.port.clone(),
                        source,
                    })?;
            store.insert(target.clone(), PortValue::new(values, output.unit.as_deref()));
        }
        Ok(())
    }

    fn check_len(
        &self,
        port: &str,
        value: &PortValue,
        expected_len: Option<usize>,
    ) -> Result<(), EvaluationError> {
        match expected_len {
            Some(expected) if value.len() != expected => Err(EvaluationError::ShapeMismatch {
                instance: self.id.clone(),
                port: port.to_string(),
                expected,
                actual: value.len(),
            }),
            _ => Ok(()),
        }
    }
}

/// Shared by callers that move the computation onto another thread.
pub fn run_computation(
    instance: &str,
    computation: &dyn Computation,
    inputs: &PortValues,
) -> Result<PortValues, EvaluationError> {
    computation
        .compute(inputs)
        .map_err(|source| EvaluationError::ComputationFailed {
            instance: instance.to_string(),
            source,
        })
}

/// An immutable, evaluation-ready pipeline.
///
/// Instances are grouped into topological levels: every producer of an
/// instance sits in a strictly earlier level, so all instances within one
/// level are independent of each other.
#[derive(Debug, Clone)]
pub struct FrozenPipeline {
    phase: BuildPhase,
    node_count: Option<usize>,
    instances: Vec<FrozenInstance>,
    wiring: WiringMap,
    levels: Vec<Vec<usize>>,
}

impl FrozenPipeline {
    pub(crate) fn freeze(
        phase: BuildPhase,
        node_count: Option<usize>,
        instances: Vec<StageInstance>,
        wiring: WiringMap,
    ) -> Result<Self, PipelineError> {
        let ids: Vec<String> = instances.iter().map(|i| i.id.clone()).collect();
        let levels = topological_levels(&ids, &wiring)?;
        let instances: Vec<FrozenInstance> = instances
            .into_iter()
            .map(|i| FrozenInstance::bind(i, &wiring))
            .collect();

        let phase_label = phase.to_string();
        PipelineFrozen {
            phase: &phase_label,
            instance_count: instances.len(),
            level_count: levels.len(),
            node_count,
        }
        .log();

        Ok(Self {
            phase,
            node_count,
            instances,
            wiring,
            levels,
        })
    }

    pub fn phase(&self) -> BuildPhase {
        self.phase
    }

    /// Analysis points per evaluation; `None` for batch phases.
    pub fn node_count(&self) -> Option<usize> {
        self.node_count
    }

    pub fn wiring(&self) -> &WiringMap {
        &self.wiring
    }

    pub fn instances(&self) -> &[FrozenInstance] {
        &self.instances
    }

    pub fn instance(&self, id: &str) -> Option<&FrozenInstance> {
        self.instances.iter().find(|i| i.id == id)
    }

    pub fn instance_ids(&self) -> impl Iterator<Item = &str> {
        self.instances.iter().map(|i| i.id.as_str())
    }

    /// Instance indices grouped by topological level.
    pub fn levels(&self) -> &[Vec<usize>] {
        &self.levels
    }

    pub fn level_instances(&self, level: usize) -> impl Iterator<Item = &FrozenInstance> {
        self.levels
            .get(level)
            .into_iter()
            .flatten()
            .map(|&index| &self.instances[index])
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Names of exposed inputs a caller must supply.
    pub fn required_inputs(&self) -> impl Iterator<Item = &str> {
        self.wiring
            .exposed_inputs()
            .iter()
            .filter(|i| i.is_required())
            .map(|i| i.name.as_str())
    }

    /// Keep only the exposed outputs from a filled value store.
    pub fn exposed_outputs_from(&self, store: &mut PortValues) -> PortValues {
        self.wiring
            .exposed_outputs()
            .iter()
            .filter_map(|o| store.remove(&o.name).map(|v| (o.name.clone(), v)))
            .collect::<std::collections::BTreeMap<_, _>>()
            .into()
    }
}

/// Kahn's algorithm over instance dependencies derived from wiring edges.
fn topological_levels(ids: &[String], wiring: &WiringMap) -> Result<Vec<Vec<usize>>, PipelineError> {
    let index: HashMap<&str, usize> = ids.iter().enumerate().map(|(i, id)| (id.as_str(), i)).collect();

    let mut dependents: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); ids.len()];
    let mut self_loops = BTreeSet::new();
    for edge in wiring.edges() {
        let (Some(&producer), Some(&consumer)) = (
            index.get(edge.producer.instance.as_str()),
            index.get(edge.consumer.instance.as_str()),
        ) else {
            continue;
        };
        if producer == consumer {
            self_loops.insert(producer);
        } else {
            dependents[producer].insert(consumer);
        }
    }

    if !self_loops.is_empty() {
        return Err(PipelineError::CyclicWiring {
            instances: self_loops.into_iter().map(|i| ids[i].clone()).collect(),
        });
    }

    let mut in_degree = vec![0usize; ids.len()];
    for consumers in &dependents {
        for &consumer in consumers {
            in_degree[consumer] += 1;
        }
    }

    let mut levels = Vec::new();
    let mut current: Vec<usize> = (0..ids.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut placed = 0;
    while !current.is_empty() {
        placed += current.len();
        let mut next = Vec::new();
        for &node in &current {
            for &consumer in &dependents[node] {
                in_degree[consumer] -= 1;
                if in_degree[consumer] == 0 {
                    next.push(consumer);
                }
            }
        }
        next.sort_unstable();
        levels.push(current);
        current = next;
    }

    if placed != ids.len() {
        let instances = (0..ids.len())
            .filter(|&i| in_degree[i] > 0)
            .map(|i| ids[i].clone())
            .collect();
        return Err(PipelineError::CyclicWiring { instances });
    }

    Ok(levels)
}

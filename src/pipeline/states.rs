// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Build states of a pipeline.
//!
//! ```text
//! DeclaredPipeline --instantiate--> InstantiatedPipeline --wire--> WiredPipeline --freeze--> FrozenPipeline
//! ```
//!
//! Every transition consumes its input, so a pipeline cannot be wired before
//! all of its instances exist, nor evaluated before it is frozen.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::config::consts::{BASE_BRANCH_SUFFIX, FIXED_VALUE_SOURCE_ID, MAX_BRANCH_SUFFIX, RPM, RPM_UNIT};
use crate::errors::PipelineError;
use crate::observability::messages::pipeline::{StageInstantiated, StageOmitted};
use crate::observability::messages::StructuredLog;
use crate::pipeline::combiner::{CombinerKind, ThrustCombiner};
use crate::pipeline::config::{GearboxShape, PipelineConfig, PipelineOptions};
use crate::pipeline::fixed_source::FixedValueSource;
use crate::pipeline::frozen::FrozenPipeline;
use crate::ports::{Direction, PortManifest};
use crate::traits::{BuildPhase, Computation, Stage};
use crate::wiring::{
    Diagnostics, FixedValueOverride, InstanceRole, InstanceSpec, PortBinding, PortRef,
    PortResolver, WiringMap, WiringRule,
};

/// A realized computation placed in the pipeline under its own instance id.
#[derive(Clone)]
pub struct StageInstance {
    pub id: String,
    /// ID of the stage that built it; equals `id` except for branch copies
    /// and pipeline-generated instances
    pub stage_id: String,
    /// Per-node role; `None` in the pre and post phases
    pub role: Option<InstanceRole>,
    pub computation: Arc<dyn Computation>,
}

impl StageInstance {
    pub fn manifest(&self) -> &PortManifest {
        self.computation.manifest()
    }
}

impl fmt::Debug for StageInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageInstance")
            .field("id", &self.id)
            .field("stage_id", &self.stage_id)
            .field("role", &self.role)
            .finish()
    }
}

/// Stages and options as supplied, nothing built yet.
#[derive(Debug, Clone)]
pub struct DeclaredPipeline {
    config: PipelineConfig,
    options: PipelineOptions,
}

impl DeclaredPipeline {
    pub fn new(config: PipelineConfig, options: PipelineOptions) -> Self {
        Self { config, options }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// The fixed rpm source, if one is configured, with its value already in rpm.
    fn fixed_rpm_source(&self, node_count: usize) -> Result<Option<FixedValueSource>, PipelineError> {
        self.options
            .fixed_rpm
            .as_ref()
            .map(|fixed| {
                FixedValueSource::rpm(fixed.value, fixed.unit.as_deref(), node_count).map_err(|e| {
                    PipelineError::configuration(FIXED_VALUE_SOURCE_ID, RPM, e.to_string())
                })
            })
            .transpose()
    }

    fn realize(
        &self,
        stage: &Arc<dyn Stage>,
        phase: BuildPhase,
        node_count: usize,
        instance_id: String,
        role: Option<InstanceRole>,
    ) -> Result<Option<StageInstance>, PipelineError> {
        let options = self.options.stage_options.for_stage(stage.name());
        let phase_label = phase.to_string();
        let built = stage
            .build(phase, node_count, &options)
            .map_err(|source| PipelineError::StageBuild {
                stage: stage.name().to_string(),
                phase,
                source,
            })?;

        let Some(computation) = built else {
            StageOmitted {
                stage_id: stage.name(),
                phase: &phase_label,
            }
            .log();
            return Ok(None);
        };

        StageInstantiated {
            stage_id: stage.name(),
            instance_id: &instance_id,
            phase: &phase_label,
            input_count: computation.manifest().inputs().count(),
            output_count: computation.manifest().outputs().count(),
        }
        .log();

        Ok(Some(StageInstance {
            id: instance_id,
            stage_id: stage.name().to_string(),
            role,
            computation,
        }))
    }

    /// Build the per-node instances for `node_count` analysis points.
    ///
    /// The propeller is built twice: once for nominal power and once for
    /// maximum power. Both thrust combiners are always present.
    pub fn instantiate(self, node_count: usize) -> Result<InstantiatedPipeline, PipelineError> {
        let phase = BuildPhase::Node;
        let mut instances = Vec::new();

        let power_source = self.config.power_source();
        instances.extend(self.realize(
            power_source,
            phase,
            node_count,
            power_source.name().to_string(),
            Some(InstanceRole::PowerSource),
        )?);

        let mut fixed_override = None;
        if let Some(source) = self.fixed_rpm_source(node_count)? {
            fixed_override = Some(FixedValueOverride::rpm(source.value(), Some(RPM_UNIT), node_count));
            instances.push(StageInstance {
                id: FIXED_VALUE_SOURCE_ID.to_string(),
                stage_id: FIXED_VALUE_SOURCE_ID.to_string(),
                role: Some(InstanceRole::FixedValueSource),
                computation: Arc::new(source),
            });
        }

        if let GearboxShape::WithGearbox(gearbox) = self.config.gearbox() {
            instances.extend(self.realize(
                gearbox,
                phase,
                node_count,
                gearbox.name().to_string(),
                Some(InstanceRole::Gearbox),
            )?);
        }

        let propeller = self.config.propeller().stage();
        for (suffix, role) in [
            (BASE_BRANCH_SUFFIX, InstanceRole::PropellerBase),
            (MAX_BRANCH_SUFFIX, InstanceRole::PropellerMax),
        ] {
            let id = format!("{}{}", propeller.name(), suffix);
            instances.extend(self.realize(propeller, phase, node_count, id, Some(role))?);
        }

        for (kind, role) in [
            (CombinerKind::Nominal, InstanceRole::ThrustCombiner),
            (CombinerKind::Max, InstanceRole::MaxThrustCombiner),
        ] {
            instances.push(StageInstance {
                id: kind.instance_id().to_string(),
                stage_id: kind.instance_id().to_string(),
                role: Some(role),
                computation: Arc::new(ThrustCombiner::new(kind)),
            });
        }

        Ok(InstantiatedPipeline {
            node_count,
            fixed_override,
            instances,
        })
    }

    /// Build the pre- or post-batch pipeline.
    ///
    /// Each stage contributes at most one instance under its own stage ID.
    /// Ports are joined by identical names only. Stages with nothing to
    /// contribute are left out, so the result may be empty.
    pub fn build_batch(&self, phase: BuildPhase) -> Result<FrozenPipeline, PipelineError> {
        let mut instances = Vec::new();
        for stage in self.config.stages() {
            instances.extend(self.realize(stage, phase, 0, stage.name().to_string(), None)?);
        }

        let wiring = pass_through_wiring(&instances)?;
        WiredPipeline {
            phase,
            node_count: None,
            instances,
            wiring,
        }
        .freeze()
    }
}

/// Same-name joining for the batch phases.
fn pass_through_wiring(instances: &[StageInstance]) -> Result<WiringMap, PipelineError> {
    let mut bindings = Vec::new();
    for instance in instances {
        let manifest = instance.manifest();
        let ports = manifest
            .inputs()
            .map(|p| (Direction::Input, p.name.as_str()))
            .chain(manifest.outputs().map(|p| (Direction::Output, p.name.as_str())));
        for (direction, name) in ports {
            bindings.push(PortBinding {
                port: PortRef::new(instance.id.as_str(), name),
                direction,
                promoted: Some(name.to_string()),
                rule: WiringRule::PassThrough,
            });
        }
    }
    let manifests: BTreeMap<&str, &PortManifest> = instances
        .iter()
        .map(|i| (i.id.as_str(), i.manifest()))
        .collect();
    WiringMap::assemble(bindings, &manifests)
}

/// Every per-node instance exists; their manifests are final.
#[derive(Debug)]
pub struct InstantiatedPipeline {
    node_count: usize,
    fixed_override: Option<FixedValueOverride>,
    instances: Vec<StageInstance>,
}

impl InstantiatedPipeline {
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn instances(&self) -> &[StageInstance] {
        &self.instances
    }

    pub fn instance(&self, id: &str) -> Option<&StageInstance> {
        self.instances.iter().find(|i| i.id == id)
    }

    /// Resolve how instance ports connect. Override warnings go to `diagnostics`.
    pub fn wire(self, diagnostics: &mut Diagnostics) -> Result<WiredPipeline, PipelineError> {
        let wiring = {
            let specs: Vec<InstanceSpec<'_>> = self
                .instances
                .iter()
                .filter_map(|i| {
                    i.role.map(|role| InstanceSpec {
                        id: &i.id,
                        role,
                        manifest: i.manifest(),
                    })
                })
                .collect();
            PortResolver::new(self.fixed_override.clone()).resolve(&specs, diagnostics)?
        };

        Ok(WiredPipeline {
            phase: BuildPhase::Node,
            node_count: Some(self.node_count),
            instances: self.instances,
            wiring,
        })
    }
}

/// Instances plus their resolved wiring; not yet ordered for evaluation.
#[derive(Debug)]
pub struct WiredPipeline {
    phase: BuildPhase,
    node_count: Option<usize>,
    instances: Vec<StageInstance>,
    wiring: WiringMap,
}

impl WiredPipeline {
    pub fn wiring(&self) -> &WiringMap {
        &self.wiring
    }

    pub fn instances(&self) -> &[StageInstance] {
        &self.instances
    }

    /// Order instances for evaluation. Fails when the wiring has a cycle.
    pub fn freeze(self) -> Result<FrozenPipeline, PipelineError> {
        FrozenPipeline::freeze(self.phase, self.node_count, self.instances, self.wiring)
    }
}

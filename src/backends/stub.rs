// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::StageOptions;
use crate::errors::{ComputeError, StageBuildError};
use crate::ports::{Port, PortManifest, PortValue, PortValues};
use crate::traits::{Computation, Stage};

/// How a stub output is computed.
#[derive(Debug, Clone)]
pub enum StubOutput {
    /// The same value for every node
    Constant(f64),
    /// The named input, unchanged
    Copy(&'static str),
    /// The named input multiplied by a factor
    Scale(&'static str, f64),
}

/// Ports and output rules of one build phase of a [`StubStage`].
#[derive(Debug, Clone, Default)]
pub struct StubPhase {
    inputs: Vec<Port>,
    outputs: Vec<(Port, StubOutput)>,
    fail: bool,
}

impl StubPhase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(mut self, name: &str, unit: Option<&str>) -> Self {
        self.inputs.push(Port::input(name, unit));
        self
    }

    pub fn input_with_default(mut self, name: &str, unit: Option<&str>, default: f64) -> Self {
        self.inputs.push(Port::input(name, unit).with_default(default));
        self
    }

    pub fn output(mut self, name: &str, unit: Option<&str>, rule: StubOutput) -> Self {
        self.outputs.push((Port::output(name, unit), rule));
        self
    }

    /// Computations built from this phase fail when evaluated.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    fn build(&self, len: usize) -> Arc<dyn Computation> {
        let mut manifest = PortManifest::new();
        for port in &self.inputs {
            manifest.insert(port.clone());
        }
        for (port, _) in &self.outputs {
            manifest.insert(port.clone());
        }
        Arc::new(StubComputation {
            manifest,
            outputs: self.outputs.clone(),
            fail: self.fail,
            len,
        })
    }
}

/// A stage with hand-written manifests for wiring and executor tests.
pub struct StubStage {
    id: String,
    pre: Option<StubPhase>,
    node: Option<StubPhase>,
    post: Option<StubPhase>,
    node_builds: AtomicUsize,
    last_options: Mutex<Option<StageOptions>>,
}

impl StubStage {
    /// A stage whose per-node computation has no ports yet.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            pre: None,
            node: Some(StubPhase::new()),
            post: None,
            node_builds: AtomicUsize::new(0),
            last_options: Mutex::new(None),
        }
    }

    /// A stage that contributes nothing to the per-node phase.
    pub fn omitted(id: &str) -> Self {
        Self {
            node: None,
            ..Self::new(id)
        }
    }

    pub fn node(mut self, phase: StubPhase) -> Self {
        self.node = Some(phase);
        self
    }

    pub fn input(self, name: &str, unit: Option<&str>) -> Self {
        self.map_node(|p| p.input(name, unit))
    }

    pub fn input_with_default(self, name: &str, unit: Option<&str>, default: f64) -> Self {
        self.map_node(|p| p.input_with_default(name, unit, default))
    }

    pub fn output(self, name: &str, unit: Option<&str>, rule: StubOutput) -> Self {
        self.map_node(|p| p.output(name, unit, rule))
    }

    pub fn pre(mut self, phase: StubPhase) -> Self {
        self.pre = Some(phase);
        self
    }

    pub fn post(mut self, phase: StubPhase) -> Self {
        self.post = Some(phase);
        self
    }

    fn map_node(mut self, f: impl FnOnce(StubPhase) -> StubPhase) -> Self {
        self.node = Some(f(self.node.take().unwrap_or_default()));
        self
    }

    /// How many times `build_node` has been called.
    pub fn node_builds(&self) -> usize {
        self.node_builds.load(Ordering::SeqCst)
    }

    /// Options passed to the most recent build.
    pub fn last_options(&self) -> Option<StageOptions> {
        self.last_options.lock().unwrap().clone()
    }

    fn record(&self, options: &StageOptions) {
        *self.last_options.lock().unwrap() = Some(options.clone());
    }
}

impl Stage for StubStage {
    fn name(&self) -> &str {
        &self.id
    }

    fn build_pre(
        &self,
        options: &StageOptions,
    ) -> Result<Option<Arc<dyn Computation>>, StageBuildError> {
        self.record(options);
        Ok(self.pre.as_ref().map(|p| p.build(1)))
    }

    fn build_node(
        &self,
        node_count: usize,
        options: &StageOptions,
    ) -> Result<Option<Arc<dyn Computation>>, StageBuildError> {
        self.node_builds.fetch_add(1, Ordering::SeqCst);
        self.record(options);
        if let Some(reason) = options.get_str("reject").ok().flatten() {
            return Err(StageBuildError::InvalidOption {
                option: "reject".to_string(),
                reason: reason.to_string(),
            });
        }
        Ok(self.node.as_ref().map(|p| p.build(node_count)))
    }

    fn build_post(
        &self,
        options: &StageOptions,
    ) -> Result<Option<Arc<dyn Computation>>, StageBuildError> {
        self.record(options);
        Ok(self.post.as_ref().map(|p| p.build(1)))
    }
}

struct StubComputation {
    manifest: PortManifest,
    outputs: Vec<(Port, StubOutput)>,
    fail: bool,
    len: usize,
}

impl Computation for StubComputation {
    fn manifest(&self) -> &PortManifest {
        &self.manifest
    }

    fn compute(&self, inputs: &PortValues) -> Result<PortValues, ComputeError> {
        if self.fail {
            return Err(ComputeError::new("stub failure"));
        }

        let read = |name: &str| {
            inputs
                .get(name)
                .map(|v| v.values.clone())
                .ok_or_else(|| ComputeError::new(format!("missing input '{name}'")))
        };

        let mut out = PortValues::new();
        for (port, rule) in &self.outputs {
            let values = match rule {
                StubOutput::Constant(value) => vec![*value; self.len],
                StubOutput::Copy(name) => read(name)?,
                StubOutput::Scale(name, factor) => read(name)?.iter().map(|v| v * factor).collect(),
            };
            out.insert(port.name.clone(), PortValue::new(values, port.unit.as_deref()));
        }
        Ok(out)
    }
}

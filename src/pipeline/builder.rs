// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::PipelineError;
use crate::pipeline::config::{PipelineConfig, PipelineOptions};
use crate::pipeline::frozen::FrozenPipeline;
use crate::pipeline::states::DeclaredPipeline;
use crate::traits::BuildPhase;
use crate::wiring::Diagnostics;

/// Builds the three evaluation pipelines of a turboprop from one declaration.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use turboprop_composer::backends::local::{FixedPowerTurboshaft, SimpleGearbox};
/// use turboprop_composer::pipeline::{PipelineBuilder, PipelineConfig, PipelineOptions};
///
/// let config = PipelineConfig::new(Arc::new(FixedPowerTurboshaft::new("turboshaft")))
///     .with_gearbox(Arc::new(SimpleGearbox::new("gearbox")));
/// let builder = PipelineBuilder::new(config, PipelineOptions::default());
///
/// let (pipeline, diagnostics) = builder.build_node(3).unwrap();
/// assert_eq!(pipeline.node_count(), Some(3));
/// assert!(diagnostics.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    declared: DeclaredPipeline,
}

impl PipelineBuilder {
    pub fn new(config: PipelineConfig, options: PipelineOptions) -> Self {
        Self::from_declared(DeclaredPipeline::new(config, options))
    }

    pub fn from_declared(declared: DeclaredPipeline) -> Self {
        Self { declared }
    }

    pub fn declared(&self) -> &DeclaredPipeline {
        &self.declared
    }

    pub fn build_pre(&self) -> Result<FrozenPipeline, PipelineError> {
        self.declared.build_batch(BuildPhase::Pre)
    }

    /// Instantiate, wire and freeze the per-node pipeline.
    ///
    /// Diagnostics are emitted according to the configured verbosity and also
    /// returned so callers can inspect them.
    pub fn build_node(&self, node_count: usize) -> Result<(FrozenPipeline, Diagnostics), PipelineError> {
        let mut diagnostics = Diagnostics::new();
        let pipeline = self
            .declared
            .clone()
            .instantiate(node_count)?
            .wire(&mut diagnostics)?
            .freeze()?;
        diagnostics.emit(self.declared.options().verbosity);
        Ok((pipeline, diagnostics))
    }

    pub fn build_post(&self) -> Result<FrozenPipeline, PipelineError> {
        self.declared.build_batch(BuildPhase::Post)
    }
}

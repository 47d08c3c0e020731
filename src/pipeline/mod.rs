// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pipeline composition: from declared stages to a frozen, evaluation-ready
//! plan for each build phase.

mod builder;
mod combiner;
mod config;
mod fixed_source;
mod frozen;
mod states;

#[cfg(test)]
mod integration_tests;

pub use builder::PipelineBuilder;
pub use combiner::{CombinerKind, ThrustCombiner};
pub use config::{GearboxShape, PipelineConfig, PipelineOptions, PropellerChoice};
pub use fixed_source::FixedValueSource;
pub use frozen::{run_computation, BoundInput, BoundOutput, FrozenInstance, FrozenPipeline};
pub use states::{DeclaredPipeline, InstantiatedPipeline, StageInstance, WiredPipeline};

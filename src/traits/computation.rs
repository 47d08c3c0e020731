// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::ComputeError;
use crate::ports::{PortManifest, PortValues};

/// A runnable sub-computation produced by a stage build.
///
/// The manifest is fixed once the computation exists. `compute` receives its
/// inputs keyed by the computation's own port names, already converted into
/// each input port's unit, and returns values for its declared outputs.
/// Implementations are pure: the same inputs always yield the same outputs
/// and nothing is mutated, so one computation can be evaluated from several
/// tasks at once.
pub trait Computation: Send + Sync {
    fn manifest(&self) -> &PortManifest;

    fn compute(&self, inputs: &PortValues) -> Result<PortValues, ComputeError>;
}

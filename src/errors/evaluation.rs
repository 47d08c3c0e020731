// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::UnitError;
use thiserror::Error;

/// Failure reported by a stage's own computation. The pipeline does not try
/// to recover from these; they are passed through to the caller.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{0}")]
pub struct ComputeError(pub String);

impl ComputeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors that can occur while evaluating a frozen pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("Instance '{instance}' input '{port}' needs '{promoted}', which was neither produced nor supplied")]
    MissingInput {
        instance: String,
        port: String,
        promoted: String,
    },

    #[error("Instance '{instance}' did not produce declared output '{port}'")]
    MissingOutput { instance: String, port: String },

    #[error("Instance '{instance}' port '{port}' has {actual} values, expected {expected}")]
    ShapeMismatch {
        instance: String,
        port: String,
        expected: usize,
        actual: usize,
    },

    #[error("Instance '{instance}' port '{port}': {source}")]
    UnitConversion {
        instance: String,
        port: String,
        #[source]
        source: UnitError,
    },

    #[error("Instance '{instance}' failed: {source}")]
    ComputationFailed {
        instance: String,
        #[source]
        source: ComputeError,
    },

    #[error("Task for instance '{instance}' did not complete: {reason}")]
    TaskFailed { instance: String, reason: String },
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while building and wiring a pipeline.
//!
//! Every variant of [`PipelineError`] aborts construction: no partially wired
//! pipeline is ever returned.

use crate::traits::BuildPhase;
use thiserror::Error;

/// A unit name was not recognized, or two units cannot be converted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitError {
    #[error("unknown unit '{0}'")]
    Unknown(String),

    #[error("cannot convert '{from}' to '{to}'")]
    Incompatible { from: String, to: String },
}

/// A stage rejected the options it was asked to build with.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StageBuildError {
    #[error("missing required option '{option}'")]
    MissingOption { option: String },

    #[error("invalid option '{option}': {reason}")]
    InvalidOption { option: String, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// A required connection cannot be formed.
    #[error("Configuration error in stage '{stage}' at port '{port}': {reason}")]
    Configuration {
        stage: String,
        port: String,
        reason: String,
    },

    /// More than one producer resolves to the same promoted name.
    #[error("Ambiguous port '{name}': produced by {}", .producers.join(", "))]
    AmbiguousPort { name: String, producers: Vec<String> },

    /// Producer and consumer of a connection use unconvertible units.
    #[error("Unit mismatch on '{name}' from '{producer}' to '{consumer}': {source}")]
    UnitMismatch {
        name: String,
        producer: String,
        consumer: String,
        #[source]
        source: UnitError,
    },

    #[error("Stage '{stage}' failed to build its {phase} computation: {source}")]
    StageBuild {
        stage: String,
        phase: BuildPhase,
        #[source]
        source: StageBuildError,
    },

    #[error("Wiring contains a cycle between: {}", .instances.join(", "))]
    CyclicWiring { instances: Vec<String> },
}

impl PipelineError {
    pub fn configuration(
        stage: impl Into<String>,
        port: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Configuration {
            stage: stage.into(),
            port: port.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_names_stage_and_port() {
        let err = PipelineError::configuration("turboshaft", "rpm", "no RPM output");
        let msg = err.to_string();
        assert!(msg.contains("'turboshaft'"));
        assert!(msg.contains("'rpm'"));
    }

    #[test]
    fn test_ambiguous_port_lists_producers() {
        let err = PipelineError::AmbiguousPort {
            name: "torque".into(),
            producers: vec!["turboshaft.torque".into(), "gearbox.torque".into()],
        };
        assert_eq!(
            err.to_string(),
            "Ambiguous port 'torque': produced by turboshaft.torque, gearbox.torque"
        );
    }
}

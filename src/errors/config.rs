// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// Errors that can occur during pipeline configuration validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Two stage slots use the same stage ID
    DuplicateStageId {
        /// The duplicate stage ID
        stage_id: String,
    },
    /// A stage names an implementation the local factory does not provide
    UnknownStageImplementation {
        /// The stage carrying the unknown implementation name
        stage_id: String,
        /// The implementation name that couldn't be resolved
        impl_name: String,
    },
    /// Build options were supplied for a stage ID that is not configured
    UnknownStageOptionsTarget {
        /// The stage ID used as a key in `stage_options`
        stage_id: String,
    },
    /// A fixed value override cannot be materialized
    InvalidFixedValue {
        /// The port the override targets
        port: String,
        /// The configured value
        value: f64,
        /// Why the value was rejected
        reason: String,
    },
    /// A stage ID collides with an instance the pipeline creates itself
    ReservedStageId {
        /// The offending stage ID
        stage_id: String,
    },
    /// The number of analysis points must be at least one
    InvalidNodeCount {
        /// The configured count
        node_count: usize,
    },
    /// A unit name is not in the conversion table
    UnknownUnit {
        /// Where the unit was found
        context: String,
        /// The unrecognized unit
        unit: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateStageId { stage_id } => {
                write!(f, "Duplicate stage ID: '{}'", stage_id)
            }
            ValidationError::UnknownStageImplementation {
                stage_id,
                impl_name,
            } => {
                write!(
                    f,
                    "Stage '{}' uses unknown implementation '{}'",
                    stage_id, impl_name
                )
            }
            ValidationError::UnknownStageOptionsTarget { stage_id } => {
                write!(
                    f,
                    "Stage options supplied for '{}' but no stage with that ID is configured",
                    stage_id
                )
            }
            ValidationError::InvalidFixedValue {
                port,
                value,
                reason,
            } => {
                write!(f, "Invalid fixed value {} for '{}': {}", value, port, reason)
            }
            ValidationError::ReservedStageId { stage_id } => {
                write!(f, "Stage ID '{}' is reserved for a pipeline-generated instance", stage_id)
            }
            ValidationError::InvalidNodeCount { node_count } => {
                write!(f, "Node count must be at least 1, got {}", node_count)
            }
            ValidationError::UnknownUnit { context, unit } => {
                write!(f, "Unknown unit '{}' in {}", unit, context)
            }
        }
    }
}

impl ValidationError {
    /// Short machine-readable name of the variant, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::DuplicateStageId { .. } => "duplicate_stage_id",
            ValidationError::UnknownStageImplementation { .. } => "unknown_stage_implementation",
            ValidationError::UnknownStageOptionsTarget { .. } => "unknown_stage_options_target",
            ValidationError::InvalidFixedValue { .. } => "invalid_fixed_value",
            ValidationError::ReservedStageId { .. } => "reserved_stage_id",
            ValidationError::InvalidNodeCount { .. } => "invalid_node_count",
            ValidationError::UnknownUnit { .. } => "unknown_unit",
        }
    }

    /// The stage the error is about, if it concerns a single stage.
    pub fn stage_id(&self) -> Option<&str> {
        match self {
            ValidationError::DuplicateStageId { stage_id }
            | ValidationError::UnknownStageImplementation { stage_id, .. }
            | ValidationError::UnknownStageOptionsTarget { stage_id }
            | ValidationError::ReservedStageId { stage_id } => Some(stage_id),
            ValidationError::InvalidFixedValue { .. }
            | ValidationError::InvalidNodeCount { .. }
            | ValidationError::UnknownUnit { .. } => None,
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors returned while reading a configuration file from disk
#[derive(thiserror::Error, Debug)]
pub enum ConfigLoadError {
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration validation failed:\n{}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("\n"))]
    Invalid(Vec<ValidationError>),
}

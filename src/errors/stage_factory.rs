// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for stage instantiation from configuration.

use std::error::Error;
use std::fmt;

/// Errors that can occur while turning a stage configuration into a stage
#[derive(Debug, Clone, PartialEq)]
pub enum StageFactoryError {
    /// No built-in stage is registered under this implementation name
    UnknownImplementation { stage_id: String, impl_name: String },

    /// The implementation exists but refused its configuration
    CreationFailed {
        stage_id: String,
        impl_name: String,
        reason: String,
    },
}

impl fmt::Display for StageFactoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageFactoryError::UnknownImplementation {
                stage_id,
                impl_name,
            } => {
                write!(
                    f,
                    "Unknown stage implementation '{}' for stage '{}'",
                    impl_name, stage_id
                )
            }
            StageFactoryError::CreationFailed {
                stage_id,
                impl_name,
                reason,
            } => {
                write!(
                    f,
                    "Failed to create '{}' stage '{}': {}",
                    impl_name, stage_id, reason
                )
            }
        }
    }
}

impl Error for StageFactoryError {}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for configuration validation events.
//!
//! A configuration is checked once, before any stage is built. These
//! messages carry the configuration name so output from several files in one
//! run can be told apart:
//! * The checks starting, with the slot and node counts and any fixed rpm
//! * Each rejected setting, keyed by error kind and, where there is one, stage ID
//! * The outcome

use crate::errors::ValidationError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Validation of a loaded configuration is starting.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use turboprop_composer::observability::messages::validation::ValidationStarted;
///
/// let msg = ValidationStarted {
///     config_name: "geared-demo",
///     stage_count: 3,
///     node_count: 64,
///     fixed_rpm: Some(1500.0),
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Validating configuration 'geared-demo': 3 stages, 64 nodes, fixed rpm 1500"
/// );
/// ```
pub struct ValidationStarted<'a> {
    pub config_name: &'a str,
    pub stage_count: usize,
    pub node_count: usize,
    /// Configured fixed rotational speed, as written
    pub fixed_rpm: Option<f64>,
}

impl Display for ValidationStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Validating configuration '{}': {} stages, {} nodes",
            self.config_name, self.stage_count, self.node_count
        )?;
        if let Some(rpm) = self.fixed_rpm {
            write!(f, ", fixed rpm {}", rpm)?;
        }
        Ok(())
    }
}

impl StructuredLog for ValidationStarted<'_> {
    fn log(&self) {
        tracing::info!(
            config_name = self.config_name,
            stage_count = self.stage_count,
            node_count = self.node_count,
            fixed_rpm = self.fixed_rpm,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "config_validation",
            span_name = name,
            config_name = self.config_name,
            stage_count = self.stage_count,
            node_count = self.node_count,
        )
    }
}

/// Every check passed.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ValidationCompleted<'a> {
    pub config_name: &'a str,
    pub stage_count: usize,
}

impl Display for ValidationCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Configuration '{}' is valid ({} stages)",
            self.config_name, self.stage_count
        )
    }
}

impl StructuredLog for ValidationCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            config_name = self.config_name,
            stage_count = self.stage_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "config_validated",
            span_name = name,
            config_name = self.config_name,
        )
    }
}

/// One rejected setting. Logged once per error before the failure summary.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use turboprop_composer::errors::ValidationError;
/// use turboprop_composer::observability::messages::validation::ValidationErrorFound;
///
/// let error = ValidationError::ReservedStageId {
///     stage_id: "thrust_adder".into(),
/// };
/// let msg = ValidationErrorFound {
///     config_name: "geared-demo",
///     error: &error,
/// };
///
/// assert!(msg.to_string().starts_with("Configuration 'geared-demo': Stage ID 'thrust_adder'"));
/// ```
pub struct ValidationErrorFound<'a> {
    pub config_name: &'a str,
    pub error: &'a ValidationError,
}

impl Display for ValidationErrorFound<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Configuration '{}': {}", self.config_name, self.error)
    }
}

impl StructuredLog for ValidationErrorFound<'_> {
    fn log(&self) {
        tracing::error!(
            config_name = self.config_name,
            kind = self.error.kind(),
            stage_id = self.error.stage_id(),
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "config_validation_error",
            span_name = name,
            config_name = self.config_name,
            kind = self.error.kind(),
        )
    }
}

/// At least one check failed; the configuration will not be built.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use turboprop_composer::observability::messages::validation::ValidationFailed;
///
/// let msg = ValidationFailed {
///     config_name: "fixed-rpm-demo",
///     error_count: 2,
/// };
///
/// assert_eq!(msg.to_string(), "Configuration 'fixed-rpm-demo' rejected with 2 errors");
/// ```
pub struct ValidationFailed<'a> {
    pub config_name: &'a str,
    pub error_count: usize,
}

impl Display for ValidationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Configuration '{}' rejected with {} errors",
            self.config_name, self.error_count
        )
    }
}

impl StructuredLog for ValidationFailed<'_> {
    fn log(&self) {
        tracing::error!(
            config_name = self.config_name,
            error_count = self.error_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "config_rejected",
            span_name = name,
            config_name = self.config_name,
            error_count = self.error_count,
        )
    }
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for pipeline evaluation events.
//!
//! This module contains message types for logging events related to:
//! * Evaluation lifecycle (start, completion, failure)
//! * Level-by-level progress
//! * Executor strategy selection

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Evaluation started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use turboprop_composer::observability::messages::engine::EvaluationStarted;
///
/// let msg = EvaluationStarted {
///     strategy: "LevelByLevel",
///     instance_count: 7,
///     node_count: Some(20),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct EvaluationStarted<'a> {
    pub strategy: &'a str,
    pub instance_count: usize,
    pub node_count: Option<usize>,
}

impl Display for EvaluationStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting pipeline evaluation with {} strategy: {} instances",
            self.strategy, self.instance_count
        )?;
        if let Some(count) = self.node_count {
            write!(f, " over {} nodes", count)?;
        }
        Ok(())
    }
}

impl StructuredLog for EvaluationStarted<'_> {
    fn log(&self) {
        tracing::info!(
            strategy = self.strategy,
            instance_count = self.instance_count,
            node_count = self.node_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "evaluation",
            span_name = name,
            strategy = self.strategy,
            instance_count = self.instance_count,
            node_count = self.node_count,
        )
    }
}

/// Evaluation completed successfully.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use turboprop_composer::observability::messages::engine::EvaluationCompleted;
/// use std::time::Duration;
///
/// let msg = EvaluationCompleted {
///     strategy: "Sequential",
///     output_count: 9,
///     duration: Duration::from_millis(3),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct EvaluationCompleted<'a> {
    pub strategy: &'a str,
    pub output_count: usize,
    pub duration: std::time::Duration,
}

impl Display for EvaluationCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline evaluation completed with {} strategy: {} outputs in {:?}",
            self.strategy, self.output_count, self.duration
        )
    }
}

impl StructuredLog for EvaluationCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            strategy = self.strategy,
            output_count = self.output_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "evaluation_completed",
            span_name = name,
            strategy = self.strategy,
            output_count = self.output_count,
            duration = ?self.duration,
        )
    }
}

/// Evaluation failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct EvaluationFailed<'a> {
    pub strategy: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for EvaluationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline evaluation failed with {} strategy: {}",
            self.strategy, self.error
        )
    }
}

impl StructuredLog for EvaluationFailed<'_> {
    fn log(&self) {
        tracing::error!(
            strategy = self.strategy,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "evaluation_failed",
            span_name = name,
            strategy = self.strategy,
            error = %self.error,
        )
    }
}

/// One topological level finished evaluating.
///
/// # Log Level
/// `debug!` - Progress detail
pub struct LevelEvaluated<'a> {
    pub level: usize,
    pub instances: &'a [&'a str],
}

impl Display for LevelEvaluated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Level {} evaluated: [{}]",
            self.level,
            self.instances.join(", ")
        )
    }
}

impl StructuredLog for LevelEvaluated<'_> {
    fn log(&self) {
        tracing::debug!(
            level = self.level,
            instance_count = self.instances.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "level",
            span_name = name,
            level = self.level,
            instance_count = self.instances.len(),
        )
    }
}

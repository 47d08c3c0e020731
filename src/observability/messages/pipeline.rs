// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for pipeline construction events.
//!
//! This module contains message types for logging events related to:
//! * Stage instantiation for each build phase
//! * Stages omitted from a phase
//! * Port resolution and superseded bindings
//! * Fixed value overrides
//! * Freezing a pipeline for evaluation

use crate::observability::messages::StructuredLog;
use crate::wiring::WiringRule;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A stage build returned a computation for a phase.
///
/// # Log Level
/// `debug!` - Construction detail
///
/// # Example
/// ```
/// use turboprop_composer::observability::messages::pipeline::StageInstantiated;
///
/// let msg = StageInstantiated {
///     stage_id: "turboshaft",
///     instance_id: "turboshaft",
///     phase: "per-node",
///     input_count: 3,
///     output_count: 5,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct StageInstantiated<'a> {
    pub stage_id: &'a str,
    pub instance_id: &'a str,
    pub phase: &'a str,
    pub input_count: usize,
    pub output_count: usize,
}

impl Display for StageInstantiated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stage '{}' instantiated as '{}' for {} phase: {} inputs, {} outputs",
            self.stage_id, self.instance_id, self.phase, self.input_count, self.output_count
        )
    }
}

impl StructuredLog for StageInstantiated<'_> {
    fn log(&self) {
        tracing::debug!(
            stage_id = self.stage_id,
            instance_id = self.instance_id,
            phase = self.phase,
            input_count = self.input_count,
            output_count = self.output_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "stage_instantiated",
            span_name = name,
            stage_id = self.stage_id,
            instance_id = self.instance_id,
            phase = self.phase,
        )
    }
}

/// A stage had nothing to contribute to a phase and was left out.
///
/// # Log Level
/// `debug!` - Expected, not an error
pub struct StageOmitted<'a> {
    pub stage_id: &'a str,
    pub phase: &'a str,
}

impl Display for StageOmitted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stage '{}' has no {} computation, omitting it",
            self.stage_id, self.phase
        )
    }
}

impl StructuredLog for StageOmitted<'_> {
    fn log(&self) {
        tracing::debug!(
            stage_id = self.stage_id,
            phase = self.phase,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "stage_omitted",
            span_name = name,
            stage_id = self.stage_id,
            phase = self.phase,
        )
    }
}

/// A later resolution rule replaced the promotion chosen by an earlier one.
///
/// # Log Level
/// `trace!` - Resolution internals
pub struct BindingSuperseded<'a> {
    pub instance_id: &'a str,
    pub port: &'a str,
    pub previous: Option<&'a str>,
    pub previous_rule: WiringRule,
    pub rule: WiringRule,
}

impl Display for BindingSuperseded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Binding of '{}.{}' from {:?} (was '{}') superseded by {:?}",
            self.instance_id,
            self.port,
            self.previous_rule,
            self.previous.unwrap_or("<internal>"),
            self.rule
        )
    }
}

impl StructuredLog for BindingSuperseded<'_> {
    fn log(&self) {
        tracing::trace!(
            instance_id = self.instance_id,
            port = self.port,
            previous = self.previous,
            previous_rule = ?self.previous_rule,
            rule = ?self.rule,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!(
            "binding_superseded",
            span_name = name,
            instance_id = self.instance_id,
            port = self.port,
        )
    }
}

/// Port resolution finished.
///
/// # Log Level
/// `debug!` - Construction detail
pub struct WiringResolved {
    pub instance_count: usize,
    pub edge_count: usize,
    pub exposed_inputs: usize,
    pub exposed_outputs: usize,
}

impl Display for WiringResolved {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Wiring resolved across {} instances: {} edges, {} exposed inputs, {} exposed outputs",
            self.instance_count, self.edge_count, self.exposed_inputs, self.exposed_outputs
        )
    }
}

impl StructuredLog for WiringResolved {
    fn log(&self) {
        tracing::debug!(
            instance_count = self.instance_count,
            edge_count = self.edge_count,
            exposed_inputs = self.exposed_inputs,
            exposed_outputs = self.exposed_outputs,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "wiring_resolved",
            span_name = name,
            instance_count = self.instance_count,
            edge_count = self.edge_count,
        )
    }
}

/// A fixed value supersedes an output a stage computes itself.
///
/// # Log Level
/// `warn!` - Non-fatal, evaluation proceeds with the fixed value
///
/// # Example
/// ```
/// use turboprop_composer::observability::messages::pipeline::FixedValueOverrideApplied;
///
/// let msg = FixedValueOverrideApplied {
///     stage_id: "turboshaft",
///     port: "rpm",
///     value: 1200.0,
///     unit: Some("rpm"),
/// };
///
/// assert!(msg.to_string().contains("turboshaft"));
/// ```
pub struct FixedValueOverrideApplied<'a> {
    pub stage_id: &'a str,
    pub port: &'a str,
    pub value: f64,
    pub unit: Option<&'a str>,
}

impl Display for FixedValueOverrideApplied<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Overriding '{}' value output by stage '{}' with fixed value of {} {}",
            self.port,
            self.stage_id,
            self.value,
            self.unit.unwrap_or("")
        )
    }
}

impl StructuredLog for FixedValueOverrideApplied<'_> {
    fn log(&self) {
        tracing::warn!(
            stage_id = self.stage_id,
            port = self.port,
            value = self.value,
            unit = self.unit,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "fixed_value_override",
            span_name = name,
            stage_id = self.stage_id,
            port = self.port,
            value = self.value,
        )
    }
}

/// A pipeline reached its frozen state and is ready for evaluation.
///
/// # Log Level
/// `info!` - Important operational event
pub struct PipelineFrozen<'a> {
    pub phase: &'a str,
    pub instance_count: usize,
    pub level_count: usize,
    pub node_count: Option<usize>,
}

impl Display for PipelineFrozen<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Frozen {} pipeline: {} instances in {} levels",
            self.phase, self.instance_count, self.level_count
        )?;
        if let Some(count) = self.node_count {
            write!(f, ", {} nodes", count)?;
        }
        Ok(())
    }
}

impl StructuredLog for PipelineFrozen<'_> {
    fn log(&self) {
        tracing::info!(
            phase = self.phase,
            instance_count = self.instance_count,
            level_count = self.level_count,
            node_count = self.node_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "pipeline_frozen",
            span_name = name,
            phase = self.phase,
            instance_count = self.instance_count,
        )
    }
}

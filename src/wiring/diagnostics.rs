// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;
use std::fmt;

use crate::config::Verbosity;
use crate::observability::messages::pipeline::FixedValueOverrideApplied;
use crate::observability::messages::StructuredLog;

/// A non-fatal finding produced while wiring a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A fixed value supersedes an output the stage computes itself.
    OverrideWarning {
        stage: String,
        port: String,
        value: f64,
        unit: Option<String>,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::OverrideWarning {
                stage,
                port,
                value,
                unit,
            } => {
                write!(
                    f,
                    "Overriding '{}' value output by stage '{}' with fixed value of {}",
                    port, stage, value
                )?;
                if let Some(unit) = unit {
                    write!(f, " {}", unit)?;
                }
                Ok(())
            }
        }
    }
}

/// Append-only collection of diagnostics, passed into wiring by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// Log every diagnostic as a warning when `verbosity` is at least `Brief`.
    /// Returns how many were emitted.
    pub fn emit(&self, verbosity: Verbosity) -> usize {
        if verbosity < Verbosity::Brief {
            return 0;
        }

        for diagnostic in &self.entries {
            match diagnostic {
                Diagnostic::OverrideWarning {
                    stage,
                    port,
                    value,
                    unit,
                } => FixedValueOverrideApplied {
                    stage_id: stage,
                    port,
                    value: *value,
                    unit: unit.as_deref(),
                }
                .log(),
            }
        }
        self.entries.len()
    }
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit it at the right level with structured fields.
//!
//! # Organization
//!
//! * `pipeline` - build phases, port resolution and the override warning
//! * `engine` - evaluation lifecycle
//! * `validation` - configuration validation errors

use tracing::Span;

pub mod engine;
pub mod pipeline;
pub mod validation;

/// A log event that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the event.
    fn log(&self);

    /// Open a span carrying the event's fields.
    fn span(&self, name: &str) -> Span;
}

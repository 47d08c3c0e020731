// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! All diagnostic and operational logging in the crate goes through message
//! types defined here. Each message is a small struct implementing `Display`
//! and [`messages::StructuredLog`], so log text lives in one place and every
//! event carries the same structured fields wherever it is emitted.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::pipeline` - stage instantiation, wiring and freezing
//! * `messages::engine` - pipeline evaluation
//! * `messages::validation` - configuration validation findings
//!
//! # Usage
//!
//! ```rust
//! use turboprop_composer::observability::messages::pipeline::StageOmitted;
//! use turboprop_composer::observability::messages::StructuredLog;
//!
//! let msg = StageOmitted {
//!     stage_id: "gearbox",
//!     phase: "pre-batch",
//! };
//!
//! msg.log();
//! ```

pub mod messages;

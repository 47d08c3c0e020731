// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Port resolution: deciding which producer output feeds which consumer input.
//!
//! The resolver runs once per per-node build, strictly after every stage has
//! been instantiated, and turns the realized manifests into an immutable
//! [`WiringMap`]. Non-fatal findings (a fixed value overriding a computed one)
//! are reported through an explicit [`Diagnostics`] sink rather than logged
//! directly, so the caller decides whether they are shown.

pub mod diagnostics;
pub mod map;
pub mod resolver;

pub use diagnostics::{Diagnostic, Diagnostics};
pub use map::{ExposedInput, ExposedOutput, PortBinding, PortRef, WiringEdge, WiringMap, WiringRule};
pub use resolver::{FixedValueOverride, InstanceRole, InstanceSpec, PortResolver};

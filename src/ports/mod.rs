// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Port data model shared by stages, the resolver and the executors.
//!
//! * `port` - named, unit-tagged value slots and per-stage manifests
//! * `values` - per-node arrays flowing through ports
//! * `units` - unit conversion between producer and consumer ports
//! * `conventions` - the naming-convention table used for cross-stage binding

pub mod conventions;
pub mod port;
pub mod units;
pub mod values;

pub use conventions::{ConventionRole, NamingConvention, CONVENTIONS};
pub use port::{Direction, Port, PortManifest};
pub use values::{PortValue, PortValues};

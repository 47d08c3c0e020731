// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Stage implementations.
//!
//! ## Local Backend
//! In-process Rust stages selected by implementation name:
//! - **Power source**: `fixed_power_turboshaft`
//! - **Gearbox**: `simple_gearbox`
//! - **Propeller**: `ideal_propeller`, also the fallback when no propeller is configured
//!
//! ## Stub Backend (Test-Only)
//! Stages with hand-written manifests for exercising the resolver and
//! executors (only available in test builds):
//! - **StubStage**: declares arbitrary ports; outputs are constants, copies or scaled inputs
//! - **StubPhase::failing**: per-phase computations that always return a compute error
//!
//! # Architecture
//!
//! ```text
//! Configuration → LocalStageFactory → Stage → build_{pre,node,post} → Computation
//! ```
//!
//! # Examples
//!
//! ```rust
//! use turboprop_composer::backends::local::LocalStageFactory;
//! use turboprop_composer::config::StageConfig;
//!
//! let config = StageConfig::new("gearbox", "simple_gearbox");
//! let stage = LocalStageFactory::create_stage(&config)?;
//! assert_eq!(stage.name(), "gearbox");
//! # Ok::<(), turboprop_composer::errors::StageFactoryError>(())
//! ```

pub mod local;
#[cfg(test)]
pub mod stub;

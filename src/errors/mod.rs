// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod evaluation;
mod pipeline;
mod stage_factory;

pub use config::{ConfigLoadError, ValidationError};
pub use evaluation::{ComputeError, EvaluationError};
pub use pipeline::{PipelineError, StageBuildError, UnitError};
pub use stage_factory::StageFactoryError;

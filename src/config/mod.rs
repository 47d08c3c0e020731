// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod loader;
mod runtime;
mod stage_options;
mod validation;

pub mod consts;

pub use loader::{
    load_and_validate_config, load_config, parse_config, Config, ConfigFormat, ExecutorOptions,
    FixedValueConfig, StageConfig, StagesConfig, Strategy, Verbosity,
};
pub use runtime::RuntimeBuilder;
pub use stage_options::{StageOptions, StageOptionsMap};
pub use validation::validate_config;

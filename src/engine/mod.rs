// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod factory;
pub mod level_by_level;
pub mod sequential;

pub use factory::ExecutorFactory;
pub use level_by_level::LevelByLevelExecutor;
pub use sequential::SequentialExecutor;

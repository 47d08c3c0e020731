// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::DEFAULT_MAX_CONCURRENCY;
use crate::config::{ExecutorOptions, Strategy};
use crate::engine::level_by_level::LevelByLevelExecutor;
use crate::engine::sequential::SequentialExecutor;
use crate::traits::PipelineExecutor;

/// Factory for creating pipeline executors from configuration
pub struct ExecutorFactory;

impl ExecutorFactory {
    /// Create an executor based on the configured strategy
    pub fn from_options(options: &ExecutorOptions) -> Box<dyn PipelineExecutor> {
        let max_concurrency = options.max_concurrency.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(DEFAULT_MAX_CONCURRENCY)
        });

        match options.strategy {
            Strategy::Level => Box::new(LevelByLevelExecutor::new(max_concurrency)),
            Strategy::Sequential => Box::new(SequentialExecutor::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_selects_executor() {
        let level = ExecutorFactory::from_options(&ExecutorOptions::default());
        assert_eq!(level.name(), "level_by_level");

        let sequential = ExecutorFactory::from_options(&ExecutorOptions {
            strategy: Strategy::Sequential,
            max_concurrency: None,
        });
        assert_eq!(sequential.name(), "sequential");
    }
}

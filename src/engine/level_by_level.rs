// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::consts::DEFAULT_MAX_CONCURRENCY;
use crate::errors::EvaluationError;
use crate::observability::messages::engine::{
    EvaluationCompleted, EvaluationFailed, EvaluationStarted, LevelEvaluated,
};
use crate::observability::messages::StructuredLog;
use crate::pipeline::{run_computation, FrozenPipeline};
use crate::ports::PortValues;
use crate::traits::PipelineExecutor;

/// Level-by-Level executor that evaluates a frozen pipeline one topological level at a time.
///
/// ## Execution Strategy
///
/// 1. **Gather**: inputs for every instance of the level are read from the
///    shared value store, with unit conversion and defaults applied
/// 2. **Compute**: the level's computations run concurrently on the blocking
///    thread pool, bounded by a semaphore
/// 3. **Publish**: once the whole level has finished, outputs are checked
///    against the manifests and written back under their promoted names
///
/// Publishing happens in instance order after the level completes, so the
/// value store never depends on task completion order. The first failure
/// aborts the evaluation.
pub struct LevelByLevelExecutor {
    /// Maximum number of concurrent computations within a level
    max_concurrency: usize,
}

impl LevelByLevelExecutor {
    /// Create a new Level-by-Level executor with the specified concurrency limit
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Concurrency equal to the number of available CPU cores
    pub fn with_available_parallelism() -> Self {
        let concurrency = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(DEFAULT_MAX_CONCURRENCY);
        Self::new(concurrency)
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    async fn evaluate_levels(
        &self,
        pipeline: &FrozenPipeline,
        mut store: PortValues,
    ) -> Result<PortValues, EvaluationError> {
        let node_count = pipeline.node_count();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));

        for (level, members) in pipeline.levels().iter().enumerate() {
            let mut tasks = JoinSet::new();

            for &index in members {
                let instance = &pipeline.instances()[index];
                let gathered = instance.gather(&store, node_count)?;
                let computation = instance.computation();
                let id = instance.id().to_string();

                let permit = Arc::clone(&semaphore).acquire_owned().await.map_err(|e| {
                    EvaluationError::TaskFailed {
                        instance: id.clone(),
                        reason: format!("failed to acquire semaphore permit: {e}"),
                    }
                })?;

                tasks.spawn_blocking(move || {
                    let _permit = permit;
                    (index, run_computation(&id, computation.as_ref(), &gathered))
                });
            }

            let mut produced = Vec::with_capacity(members.len());
            while let Some(joined) = tasks.join_next().await {
                let (index, outputs) = joined.map_err(|e| EvaluationError::TaskFailed {
                    instance: format!("level {level}"),
                    reason: e.to_string(),
                })?;
                produced.push((index, outputs?));
            }
            produced.sort_by_key(|(index, _)| *index);

            for (index, outputs) in produced {
                pipeline.instances()[index].publish(outputs, node_count, &mut store)?;
            }

            let names: Vec<&str> = pipeline.level_instances(level).map(|i| i.id()).collect();
            LevelEvaluated {
                level,
                instances: &names,
            }
            .log();
        }

        Ok(pipeline.exposed_outputs_from(&mut store))
    }
}

impl Default for LevelByLevelExecutor {
    fn default() -> Self {
        Self::with_available_parallelism()
    }
}

#[async_trait]
impl PipelineExecutor for LevelByLevelExecutor {
    async fn evaluate(
        &self,
        pipeline: &FrozenPipeline,
        inputs: PortValues,
    ) -> Result<PortValues, EvaluationError> {
        let started = Instant::now();
        EvaluationStarted {
            strategy: self.name(),
            instance_count: pipeline.instances().len(),
            node_count: pipeline.node_count(),
        }
        .log();

        let result = self.evaluate_levels(pipeline, inputs).await;
        match &result {
            Ok(outputs) => EvaluationCompleted {
                strategy: self.name(),
                output_count: outputs.len(),
                duration: started.elapsed(),
            }
            .log(),
            Err(error) => EvaluationFailed {
                strategy: self.name(),
                error,
            }
            .log(),
        }
        result
    }

    fn name(&self) -> &'static str {
        "level_by_level"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concurrency_is_at_least_one() {
        assert_eq!(LevelByLevelExecutor::new(0).max_concurrency(), 1);
        assert_eq!(LevelByLevelExecutor::new(3).max_concurrency(), 3);
        assert!(LevelByLevelExecutor::default().max_concurrency() >= 1);
    }
}

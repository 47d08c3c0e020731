// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::time::Instant;

use crate::errors::EvaluationError;
use crate::observability::messages::engine::{
    EvaluationCompleted, EvaluationFailed, EvaluationStarted, LevelEvaluated,
};
use crate::observability::messages::StructuredLog;
use crate::pipeline::FrozenPipeline;
use crate::ports::PortValues;
use crate::traits::PipelineExecutor;

/// Evaluates instances one at a time, in level order, on the calling task.
///
/// Produces the same outputs as [`LevelByLevelExecutor`](super::LevelByLevelExecutor);
/// useful for debugging and for computations that are cheap enough that
/// thread hand-off dominates.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialExecutor;

impl SequentialExecutor {
    pub fn new() -> Self {
        Self
    }

    fn evaluate_in_order(
        &self,
        pipeline: &FrozenPipeline,
        mut store: PortValues,
    ) -> Result<PortValues, EvaluationError> {
        let node_count = pipeline.node_count();
        for level in 0..pipeline.levels().len() {
            let mut names = Vec::new();
            for instance in pipeline.level_instances(level) {
                let gathered = instance.gather(&store, node_count)?;
                let outputs = instance.run(&gathered)?;
                instance.publish(outputs, node_count, &mut store)?;
                names.push(instance.id());
            }
            LevelEvaluated {
                level,
                instances: &names,
            }
            .log();
        }
        Ok(pipeline.exposed_outputs_from(&mut store))
    }
}

#[async_trait]
impl PipelineExecutor for SequentialExecutor {
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

        let result = self.evaluate_in_order(pipeline, inputs);
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
        "sequential"
    }
}

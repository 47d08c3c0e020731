// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::EvaluationError;
use crate::pipeline::FrozenPipeline;
use crate::ports::PortValues;

#[async_trait]
pub trait PipelineExecutor: Send + Sync {
    /// Evaluate a frozen pipeline.
    ///
    /// - `pipeline`: the wired, immutable pipeline
    /// - `inputs`: values for the pipeline's exposed inputs, keyed by promoted name
    ///
    /// Returns every exposed output keyed by its promoted name, or the first
    /// error encountered. Evaluation is all-or-nothing.
    async fn evaluate(
        &self,
        pipeline: &FrozenPipeline,
        inputs: PortValues,
    ) -> Result<PortValues, EvaluationError>;

    /// Strategy label used in log messages
    fn name(&self) -> &'static str;
}

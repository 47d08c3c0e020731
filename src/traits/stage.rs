// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::sync::Arc;

use crate::config::StageOptions;
use crate::errors::StageBuildError;
use crate::traits::Computation;

/// The three build phases a stage can take part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildPhase {
    Pre,
    Node,
    Post,
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BuildPhase::Pre => "pre-batch",
            BuildPhase::Node => "per-node",
            BuildPhase::Post => "post-batch",
        };
        f.write_str(label)
    }
}

/// A pluggable, independently authored unit of a propulsion pipeline.
///
/// Each build operation returns `Ok(None)` when the stage has nothing to
/// contribute to that phase; the pipeline simply leaves it out. The port
/// manifest of a per-node computation is only known once `build_node` has run,
/// because shapes and units may depend on the batch size.
///
/// By convention a per-node computation that produces thrust exposes at most
/// one output named `thrust` and one named `thrust_max`, and a shaft-speed
/// producer exposes it as `rpm`.
pub trait Stage: Send + Sync {
    /// Stage ID, used to key build options and to name instances.
    fn name(&self) -> &str;

    fn build_pre(
        &self,
        _options: &StageOptions,
    ) -> Result<Option<Arc<dyn Computation>>, StageBuildError> {
        Ok(None)
    }

    fn build_node(
        &self,
        node_count: usize,
        options: &StageOptions,
    ) -> Result<Option<Arc<dyn Computation>>, StageBuildError>;

    fn build_post(
        &self,
        _options: &StageOptions,
    ) -> Result<Option<Arc<dyn Computation>>, StageBuildError> {
        Ok(None)
    }

    /// Dispatch to the build operation for `phase`.
    fn build(
        &self,
        phase: BuildPhase,
        node_count: usize,
        options: &StageOptions,
    ) -> Result<Option<Arc<dyn Computation>>, StageBuildError> {
        match phase {
            BuildPhase::Pre => self.build_pre(options),
            BuildPhase::Node => self.build_node(node_count, options),
            BuildPhase::Post => self.build_post(options),
        }
    }
}

impl fmt::Debug for dyn Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage").field("name", &self.name()).finish()
    }
}

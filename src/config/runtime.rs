// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::backends::local::LocalStageFactory;
use crate::config::Config;
use crate::engine::factory::ExecutorFactory;
use crate::errors::StageFactoryError;
use crate::pipeline::{DeclaredPipeline, PipelineConfig, PipelineOptions};
use crate::traits::PipelineExecutor;

/// Runtime builder - turns a configuration into a declared pipeline and an executor.
///
/// # Examples
///
/// ```
/// use turboprop_composer::config::{parse_config, ConfigFormat, RuntimeBuilder};
///
/// let config = parse_config(
///     r#"
/// stages:
///   power_source:
///     id: turboshaft
///     impl_: fixed_power_turboshaft
/// "#,
///     ConfigFormat::Yaml,
/// )
/// .unwrap();
///
/// let (declared, executor) = RuntimeBuilder::from_config(&config).unwrap();
/// assert_eq!(declared.config().power_source().name(), "turboshaft");
/// assert!(declared.config().propeller().is_default());
/// assert_eq!(executor.name(), "level_by_level");
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build the declared pipeline and executor from configuration.
    ///
    /// Creates and returns:
    /// - `DeclaredPipeline`: the configured stages with their options
    /// - `Box<dyn PipelineExecutor>`: executor configured per strategy
    pub fn from_config(
        cfg: &Config,
    ) -> Result<(DeclaredPipeline, Box<dyn PipelineExecutor>), StageFactoryError> {
        let mut pipeline = PipelineConfig::new(LocalStageFactory::create_stage(&cfg.stages.power_source)?);
        if let Some(gearbox) = &cfg.stages.gearbox {
            pipeline = pipeline.with_gearbox(LocalStageFactory::create_stage(gearbox)?);
        }
        if let Some(propeller) = &cfg.stages.propeller {
            pipeline = pipeline.with_propeller(LocalStageFactory::create_stage(propeller)?);
        }

        let options = PipelineOptions {
            stage_options: cfg.stage_options.clone(),
            fixed_rpm: cfg.fixed_rpm.clone(),
            verbosity: cfg.verbosity,
        };

        let executor = ExecutorFactory::from_options(&cfg.executor);
        Ok((DeclaredPipeline::new(pipeline, options), executor))
    }
}

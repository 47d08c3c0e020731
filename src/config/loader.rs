// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::DEFAULT_NODE_COUNT;
use crate::config::StageOptionsMap;
use crate::errors::ConfigLoadError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Main configuration structure for a turboprop composition.
///
/// Names the stages filling each slot, the options they are built with, an
/// optional fixed RPM, and how the frozen pipeline is evaluated. It is
/// typically loaded from a YAML or TOML file.
///
/// # Fields
/// * `name` - Label used in logs
/// * `verbosity` - How much construction detail is reported
/// * `node_count` - Number of analysis points evaluated per run
/// * `fixed_rpm` - Constant rotational speed that replaces the computed one
/// * `executor` - Evaluation strategy and concurrency
/// * `stages` - Power source, gearbox and propeller slots
/// * `stage_options` - Build options keyed by stage ID
/// * `inputs` - Scalar values broadcast to the pipeline's exposed inputs
///
/// # Example
/// ```yaml
/// name: demo_turboprop
/// verbosity: brief
/// node_count: 3
/// fixed_rpm:
///   value: 1200
///   unit: rpm
/// executor:
///   strategy: level
///   max_concurrency: 4
/// stages:
///   power_source:
///     id: turboshaft
///     impl_: fixed_power_turboshaft
///   gearbox:
///     id: gearbox
///     impl_: simple_gearbox
/// stage_options:
///   gearbox:
///     gear_ratio: 12.5
/// inputs:
///   velocity:
///     value: 200
///     unit: ft/s
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub verbosity: Verbosity,
    #[serde(default = "default_node_count")]
    pub node_count: usize,
    #[serde(default)]
    pub fixed_rpm: Option<FixedValueConfig>,
    #[serde(default)]
    pub executor: ExecutorOptions,
    pub stages: StagesConfig,
    #[serde(default)]
    pub stage_options: StageOptionsMap,
    #[serde(default)]
    pub inputs: BTreeMap<String, FixedValueConfig>,
}

fn default_name() -> String {
    "turboprop".to_string()
}

fn default_node_count() -> usize {
    DEFAULT_NODE_COUNT
}

/// The three stage slots of a turboprop. Only the power source is mandatory.
#[derive(Debug, Clone, Deserialize)]
pub struct StagesConfig {
    pub power_source: StageConfig,
    #[serde(default)]
    pub gearbox: Option<StageConfig>,
    #[serde(default)]
    pub propeller: Option<StageConfig>,
}

impl StagesConfig {
    /// Configured stages in slot order: power source, gearbox, propeller.
    pub fn iter(&self) -> impl Iterator<Item = &StageConfig> {
        std::iter::once(&self.power_source)
            .chain(self.gearbox.as_ref())
            .chain(self.propeller.as_ref())
    }
}

/// A stage slot: the ID it is known by and the implementation behind it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StageConfig {
    pub id: String,
    pub impl_: String,
}

impl StageConfig {
    pub fn new(id: impl Into<String>, impl_: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            impl_: impl_.into(),
        }
    }
}

/// A scalar with an optional unit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FixedValueConfig {
    pub value: f64,
    #[serde(default)]
    pub unit: Option<String>,
}

/// How much construction detail is reported. Ordered from least to most.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    Quiet,
    #[default]
    Brief,
    Verbose,
    Debug,
}

/// Execution strategy for evaluating a frozen pipeline.
///
/// # Variants
/// * `Level` - Instances in the same topological level run concurrently
/// * `Sequential` - Instances run one at a time in topological order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    Level,
    Sequential,
}

/// Executor-specific configuration options.
///
/// # Fields
/// * `strategy` - Which executor evaluates the pipeline
/// * `max_concurrency` - Upper bound on concurrently running instances (optional)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecutorOptions {
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default)]
    pub max_concurrency: Option<usize>,
}

/// Serialization format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// `.toml` files are TOML; anything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Parse configuration text in the given format.
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<Config, ConfigLoadError> {
    let cfg = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content)?,
        ConfigFormat::Toml => toml::from_str(content)?,
    };
    Ok(cfg)
}

/// Load a config from a YAML or TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigLoadError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    parse_config(&content, ConfigFormat::from_path(path))
}

/// Load and validate a config from a YAML or TOML file
///
/// All validation errors are collected and reported together.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigLoadError> {
    let cfg = load_config(path)?;
    crate::config::validate_config(&cfg).map_err(ConfigLoadError::Invalid)?;
    Ok(cfg)
}

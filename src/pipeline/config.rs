// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::backends::local::IdealPropeller;
use crate::config::consts::DEFAULT_PROPELLER_ID;
use crate::config::{FixedValueConfig, StageOptionsMap, Verbosity};
use crate::traits::Stage;

/// Whether the pipeline has a speed-reduction stage.
#[derive(Clone)]
pub enum GearboxShape {
    NoGearbox,
    WithGearbox(Arc<dyn Stage>),
}

impl GearboxShape {
    pub fn stage(&self) -> Option<&Arc<dyn Stage>> {
        match self {
            GearboxShape::NoGearbox => None,
            GearboxShape::WithGearbox(stage) => Some(stage),
        }
    }
}

/// The propeller slot: supplied by the caller, or the built-in fallback.
#[derive(Clone)]
pub enum PropellerChoice {
    Configured(Arc<dyn Stage>),
    Default(Arc<dyn Stage>),
}

impl PropellerChoice {
    pub fn stage(&self) -> &Arc<dyn Stage> {
        match self {
            PropellerChoice::Configured(stage) | PropellerChoice::Default(stage) => stage,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, PropellerChoice::Default(_))
    }
}

/// Declared stages of a turboprop, before anything is built.
#[derive(Clone)]
pub struct PipelineConfig {
    power_source: Arc<dyn Stage>,
    gearbox: GearboxShape,
    propeller: PropellerChoice,
}

impl PipelineConfig {
    /// A power source alone: no gearbox, default propeller.
    pub fn new(power_source: Arc<dyn Stage>) -> Self {
        Self {
            power_source,
            gearbox: GearboxShape::NoGearbox,
            propeller: PropellerChoice::Default(Arc::new(IdealPropeller::new(DEFAULT_PROPELLER_ID))),
        }
    }

    pub fn with_gearbox(mut self, gearbox: Arc<dyn Stage>) -> Self {
        self.gearbox = GearboxShape::WithGearbox(gearbox);
        self
    }

    pub fn with_propeller(mut self, propeller: Arc<dyn Stage>) -> Self {
        self.propeller = PropellerChoice::Configured(propeller);
        self
    }

    pub fn power_source(&self) -> &Arc<dyn Stage> {
        &self.power_source
    }

    pub fn gearbox(&self) -> &GearboxShape {
        &self.gearbox
    }

    pub fn propeller(&self) -> &PropellerChoice {
        &self.propeller
    }

    /// Stages in slot order: power source, gearbox, propeller.
    pub fn stages(&self) -> impl Iterator<Item = &Arc<dyn Stage>> {
        std::iter::once(&self.power_source)
            .chain(self.gearbox.stage())
            .chain(std::iter::once(self.propeller.stage()))
    }
}

impl std::fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("power_source", &self.power_source.name())
            .field("gearbox", &self.gearbox.stage().map(|g| g.name()))
            .field("propeller", &self.propeller.stage().name())
            .field("default_propeller", &self.propeller.is_default())
            .finish()
    }
}

/// Everything besides the stages that shapes a build.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub stage_options: StageOptionsMap,
    pub fixed_rpm: Option<FixedValueConfig>,
    pub verbosity: Verbosity,
}

impl PipelineOptions {
    pub fn with_stage_options(mut self, stage_options: StageOptionsMap) -> Self {
        self.stage_options = stage_options;
        self
    }

    pub fn with_fixed_rpm(mut self, value: f64, unit: Option<&str>) -> Self {
        self.fixed_rpm = Some(FixedValueConfig {
            value,
            unit: unit.map(str::to_string),
        });
        self
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::{input, rpm_to_rad_s, FT_LBF_PER_S_PER_HP};
use crate::config::StageOptions;
use crate::errors::{ComputeError, StageBuildError};
use crate::ports::{Port, PortManifest, PortValue, PortValues};
use crate::traits::{Computation, Stage};

const SHAFT_POWER_IN: &str = "shaft_power_in";
const SHAFT_POWER_MAX_IN: &str = "shaft_power_max_in";
const RPM_IN: &str = "rpm_in";
const SHAFT_POWER_OUT: &str = "shaft_power_out";
const SHAFT_POWER_MAX_OUT: &str = "shaft_power_max_out";
const RPM_OUT: &str = "rpm_out";
const TORQUE_OUT: &str = "torque_out";
const GEAR_RATIO: &str = "gear_ratio";

/// Constant-ratio reduction gearbox.
///
/// # Options
/// * `gear_ratio` - input speed over output speed (default 10)
/// * `efficiency` - fraction of power transmitted, in (0, 1] (default 0.98)
#[derive(Debug, Clone)]
pub struct SimpleGearbox {
    id: String,
}

impl SimpleGearbox {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

fn gear_ratio(options: &StageOptions) -> Result<f64, StageBuildError> {
    options.positive_f64_or(GEAR_RATIO, 10.0)
}

impl Stage for SimpleGearbox {
    fn name(&self) -> &str {
        &self.id
    }

    /// Publishes the gear ratio once for sizing.
    fn build_pre(
        &self,
        options: &StageOptions,
    ) -> Result<Option<Arc<dyn Computation>>, StageBuildError> {
        Ok(Some(Arc::new(GearboxSizing {
            manifest: PortManifest::new().with(Port::output(GEAR_RATIO, Some("unitless"))),
            gear_ratio: gear_ratio(options)?,
        })))
    }

    fn build_node(
        &self,
        _node_count: usize,
        options: &StageOptions,
    ) -> Result<Option<Arc<dyn Computation>>, StageBuildError> {
        let efficiency = options.positive_f64_or("efficiency", 0.98)?;
        if efficiency > 1.0 {
            return Err(StageBuildError::InvalidOption {
                option: "efficiency".to_string(),
                reason: format!("must not exceed 1, got {efficiency}"),
            });
        }

        Ok(Some(Arc::new(GearboxPerformance {
            manifest: PortManifest::new()
                .with(Port::input(SHAFT_POWER_IN, Some("hp")))
                .with(Port::input(SHAFT_POWER_MAX_IN, Some("hp")))
                .with(Port::input(RPM_IN, Some("rpm")))
                .with(Port::output(SHAFT_POWER_OUT, Some("hp")))
                .with(Port::output(SHAFT_POWER_MAX_OUT, Some("hp")))
                .with(Port::output(RPM_OUT, Some("rpm")))
                .with(Port::output(TORQUE_OUT, Some("ft*lbf"))),
            gear_ratio: gear_ratio(options)?,
            efficiency,
        })))
    }
}

struct GearboxSizing {
    manifest: PortManifest,
    gear_ratio: f64,
}

impl Computation for GearboxSizing {
    fn manifest(&self) -> &PortManifest {
        &self.manifest
    }

    fn compute(&self, _inputs: &PortValues) -> Result<PortValues, ComputeError> {
        Ok(PortValues::new().with(GEAR_RATIO, PortValue::new(vec![self.gear_ratio], Some("unitless"))))
    }
}

struct GearboxPerformance {
    manifest: PortManifest,
    gear_ratio: f64,
    efficiency: f64,
}

impl Computation for GearboxPerformance {
    fn manifest(&self) -> &PortManifest {
        &self.manifest
    }

    fn compute(&self, inputs: &PortValues) -> Result<PortValues, ComputeError> {
        let power = input(inputs, SHAFT_POWER_IN)?;
        let power_max = input(inputs, SHAFT_POWER_MAX_IN)?;
        let rpm = input(inputs, RPM_IN)?;

        let power_out: Vec<f64> = power.iter().map(|p| p * self.efficiency).collect();
        let power_max_out: Vec<f64> = power_max.iter().map(|p| p * self.efficiency).collect();
        let rpm_out: Vec<f64> = rpm.iter().map(|r| r / self.gear_ratio).collect();
        let torque: Vec<f64> = power_out
            .iter()
            .zip(&rpm_out)
            .map(|(p, r)| {
                let omega = rpm_to_rad_s(*r);
                if omega > 0.0 {
                    p * FT_LBF_PER_S_PER_HP / omega
                } else {
                    0.0
                }
            })
            .collect();

        Ok(PortValues::new()
            .with(SHAFT_POWER_OUT, PortValue::new(power_out, Some("hp")))
            .with(SHAFT_POWER_MAX_OUT, PortValue::new(power_max_out, Some("hp")))
            .with(RPM_OUT, PortValue::new(rpm_out, Some("rpm")))
            .with(TORQUE_OUT, PortValue::new(torque, Some("ft*lbf"))))
    }
}

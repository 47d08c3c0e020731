// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::input;
use crate::config::consts::{RPM, RPM_UNIT, SHAFT_POWER, SHAFT_POWER_MAX, THRUST, THRUST_MAX, THRUST_UNIT};
use crate::config::StageOptions;
use crate::errors::{ComputeError, StageBuildError};
use crate::ports::{Port, PortManifest, PortValue, PortValues};
use crate::traits::{Computation, Stage};

const THROTTLE: &str = "throttle";

/// Turboshaft engine with a rated shaft power that scales linearly with throttle.
///
/// # Options
/// * `shaft_power` - rated power in hp (default 1000)
/// * `shaft_power_max` - power available at full throttle in hp (defaults to `shaft_power`)
/// * `rpm` - output shaft speed (default 6000)
/// * `residual_thrust` - jet thrust at full throttle in lbf (default 0)
#[derive(Debug, Clone)]
pub struct FixedPowerTurboshaft {
    id: String,
}

impl FixedPowerTurboshaft {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Stage for FixedPowerTurboshaft {
    fn name(&self) -> &str {
        &self.id
    }

    fn build_node(
        &self,
        _node_count: usize,
        options: &StageOptions,
    ) -> Result<Option<Arc<dyn Computation>>, StageBuildError> {
        let rated_power = options.positive_f64_or("shaft_power", 1000.0)?;
        let max_power = options.positive_f64_or("shaft_power_max", rated_power)?;
        let rpm = options.positive_f64_or("rpm", 6000.0)?;
        let residual_thrust = options.f64_or("residual_thrust", 0.0)?;
        if residual_thrust < 0.0 {
            return Err(StageBuildError::InvalidOption {
                option: "residual_thrust".to_string(),
                reason: "must not be negative".to_string(),
            });
        }

        Ok(Some(Arc::new(TurboshaftPerformance {
            manifest: PortManifest::new()
                .with(Port::input(THROTTLE, Some("unitless")).with_default(1.0))
                .with(Port::output(SHAFT_POWER, Some("hp")))
                .with(Port::output(SHAFT_POWER_MAX, Some("hp")))
                .with(Port::output(RPM, Some(RPM_UNIT)))
                .with(Port::output(THRUST, Some(THRUST_UNIT)))
                .with(Port::output(THRUST_MAX, Some(THRUST_UNIT))),
            rated_power,
            max_power,
            rpm,
            residual_thrust,
        })))
    }
}

struct TurboshaftPerformance {
    manifest: PortManifest,
    rated_power: f64,
    max_power: f64,
    rpm: f64,
    residual_thrust: f64,
}

impl Computation for TurboshaftPerformance {
    fn manifest(&self) -> &PortManifest {
        &self.manifest
    }

    fn compute(&self, inputs: &PortValues) -> Result<PortValues, ComputeError> {
        let throttle = input(inputs, THROTTLE)?;
        if let Some(bad) = throttle.iter().find(|t| !t.is_finite() || **t < 0.0) {
            return Err(ComputeError::new(format!("throttle must be non-negative, got {bad}")));
        }
        let n = throttle.len();

        let scaled = |full: f64| throttle.iter().map(|t| t * full).collect::<Vec<_>>();
        Ok(PortValues::new()
            .with(SHAFT_POWER, PortValue::new(scaled(self.rated_power), Some("hp")))
            .with(SHAFT_POWER_MAX, PortValue::broadcast(self.max_power, n, Some("hp")))
            .with(RPM, PortValue::broadcast(self.rpm, n, Some(RPM_UNIT)))
            .with(THRUST, PortValue::new(scaled(self.residual_thrust), Some(THRUST_UNIT)))
            .with(THRUST_MAX, PortValue::broadcast(self.residual_thrust, n, Some(THRUST_UNIT))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_scales_with_throttle() {
        let stage = FixedPowerTurboshaft::new("turboshaft");
        let options = StageOptions::new()
            .with("shaft_power", 1000.0)
            .with("shaft_power_max", 1200.0)
            .with("residual_thrust", 100.0);
        let computation = stage.build_node(2, &options).unwrap().unwrap();

        let inputs = PortValues::new().with(THROTTLE, PortValue::new(vec![1.0, 0.5], Some("unitless")));
        let out = computation.compute(&inputs).unwrap();
        assert_eq!(out.get(SHAFT_POWER).unwrap().values, vec![1000.0, 500.0]);
        assert_eq!(out.get(SHAFT_POWER_MAX).unwrap().values, vec![1200.0, 1200.0]);
        assert_eq!(out.get(THRUST).unwrap().values, vec![100.0, 50.0]);
        assert_eq!(out.get(THRUST_MAX).unwrap().values, vec![100.0, 100.0]);
        assert_eq!(out.get(RPM).unwrap().values, vec![6000.0, 6000.0]);
    }

    #[test]
    fn test_has_no_batch_computations() {
        let stage = FixedPowerTurboshaft::new("turboshaft");
        assert!(stage.build_pre(&StageOptions::new()).unwrap().is_none());
        assert!(stage.build_post(&StageOptions::new()).unwrap().is_none());
    }

    #[test]
    fn test_rejects_bad_options() {
        let stage = FixedPowerTurboshaft::new("turboshaft");
        assert!(stage
            .build_node(1, &StageOptions::new().with("shaft_power", 0.0))
            .is_err());
        assert!(stage
            .build_node(1, &StageOptions::new().with("residual_thrust", -1.0))
            .is_err());
    }

    #[test]
    fn test_rejects_negative_throttle() {
        let computation = FixedPowerTurboshaft::new("t")
            .build_node(1, &StageOptions::new())
            .unwrap()
            .unwrap();
        let inputs = PortValues::new().with(THROTTLE, PortValue::new(vec![-0.1], None));
        assert!(computation.compute(&inputs).is_err());
    }
}

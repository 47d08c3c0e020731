// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::{input, rpm_to_rad_s, FT_LBF_PER_S_PER_HP};
use crate::config::consts::{RPM, RPM_UNIT, SHAFT_POWER, THRUST, THRUST_UNIT};
use crate::config::StageOptions;
use crate::errors::{ComputeError, StageBuildError};
use crate::ports::{Port, PortManifest, PortValue, PortValues};
use crate::traits::{Computation, Stage};

const VELOCITY: &str = "velocity";
const TIP_SPEED: &str = "tip_speed";

/// Propeller with a constant propulsive efficiency.
///
/// Thrust is `efficiency * power / velocity`. Below `min_velocity` the
/// velocity is clamped so static thrust stays finite.
///
/// # Options
/// * `efficiency` - propulsive efficiency in (0, 1] (default 0.8)
/// * `diameter` - in ft (default 10)
/// * `min_velocity` - in ft/s (default 10)
#[derive(Debug, Clone)]
pub struct IdealPropeller {
    id: String,
}

impl IdealPropeller {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Stage for IdealPropeller {
    fn name(&self) -> &str {
        &self.id
    }

    fn build_node(
        &self,
        _node_count: usize,
        options: &StageOptions,
    ) -> Result<Option<Arc<dyn Computation>>, StageBuildError> {
        let efficiency = options.positive_f64_or("efficiency", 0.8)?;
        if efficiency > 1.0 {
            return Err(StageBuildError::InvalidOption {
                option: "efficiency".to_string(),
                reason: format!("must not exceed 1, got {efficiency}"),
            });
        }

        Ok(Some(Arc::new(PropellerPerformance {
            manifest: PortManifest::new()
                .with(Port::input(SHAFT_POWER, Some("hp")))
                .with(Port::input(VELOCITY, Some("ft/s")))
                .with(Port::input(RPM, Some(RPM_UNIT)))
                .with(Port::output(THRUST, Some(THRUST_UNIT)))
                .with(Port::output(TIP_SPEED, Some("ft/s"))),
            efficiency,
            diameter: options.positive_f64_or("diameter", 10.0)?,
            min_velocity: options.positive_f64_or("min_velocity", 10.0)?,
        })))
    }
}

struct PropellerPerformance {
    manifest: PortManifest,
    efficiency: f64,
    diameter: f64,
    min_velocity: f64,
}

impl Computation for PropellerPerformance {
    fn manifest(&self) -> &PortManifest {
        &self.manifest
    }

    fn compute(&self, inputs: &PortValues) -> Result<PortValues, ComputeError> {
        let power = input(inputs, SHAFT_POWER)?;
        let velocity = input(inputs, VELOCITY)?;
        let rpm = input(inputs, RPM)?;
        if power.len() != velocity.len() || power.len() != rpm.len() {
            return Err(ComputeError::new("inputs differ in length"));
        }

        let thrust = power
            .iter()
            .zip(velocity)
            .map(|(p, v)| self.efficiency * p * FT_LBF_PER_S_PER_HP / v.max(self.min_velocity))
            .collect();
        let tip_speed = rpm
            .iter()
            .map(|r| rpm_to_rad_s(*r) * self.diameter / 2.0)
            .collect();

        Ok(PortValues::new()
            .with(THRUST, PortValue::new(thrust, Some(THRUST_UNIT)))
            .with(TIP_SPEED, PortValue::new(tip_speed, Some("ft/s"))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluate(power: f64, velocity: f64, rpm: f64) -> PortValues {
        let computation = IdealPropeller::new("prop")
            .build_node(1, &StageOptions::new())
            .unwrap()
            .unwrap();
        let inputs = PortValues::new()
            .with(SHAFT_POWER, PortValue::new(vec![power], Some("hp")))
            .with(VELOCITY, PortValue::new(vec![velocity], Some("ft/s")))
            .with(RPM, PortValue::new(vec![rpm], Some("rpm")));
        computation.compute(&inputs).unwrap()
    }

    #[test]
    fn test_thrust_from_power_and_speed() {
        let out = evaluate(1000.0, 220.0, 1200.0);
        assert!((out.get(THRUST).unwrap().values[0] - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn test_static_thrust_is_finite() {
        let out = evaluate(1000.0, 0.0, 1200.0);
        assert!((out.get(THRUST).unwrap().values[0] - 44_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_tip_speed() {
        let out = evaluate(0.0, 100.0, 1200.0);
        let expected = 1200.0 * std::f64::consts::PI / 30.0 * 5.0;
        assert!((out.get(TIP_SPEED).unwrap().values[0] - expected).abs() < 1e-9);
    }
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Built-in stages.
//!
//! * `fixed_power_turboshaft` - rated shaft power scaled by throttle
//! * `simple_gearbox` - constant-ratio speed reduction with a fixed efficiency
//! * `ideal_propeller` - thrust from shaft power at a given flight speed

mod gearbox;
mod propeller;
mod turboshaft;

pub use gearbox::SimpleGearbox;
pub use propeller::IdealPropeller;
pub use turboshaft::FixedPowerTurboshaft;

use crate::errors::ComputeError;
use crate::ports::PortValues;

/// ft*lbf/s in one horsepower
pub(crate) const FT_LBF_PER_S_PER_HP: f64 = 550.0;

pub(crate) fn rpm_to_rad_s(rpm: f64) -> f64 {
    rpm * std::f64::consts::PI / 30.0
}

/// Values of a gathered input, which the pipeline guarantees are in the
/// port's declared unit.
pub(crate) fn input<'a>(inputs: &'a PortValues, name: &str) -> Result<&'a [f64], ComputeError> {
    inputs
        .get(name)
        .map(|v| v.values.as_slice())
        .ok_or_else(|| ComputeError::new(format!("missing input '{name}'")))
}

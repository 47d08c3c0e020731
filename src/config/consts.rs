// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Canonical port names, instance ids and defaults.

/// Canonical thrust output of a stage, and of the pipeline as a whole
pub const THRUST: &str = "thrust";
/// Canonical maximum-available thrust output
pub const THRUST_MAX: &str = "thrust_max";
/// Rotational (shaft) speed
pub const RPM: &str = "rpm";
pub const SHAFT_POWER: &str = "shaft_power";
pub const SHAFT_POWER_MAX: &str = "shaft_power_max";

/// Combiner operands and results
pub const TURBOSHAFT_THRUST: &str = "turboshaft_thrust";
pub const TURBOSHAFT_THRUST_MAX: &str = "turboshaft_thrust_max";
pub const PROPELLER_THRUST: &str = "propeller_thrust";
pub const PROPELLER_THRUST_MAX: &str = "propeller_thrust_max";
pub const TOTAL_THRUST: &str = "total_thrust";
pub const TOTAL_THRUST_MAX: &str = "total_thrust_max";

pub const THRUST_UNIT: &str = "lbf";
pub const RPM_UNIT: &str = "rpm";

/// Stage id given to the built-in propeller when none is configured
pub const DEFAULT_PROPELLER_ID: &str = "propeller_model";
pub const FIXED_VALUE_SOURCE_ID: &str = "fixed_rpm_source";
pub const THRUST_ADDER_ID: &str = "thrust_adder";
pub const MAX_THRUST_ADDER_ID: &str = "max_thrust_adder";
/// Instance id suffixes for the two propeller branches
pub const BASE_BRANCH_SUFFIX: &str = "_base";
pub const MAX_BRANCH_SUFFIX: &str = "_max";

/// Fallback when available parallelism cannot be detected
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;
pub const DEFAULT_NODE_COUNT: usize = 1;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ConventionRole;

    #[test]
    fn test_combiner_names_follow_conventions() {
        assert_eq!(ConventionRole::TurboshaftThrust.apply(THRUST), TURBOSHAFT_THRUST);
        assert_eq!(ConventionRole::TurboshaftThrust.apply(THRUST_MAX), TURBOSHAFT_THRUST_MAX);
        assert_eq!(ConventionRole::PropellerThrust.apply(THRUST), PROPELLER_THRUST);
        assert_eq!(ConventionRole::PropellerThrust.apply(THRUST_MAX), PROPELLER_THRUST_MAX);
        assert_eq!(ConventionRole::MaxPower.apply(SHAFT_POWER), SHAFT_POWER_MAX);
    }
}

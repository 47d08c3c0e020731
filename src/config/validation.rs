// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Configuration validation.
//!
//! Checks that can be made without building any stage:
//!
//! 1. **Stage IDs**: unique across slots and distinct from the instances the
//!    pipeline generates itself (branch instances, combiners, fixed source)
//! 2. **Implementations**: every slot names a stage the local factory provides
//! 3. **Stage options**: every key of `stage_options` names a configured stage
//! 4. **Fixed RPM**: finite, positive, and in a rotational-speed unit
//! 5. **Inputs**: units are known
//!
//! All checks run; errors are accumulated so a user sees every problem at once.

use std::collections::HashSet;

use crate::backends::local::LocalStageFactory;
use crate::config::consts::{
    BASE_BRANCH_SUFFIX, DEFAULT_PROPELLER_ID, FIXED_VALUE_SOURCE_ID, MAX_BRANCH_SUFFIX,
    MAX_THRUST_ADDER_ID, RPM, RPM_UNIT, THRUST_ADDER_ID,
};
use crate::config::Config;
use crate::errors::ValidationError;
use crate::observability::messages::validation::{
    ValidationCompleted, ValidationErrorFound, ValidationFailed, ValidationStarted,
};
use crate::observability::messages::StructuredLog;
use crate::ports::units::{self, UnitFamily};

/// Validates a configuration before any stage is built.
///
/// # Returns
///
/// * `Ok(())` - Configuration can be turned into a pipeline
/// * `Err(Vec<ValidationError>)` - Every problem found
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let config_name = config.name.as_str();
    let stage_count = config.stages.iter().count();
    ValidationStarted {
        config_name,
        stage_count,
        node_count: config.node_count,
        fixed_rpm: config.fixed_rpm.as_ref().map(|fixed| fixed.value),
    }
    .log();

    let mut errors = Vec::new();
    errors.extend(validate_stage_ids(config));
    errors.extend(validate_implementations(config));
    errors.extend(validate_stage_options_targets(config));
    errors.extend(validate_fixed_rpm(config));
    errors.extend(validate_inputs(config));

    if config.node_count == 0 {
        errors.push(ValidationError::InvalidNodeCount { node_count: 0 });
    }

    if errors.is_empty() {
        ValidationCompleted {
            config_name,
            stage_count,
        }
        .log();
        Ok(())
    } else {
        for error in &errors {
            ValidationErrorFound { config_name, error }.log();
        }
        ValidationFailed {
            config_name,
            error_count: errors.len(),
        }
        .log();
        Err(errors)
    }
}

/// The propeller's stage ID, whether configured or defaulted.
fn propeller_id(config: &Config) -> &str {
    config
        .stages
        .propeller
        .as_ref()
        .map(|p| p.id.as_str())
        .unwrap_or(DEFAULT_PROPELLER_ID)
}

fn reserved_ids(config: &Config) -> HashSet<String> {
    let propeller = propeller_id(config);
    [
        FIXED_VALUE_SOURCE_ID.to_string(),
        THRUST_ADDER_ID.to_string(),
        MAX_THRUST_ADDER_ID.to_string(),
        format!("{propeller}{BASE_BRANCH_SUFFIX}"),
        format!("{propeller}{MAX_BRANCH_SUFFIX}"),
    ]
    .into_iter()
    .collect()
}

fn validate_stage_ids(config: &Config) -> Vec<ValidationError> {
    let mut seen = HashSet::new();
    let reserved = reserved_ids(config);
    let mut errors = Vec::new();

    let mut ids: Vec<&str> = config.stages.iter().map(|s| s.id.as_str()).collect();
    if config.stages.propeller.is_none() {
        ids.push(DEFAULT_PROPELLER_ID);
    }

    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::DuplicateStageId {
                stage_id: id.to_string(),
            });
        }
        if reserved.contains(id) {
            errors.push(ValidationError::ReservedStageId {
                stage_id: id.to_string(),
            });
        }
    }
    errors
}

fn validate_implementations(config: &Config) -> Vec<ValidationError> {
    config
        .stages
        .iter()
        .filter(|stage| !LocalStageFactory::is_implementation_available(&stage.impl_))
        .map(|stage| ValidationError::UnknownStageImplementation {
            stage_id: stage.id.clone(),
            impl_name: stage.impl_.clone(),
        })
        .collect()
}

fn validate_stage_options_targets(config: &Config) -> Vec<ValidationError> {
    let mut known: HashSet<&str> = config.stages.iter().map(|s| s.id.as_str()).collect();
    known.insert(propeller_id(config));

    let mut errors: Vec<ValidationError> = config
        .stage_options
        .stage_ids()
        .filter(|id| !known.contains(id))
        .map(|id| ValidationError::UnknownStageOptionsTarget {
            stage_id: id.to_string(),
        })
        .collect();
    // HashMap order is not stable; keep reports reproducible.
    errors.sort_by_key(|e| e.to_string());
    errors
}

fn validate_fixed_rpm(config: &Config) -> Vec<ValidationError> {
    let Some(fixed) = &config.fixed_rpm else {
        return Vec::new();
    };
    let mut errors = Vec::new();

    if !fixed.value.is_finite() || fixed.value <= 0.0 {
        errors.push(ValidationError::InvalidFixedValue {
            port: RPM.to_string(),
            value: fixed.value,
            reason: "must be a finite positive number".to_string(),
        });
    }

    let unit = fixed.unit.as_deref().unwrap_or(RPM_UNIT);
    match units::family(unit) {
        Ok(UnitFamily::AngularSpeed) => {}
        Ok(_) => errors.push(ValidationError::InvalidFixedValue {
            port: RPM.to_string(),
            value: fixed.value,
            reason: format!("unit '{unit}' is not a rotational speed"),
        }),
        Err(_) => errors.push(ValidationError::UnknownUnit {
            context: "fixed_rpm".to_string(),
            unit: unit.to_string(),
        }),
    }
    errors
}

fn validate_inputs(config: &Config) -> Vec<ValidationError> {
    config
        .inputs
        .iter()
        .filter_map(|(name, input)| {
            let unit = input.unit.as_deref()?;
            (!units::is_known(unit)).then(|| ValidationError::UnknownUnit {
                context: format!("input '{name}'"),
                unit: unit.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_config, ConfigFormat};

    fn config(yaml: &str) -> Config {
        parse_config(yaml, ConfigFormat::Yaml).unwrap()
    }

    const BASE: &str = r#"
stages:
  power_source:
    id: turboshaft
    impl_: fixed_power_turboshaft
  gearbox:
    id: gearbox
    impl_: simple_gearbox
"#;

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&config(BASE)).is_ok());
    }

    #[test]
    fn test_duplicate_stage_id() {
        let cfg = config(
            r#"
stages:
  power_source:
    id: engine
    impl_: fixed_power_turboshaft
  gearbox:
    id: engine
    impl_: simple_gearbox
"#,
        );
        let errors = validate_config(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateStageId {
                stage_id: "engine".into()
            }]
        );
    }

    #[test]
    fn test_stage_id_clashing_with_default_propeller() {
        let cfg = config(
            r#"
stages:
  power_source:
    id: propeller_model
    impl_: fixed_power_turboshaft
"#,
        );
        let errors = validate_config(&cfg).unwrap_err();
        assert!(errors.contains(&ValidationError::DuplicateStageId {
            stage_id: "propeller_model".into()
        }));
    }

    #[test]
    fn test_reserved_stage_id() {
        let cfg = config(
            r#"
stages:
  power_source:
    id: thrust_adder
    impl_: fixed_power_turboshaft
"#,
        );
        let errors = validate_config(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::ReservedStageId {
                stage_id: "thrust_adder".into()
            }]
        );
    }

    #[test]
    fn test_unknown_implementation() {
        let cfg = config(
            r#"
stages:
  power_source:
    id: turboshaft
    impl_: warp_drive
"#,
        );
        let errors = validate_config(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::UnknownStageImplementation {
                stage_id: "turboshaft".into(),
                impl_name: "warp_drive".into()
            }]
        );
    }

    #[test]
    fn test_stage_options_targets() {
        let cfg = config(&format!(
            "{BASE}stage_options:\n  gearbox:\n    gear_ratio: 10\n  propeller_model:\n    diameter: 9\n  nacelle:\n    drag: 1\n"
        ));
        let errors = validate_config(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::UnknownStageOptionsTarget {
                stage_id: "nacelle".into()
            }]
        );
    }

    #[test]
    fn test_fixed_rpm_checks() {
        let negative = config(&format!("{BASE}fixed_rpm:\n  value: -5\n"));
        assert!(matches!(
            validate_config(&negative).unwrap_err()[0],
            ValidationError::InvalidFixedValue { .. }
        ));

        let wrong_family = config(&format!("{BASE}fixed_rpm:\n  value: 5\n  unit: lbf\n"));
        assert!(matches!(
            validate_config(&wrong_family).unwrap_err()[0],
            ValidationError::InvalidFixedValue { .. }
        ));

        let unknown = config(&format!("{BASE}fixed_rpm:\n  value: 5\n  unit: furlongs\n"));
        assert!(matches!(
            validate_config(&unknown).unwrap_err()[0],
            ValidationError::UnknownUnit { .. }
        ));

        let rad_s = config(&format!("{BASE}fixed_rpm:\n  value: 120\n  unit: rad/s\n"));
        assert!(validate_config(&rad_s).is_ok());
    }

    #[test]
    fn test_zero_node_count() {
        let cfg = config(&format!("{BASE}node_count: 0\n"));
        assert_eq!(
            validate_config(&cfg).unwrap_err(),
            vec![ValidationError::InvalidNodeCount { node_count: 0 }]
        );
    }

    #[test]
    fn test_input_units() {
        let cfg = config(&format!(
            "{BASE}inputs:\n  velocity:\n    value: 100\n    unit: parsecs\n"
        ));
        assert!(matches!(
            validate_config(&cfg).unwrap_err()[0],
            ValidationError::UnknownUnit { .. }
        ));
    }

    #[test]
    fn test_errors_carry_log_keys() {
        let cfg = config(
            r#"
node_count: 0
stages:
  power_source:
    id: thrust_adder
    impl_: fixed_power_turboshaft
"#,
        );
        let errors = validate_config(&cfg).unwrap_err();

        let reserved = errors.iter().find(|e| e.kind() == "reserved_stage_id").unwrap();
        assert_eq!(reserved.stage_id(), Some("thrust_adder"));

        let nodes = errors.iter().find(|e| e.kind() == "invalid_node_count").unwrap();
        assert_eq!(nodes.stage_id(), None);
    }
}

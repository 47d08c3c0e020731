// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::stages::*;
use crate::config::StageConfig;
use crate::errors::StageFactoryError;
use crate::traits::Stage;

/// Factory for creating built-in stage instances
pub struct LocalStageFactory;

impl LocalStageFactory {
    /// Create a stage from configuration
    ///
    /// The `impl_` field in the config determines which stage to create:
    /// - "fixed_power_turboshaft" -> FixedPowerTurboshaft
    /// - "simple_gearbox" -> SimpleGearbox
    /// - "ideal_propeller" -> IdealPropeller
    ///
    /// The stage is named after the configured `id`.
    pub fn create_stage(config: &StageConfig) -> Result<Arc<dyn Stage>, StageFactoryError> {
        if config.id.trim().is_empty() {
            return Err(StageFactoryError::CreationFailed {
                stage_id: config.id.clone(),
                impl_name: config.impl_.clone(),
                reason: "stage ID must not be empty".to_string(),
            });
        }

        let id = config.id.as_str();
        match config.impl_.as_str() {
            "fixed_power_turboshaft" => Ok(Arc::new(FixedPowerTurboshaft::new(id))),
            "simple_gearbox" => Ok(Arc::new(SimpleGearbox::new(id))),
            "ideal_propeller" => Ok(Arc::new(IdealPropeller::new(id))),
            _ => Err(StageFactoryError::UnknownImplementation {
                stage_id: config.id.clone(),
                impl_name: config.impl_.clone(),
            }),
        }
    }

    /// List all available built-in stage implementations
    pub fn list_available_implementations() -> Vec<&'static str> {
        vec!["fixed_power_turboshaft", "simple_gearbox", "ideal_propeller"]
    }

    /// Check if an implementation is available
    pub fn is_implementation_available(impl_name: &str) -> bool {
        Self::list_available_implementations().contains(&impl_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_every_listed_implementation() {
        for impl_name in LocalStageFactory::list_available_implementations() {
            let stage = LocalStageFactory::create_stage(&StageConfig::new("slot", impl_name))
                .unwrap_or_else(|e| panic!("failed to create '{impl_name}': {e}"));
            assert_eq!(stage.name(), "slot");
        }
    }

    #[test]
    fn test_unknown_implementation() {
        let result = LocalStageFactory::create_stage(&StageConfig::new("engine", "warp_drive"));
        assert_eq!(
            result.unwrap_err(),
            StageFactoryError::UnknownImplementation {
                stage_id: "engine".into(),
                impl_name: "warp_drive".into()
            }
        );
        assert!(!LocalStageFactory::is_implementation_available("warp_drive"));
        assert!(LocalStageFactory::is_implementation_available("simple_gearbox"));
    }

    #[test]
    fn test_empty_id_is_rejected() {
        let result = LocalStageFactory::create_stage(&StageConfig::new(" ", "simple_gearbox"));
        assert!(matches!(result, Err(StageFactoryError::CreationFailed { .. })));
    }
}

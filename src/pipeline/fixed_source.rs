// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{RPM, RPM_UNIT};
use crate::errors::{ComputeError, UnitError};
use crate::ports::{units, Port, PortManifest, PortValue, PortValues};
use crate::traits::Computation;

/// Emits one constant for every analysis point and takes no inputs.
#[derive(Debug, Clone)]
pub struct FixedValueSource {
    manifest: PortManifest,
    port: String,
    value: f64,
    unit: Option<String>,
    node_count: usize,
}

impl FixedValueSource {
    /// A source publishing `value` unconverted.
    pub fn new(port: &str, value: f64, unit: Option<&str>, node_count: usize) -> Self {
        Self {
            manifest: PortManifest::new().with(Port::output(port, unit)),
            port: port.to_string(),
            value,
            unit: unit.map(str::to_string),
            node_count,
        }
    }

    /// A rotational speed source. The value is converted to rpm up front;
    /// a missing unit is taken to already be rpm.
    pub fn rpm(value: f64, unit: Option<&str>, node_count: usize) -> Result<Self, UnitError> {
        let value = units::convert(value, unit.or(Some(RPM_UNIT)), Some(RPM_UNIT))?;
        Ok(Self::new(RPM, value, Some(RPM_UNIT), node_count))
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl Computation for FixedValueSource {
    fn manifest(&self) -> &PortManifest {
        &self.manifest
    }

    fn compute(&self, _inputs: &PortValues) -> Result<PortValues, ComputeError> {
        Ok(PortValues::new().with(
            self.port.clone(),
            PortValue::broadcast(self.value, self.node_count, self.unit.as_deref()),
        ))
    }
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{
    MAX_THRUST_ADDER_ID, PROPELLER_THRUST, PROPELLER_THRUST_MAX, THRUST_ADDER_ID, THRUST_UNIT,
    TOTAL_THRUST, TOTAL_THRUST_MAX, TURBOSHAFT_THRUST, TURBOSHAFT_THRUST_MAX,
};
use crate::errors::ComputeError;
use crate::ports::{Port, PortManifest, PortValue, PortValues};
use crate::traits::Computation;

/// Which thrust total a combiner produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinerKind {
    Nominal,
    Max,
}

impl CombinerKind {
    pub fn operands(self) -> [&'static str; 2] {
        match self {
            CombinerKind::Nominal => [TURBOSHAFT_THRUST, PROPELLER_THRUST],
            CombinerKind::Max => [TURBOSHAFT_THRUST_MAX, PROPELLER_THRUST_MAX],
        }
    }

    pub fn result(self) -> &'static str {
        match self {
            CombinerKind::Nominal => TOTAL_THRUST,
            CombinerKind::Max => TOTAL_THRUST_MAX,
        }
    }

    pub fn instance_id(self) -> &'static str {
        match self {
            CombinerKind::Nominal => THRUST_ADDER_ID,
            CombinerKind::Max => MAX_THRUST_ADDER_ID,
        }
    }
}

/// Element-wise sum of turboshaft and propeller thrust.
///
/// Both operands default to zero, so a missing contribution (no residual jet
/// thrust, or no propeller) reads as nothing rather than an error.
#[derive(Debug, Clone)]
pub struct ThrustCombiner {
    kind: CombinerKind,
    manifest: PortManifest,
}

impl ThrustCombiner {
    pub fn new(kind: CombinerKind) -> Self {
        let [turboshaft, propeller] = kind.operands();
        let manifest = PortManifest::new()
            .with(Port::input(turboshaft, Some(THRUST_UNIT)).with_default(0.0))
            .with(Port::input(propeller, Some(THRUST_UNIT)).with_default(0.0))
            .with(Port::output(kind.result(), Some(THRUST_UNIT)));
        Self { kind, manifest }
    }

    pub fn kind(&self) -> CombinerKind {
        self.kind
    }
}

impl Computation for ThrustCombiner {
    fn manifest(&self) -> &PortManifest {
        &self.manifest
    }

    fn compute(&self, inputs: &PortValues) -> Result<PortValues, ComputeError> {
        let [turboshaft, propeller] = self.kind.operands();
        let operand = |name: &str| {
            inputs
                .get(name)
                .map(|v| v.values.as_slice())
                .ok_or_else(|| ComputeError::new(format!("missing operand '{name}'")))
        };
        let a = operand(turboshaft)?;
        let b = operand(propeller)?;
        if a.len() != b.len() {
            return Err(ComputeError::new(format!(
                "operand lengths differ: '{turboshaft}' has {}, '{propeller}' has {}",
                a.len(),
                b.len()
            )));
        }

        let total = a.iter().zip(b).map(|(x, y)| x + y).collect();
        Ok(PortValues::new().with(self.kind.result(), PortValue::new(total, Some(THRUST_UNIT))))
    }
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Naming conventions that bind ports across stages.
//!
//! Stages are authored independently, so the resolver cannot know ahead of
//! time which output feeds which input. Instead, a stage opts into a binding
//! by naming its ports according to the table below. For example a gearbox
//! that wants the power-source's `shaft_power` names its input
//! `shaft_power_in` and its reduced result `shaft_power_out`.
//!
//! | role               | pattern              | meaning                                         |
//! |--------------------|----------------------|-------------------------------------------------|
//! | `ReductionInput`   | `{v}_in`             | value entering the gearbox                      |
//! | `ReductionOutput`  | `{v}_out`            | value leaving the gearbox                       |
//! | `ReductionLink`    | `{v}_gearbox`        | synthetic name joining power-source and gearbox |
//! | `MaxPower`         | `{v}_max`            | maximum-power variant of a value                |
//! | `TurboshaftThrust` | `turboshaft_{v}`     | power-source thrust fed to the combiner         |
//! | `PropellerThrust`  | `propeller_{v}`      | propeller thrust fed to the combiner            |
//! | `FixedValue`       | `fixed_{v}`          | constant override routed into the gearbox       |
//! | `Discarded`        | `AUTO_OVERRIDE:{v}`  | overridden output, never exposed                |
//!
//! Names are matched as whole tokens, never as substrings.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConventionRole {
    ReductionInput,
    ReductionOutput,
    ReductionLink,
    MaxPower,
    TurboshaftThrust,
    PropellerThrust,
    FixedValue,
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affix {
    Prefix(&'static str),
    Suffix(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamingConvention {
    pub role: ConventionRole,
    pub affix: Affix,
}

pub const CONVENTIONS: &[NamingConvention] = &[
    NamingConvention { role: ConventionRole::ReductionInput, affix: Affix::Suffix("_in") },
    NamingConvention { role: ConventionRole::ReductionOutput, affix: Affix::Suffix("_out") },
    NamingConvention { role: ConventionRole::ReductionLink, affix: Affix::Suffix("_gearbox") },
    NamingConvention { role: ConventionRole::MaxPower, affix: Affix::Suffix("_max") },
    NamingConvention { role: ConventionRole::TurboshaftThrust, affix: Affix::Prefix("turboshaft_") },
    NamingConvention { role: ConventionRole::PropellerThrust, affix: Affix::Prefix("propeller_") },
    NamingConvention { role: ConventionRole::FixedValue, affix: Affix::Prefix("fixed_") },
    NamingConvention { role: ConventionRole::Discarded, affix: Affix::Prefix("AUTO_OVERRIDE:") },
];

impl ConventionRole {
    pub fn convention(self) -> &'static NamingConvention {
        CONVENTIONS
            .iter()
            .find(|c| c.role == self)
            .unwrap_or_else(|| unreachable!("every role has a row in CONVENTIONS"))
    }

    /// Decorate a base port name with this role's affix.
    pub fn apply(self, base: &str) -> String {
        match self.convention().affix {
            Affix::Prefix(prefix) => format!("{prefix}{base}"),
            Affix::Suffix(suffix) => format!("{base}{suffix}"),
        }
    }

    /// Recover the base name if `name` follows this role's pattern.
    pub fn strip(self, name: &str) -> Option<&str> {
        let base = match self.convention().affix {
            Affix::Prefix(prefix) => name.strip_prefix(prefix),
            Affix::Suffix(suffix) => name.strip_suffix(suffix),
        }?;
        (!base.is_empty()).then_some(base)
    }

    pub fn matches(self, name: &str) -> bool {
        self.strip(name).is_some()
    }
}

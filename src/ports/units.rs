// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Linear unit conversion for values crossing a port connection.
//!
//! Port units are plain strings. Each supported name maps onto a `uom`
//! quantity and unit; a value is taken to SI by building the quantity and
//! reading it back in the family's base unit. Conversion is only defined
//! inside a family. A port without a unit is treated as "unchecked": values
//! pass through unconverted in either direction.

use uom::si::f64::{AngularVelocity, Force, Length, Power, Ratio, Torque, Velocity};
use uom::si::{angular_velocity, force, length, power, ratio, torque, velocity};

use crate::errors::UnitError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitFamily {
    AngularSpeed,
    Force,
    Power,
    Speed,
    Torque,
    Length,
    Dimensionless,
}

struct UnitDef {
    name: &'static str,
    family: UnitFamily,
    to_si: fn(f64) -> f64,
}

const UNITS: &[UnitDef] = &[
    UnitDef {
        name: "rad/s",
        family: UnitFamily::AngularSpeed,
        to_si: |v| AngularVelocity::new::<angular_velocity::radian_per_second>(v).value,
    },
    UnitDef {
        name: "rpm",
        family: UnitFamily::AngularSpeed,
        to_si: |v| AngularVelocity::new::<angular_velocity::revolution_per_minute>(v).value,
    },
    UnitDef {
        name: "deg/s",
        family: UnitFamily::AngularSpeed,
        to_si: |v| AngularVelocity::new::<angular_velocity::degree_per_second>(v).value,
    },
    // One rotation per second.
    UnitDef {
        name: "Hz",
        family: UnitFamily::AngularSpeed,
        to_si: |v| AngularVelocity::new::<angular_velocity::revolution_per_second>(v).value,
    },
    UnitDef {
        name: "N",
        family: UnitFamily::Force,
        to_si: |v| Force::new::<force::newton>(v).value,
    },
    UnitDef {
        name: "kN",
        family: UnitFamily::Force,
        to_si: |v| Force::new::<force::kilonewton>(v).value,
    },
    UnitDef {
        name: "lbf",
        family: UnitFamily::Force,
        to_si: |v| Force::new::<force::pound_force>(v).value,
    },
    UnitDef {
        name: "W",
        family: UnitFamily::Power,
        to_si: |v| Power::new::<power::watt>(v).value,
    },
    UnitDef {
        name: "kW",
        family: UnitFamily::Power,
        to_si: |v| Power::new::<power::kilowatt>(v).value,
    },
    UnitDef {
        name: "hp",
        family: UnitFamily::Power,
        to_si: |v| Power::new::<power::horsepower>(v).value,
    },
    UnitDef {
        name: "m/s",
        family: UnitFamily::Speed,
        to_si: |v| Velocity::new::<velocity::meter_per_second>(v).value,
    },
    UnitDef {
        name: "ft/s",
        family: UnitFamily::Speed,
        to_si: |v| Velocity::new::<velocity::foot_per_second>(v).value,
    },
    UnitDef {
        name: "kn",
        family: UnitFamily::Speed,
        to_si: |v| Velocity::new::<velocity::knot>(v).value,
    },
    UnitDef {
        name: "km/h",
        family: UnitFamily::Speed,
        to_si: |v| Velocity::new::<velocity::kilometer_per_hour>(v).value,
    },
    UnitDef {
        name: "N*m",
        family: UnitFamily::Torque,
        to_si: |v| Torque::new::<torque::newton_meter>(v).value,
    },
    UnitDef {
        name: "ft*lbf",
        family: UnitFamily::Torque,
        to_si: |v| Torque::new::<torque::pound_force_foot>(v).value,
    },
    UnitDef {
        name: "m",
        family: UnitFamily::Length,
        to_si: |v| Length::new::<length::meter>(v).value,
    },
    UnitDef {
        name: "ft",
        family: UnitFamily::Length,
        to_si: |v| Length::new::<length::foot>(v).value,
    },
    UnitDef {
        name: "inch",
        family: UnitFamily::Length,
        to_si: |v| Length::new::<length::inch>(v).value,
    },
    UnitDef {
        name: "unitless",
        family: UnitFamily::Dimensionless,
        to_si: |v| Ratio::new::<ratio::ratio>(v).value,
    },
];

fn lookup(name: &str) -> Result<&'static UnitDef, UnitError> {
    UNITS
        .iter()
        .find(|u| u.name == name)
        .ok_or_else(|| UnitError::Unknown(name.to_string()))
}

/// True when the unit name is in the conversion table.
pub fn is_known(name: &str) -> bool {
    lookup(name).is_ok()
}

pub fn family(name: &str) -> Result<UnitFamily, UnitError> {
    lookup(name).map(|u| u.family)
}

/// Multiplier taking a value in `from` to a value in `to`.
pub fn conversion_factor(from: Option<&str>, to: Option<&str>) -> Result<f64, UnitError> {
    let (from, to) = match (from, to) {
        (Some(from), Some(to)) if from != to => (lookup(from)?, lookup(to)?),
        _ => return Ok(1.0),
    };

    if from.family != to.family {
        return Err(UnitError::Incompatible {
            from: from.name.to_string(),
            to: to.name.to_string(),
        });
    }

    Ok((from.to_si)(1.0) / (to.to_si)(1.0))
}

/// Wiring-time check that a connection between the two units is convertible.
pub fn check_compatible(from: Option<&str>, to: Option<&str>) -> Result<(), UnitError> {
    conversion_factor(from, to).map(|_| ())
}

pub fn convert(value: f64, from: Option<&str>, to: Option<&str>) -> Result<f64, UnitError> {
    Ok(value * conversion_factor(from, to)?)
}

pub fn convert_all(values: &[f64], from: Option<&str>, to: Option<&str>) -> Result<Vec<f64>, UnitError> {
    let factor = conversion_factor(from, to)?;
    Ok(values.iter().map(|v| v * factor).collect())
}

// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Port resolution for the per-node phase.
//!
//! # Algorithm
//!
//! Every instance port starts out promoted under its own name (or internal,
//! for the parts of the max-power propeller branch that must not collide with
//! the nominal branch). Rules are then applied in a fixed order, and a later
//! rule replaces whatever an earlier rule decided for the same port:
//!
//! 1. Power-source `thrust`/`thrust_max` are renamed for the thrust combiner.
//! 2. With a gearbox, every power-source output `v` other than the rotational
//!    speed joins a gearbox input named `v` or `v_in` through `v_gearbox`.
//! 3. Rotational speed. A fixed override discards the computed value and binds
//!    a constant source instead; without an override, the gearbox RPM input is
//!    joined to the power-source RPM output.
//! 4. With a gearbox, a gearbox output `v_out` feeds the propeller input `v`
//!    directly under its canonical name.
//! 5. Propeller `thrust` (nominal branch) and max-branch thrust are renamed
//!    for the thrust combiner.
//!
//! The resulting bindings are assembled into a [`WiringMap`], which rejects
//! any promoted name claimed by two producers.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::consts::{RPM, SHAFT_POWER, THRUST, THRUST_MAX, TOTAL_THRUST, TOTAL_THRUST_MAX};
use crate::errors::PipelineError;
use crate::observability::messages::pipeline::{BindingSuperseded, WiringResolved};
use crate::observability::messages::StructuredLog;
use crate::ports::{ConventionRole, Direction, PortManifest};
use crate::wiring::map::{PortBinding, PortRef, WiringMap, WiringRule};
use crate::wiring::{Diagnostic, Diagnostics};

/// What an instance is for. Resolution rules are keyed on roles, never on ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstanceRole {
    PowerSource,
    FixedValueSource,
    Gearbox,
    PropellerBase,
    PropellerMax,
    ThrustCombiner,
    MaxThrustCombiner,
}

/// A realized instance as seen by the resolver: its id, role and manifest.
#[derive(Debug, Clone, Copy)]
pub struct InstanceSpec<'a> {
    pub id: &'a str,
    pub role: InstanceRole,
    pub manifest: &'a PortManifest,
}

/// A user-supplied constant that replaces a computed port for every node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixedValueOverride {
    pub port_name: String,
    pub value: f64,
    pub unit: Option<String>,
    pub node_count: usize,
}

impl FixedValueOverride {
    pub fn rpm(value: f64, unit: Option<&str>, node_count: usize) -> Self {
        Self {
            port_name: RPM.to_string(),
            value,
            unit: unit.map(str::to_string),
            node_count,
        }
    }
}

/// Exhaustive shape of the per-node topology.
enum Topology<'a> {
    NoGearbox,
    WithGearbox { gearbox: InstanceSpec<'a> },
}

type BindingKey = (usize, Direction, String);

/// Promotion decisions under construction, keyed by instance position so the
/// final binding list comes out in a stable order.
struct BindingTable<'a> {
    instances: &'a [InstanceSpec<'a>],
    entries: BTreeMap<BindingKey, (Option<String>, WiringRule)>,
}

impl<'a> BindingTable<'a> {
    fn new(instances: &'a [InstanceSpec<'a>]) -> Self {
        Self {
            instances,
            entries: BTreeMap::new(),
        }
    }

    fn index_of(&self, id: &str) -> usize {
        self.instances
            .iter()
            .position(|i| i.id == id)
            .unwrap_or_else(|| unreachable!("instance '{id}' is not part of this resolution"))
    }

    fn set(
        &mut self,
        instance: &InstanceSpec<'_>,
        direction: Direction,
        port: &str,
        promoted: Option<String>,
        rule: WiringRule,
    ) {
        let key = (self.index_of(instance.id), direction, port.to_string());
        if let Some((previous, previous_rule)) = self.entries.insert(key, (promoted, rule)) {
            if previous_rule != WiringRule::PassThrough && previous_rule != rule {
                BindingSuperseded {
                    instance_id: instance.id,
                    port,
                    previous: previous.as_deref(),
                    previous_rule,
                    rule,
                }
                .log();
            }
        }
    }

    fn promote(&mut self, instance: &InstanceSpec<'_>, direction: Direction, port: &str, promoted: &str, rule: WiringRule) {
        self.set(instance, direction, port, Some(promoted.to_string()), rule);
    }

    fn hide(&mut self, instance: &InstanceSpec<'_>, direction: Direction, port: &str) {
        self.set(instance, direction, port, None, WiringRule::Internal);
    }

    fn promoted(&self, instance: &InstanceSpec<'_>, direction: Direction, port: &str) -> Option<&str> {
        let key = (self.index_of(instance.id), direction, port.to_string());
        self.entries.get(&key).and_then(|(p, _)| p.as_deref())
    }

    fn into_bindings(self) -> Vec<PortBinding> {
        let instances = self.instances;
        self.entries
            .into_iter()
            .map(|((index, direction, port), (promoted, rule))| PortBinding {
                port: PortRef::new(instances[index].id, port),
                direction,
                promoted,
                rule,
            })
            .collect()
    }
}

/// Computes the wiring map joining realized per-node instances.
#[derive(Debug, Clone, Default)]
pub struct PortResolver {
    fixed_override: Option<FixedValueOverride>,
}

impl PortResolver {
    pub fn new(fixed_override: Option<FixedValueOverride>) -> Self {
        Self { fixed_override }
    }

    pub fn fixed_override(&self) -> Option<&FixedValueOverride> {
        self.fixed_override.as_ref()
    }

    /// Resolve the wiring for a set of realized instances.
    ///
    /// At most one instance per role is expected. The fixed-value source must
    /// be present exactly when an override is configured. Override warnings
    /// are appended to `diagnostics`; errors abort resolution.
    pub fn resolve(
        &self,
        instances: &[InstanceSpec<'_>],
        diagnostics: &mut Diagnostics,
    ) -> Result<WiringMap, PipelineError> {
        let find = |role: InstanceRole| instances.iter().find(|i| i.role == role).copied();

        let power_source = find(InstanceRole::PowerSource);
        let fixed_source = find(InstanceRole::FixedValueSource);
        let propeller_base = find(InstanceRole::PropellerBase);
        let propeller_max = find(InstanceRole::PropellerMax);
        let topology = match find(InstanceRole::Gearbox) {
            Some(gearbox) => Topology::WithGearbox { gearbox },
            None => Topology::NoGearbox,
        };

        let mut table = BindingTable::new(instances);
        Self::seed_defaults(&mut table, instances);

        if let Some(ps) = &power_source {
            Self::route_power_source_thrust(&mut table, ps);
            if let Topology::WithGearbox { gearbox } = &topology {
                Self::link_power_source_to_gearbox(&mut table, ps, gearbox);
            }
        }

        self.route_rotational_speed(
            &mut table,
            power_source.as_ref(),
            fixed_source.as_ref(),
            &topology,
            diagnostics,
        )?;

        if let Topology::WithGearbox { gearbox } = &topology {
            let propeller_inputs = Self::propeller_group_inputs(
                &table,
                propeller_base.as_ref(),
                propeller_max.as_ref(),
            );
            Self::feed_propeller_from_gearbox(&mut table, gearbox, &propeller_inputs);
        }

        Self::route_propeller_thrust(&mut table, propeller_base.as_ref(), propeller_max.as_ref());

        let manifests: BTreeMap<&str, &PortManifest> =
            instances.iter().map(|i| (i.id, i.manifest)).collect();
        let map = WiringMap::assemble(table.into_bindings(), &manifests)?;

        WiringResolved {
            instance_count: instances.len(),
            edge_count: map.edges().len(),
            exposed_inputs: map.exposed_inputs().len(),
            exposed_outputs: map.exposed_outputs().len(),
        }
        .log();

        Ok(map)
    }

    /// Identity promotion for every port, plus the fixed renames that keep the
    /// two propeller branches and the combiners apart.
    fn seed_defaults(table: &mut BindingTable<'_>, instances: &[InstanceSpec<'_>]) {
        for instance in instances {
            for name in instance.manifest.input_names() {
                table.promote(instance, Direction::Input, name, name, WiringRule::PassThrough);
            }
            for name in instance.manifest.output_names() {
                table.promote(instance, Direction::Output, name, name, WiringRule::PassThrough);
            }

            match instance.role {
                InstanceRole::PropellerBase => {
                    // The max branch supplies thrust_max for the propeller group.
                    if instance.manifest.has_output(THRUST_MAX) {
                        table.hide(instance, Direction::Output, THRUST_MAX);
                    }
                }
                InstanceRole::PropellerMax => {
                    if instance.manifest.has_input(SHAFT_POWER) {
                        let max_power = ConventionRole::MaxPower.apply(SHAFT_POWER);
                        table.promote(instance, Direction::Input, SHAFT_POWER, &max_power, WiringRule::MaxPowerBranch);
                    }
                    for name in instance.manifest.output_names() {
                        if name == THRUST {
                            table.promote(instance, Direction::Output, name, THRUST_MAX, WiringRule::MaxPowerBranch);
                        } else {
                            table.hide(instance, Direction::Output, name);
                        }
                    }
                }
                InstanceRole::ThrustCombiner => {
                    table.promote(instance, Direction::Output, TOTAL_THRUST, THRUST, WiringRule::Combiner);
                }
                InstanceRole::MaxThrustCombiner => {
                    table.promote(instance, Direction::Output, TOTAL_THRUST_MAX, THRUST_MAX, WiringRule::Combiner);
                }
                InstanceRole::PowerSource | InstanceRole::FixedValueSource | InstanceRole::Gearbox => {}
            }
        }
    }

    fn route_power_source_thrust(table: &mut BindingTable<'_>, ps: &InstanceSpec<'_>) {
        for name in [THRUST, THRUST_MAX] {
            if ps.manifest.has_output(name) {
                let alias = ConventionRole::TurboshaftThrust.apply(name);
                table.promote(ps, Direction::Output, name, &alias, WiringRule::TurboshaftThrust);
            }
        }
    }

    fn link_power_source_to_gearbox(
        table: &mut BindingTable<'_>,
        ps: &InstanceSpec<'_>,
        gearbox: &InstanceSpec<'_>,
    ) {
        for name in ps.manifest.output_names().filter(|n| *n != RPM) {
            let Some(gearbox_input) = Self::reduction_input(gearbox, name) else {
                continue;
            };
            let link = ConventionRole::ReductionLink.apply(name);
            table.promote(ps, Direction::Output, name, &link, WiringRule::ReductionLink);
            table.promote(gearbox, Direction::Input, &gearbox_input, &link, WiringRule::ReductionLink);
        }
    }

    /// The gearbox input receiving `name`: `name` itself, else `name_in`.
    fn reduction_input(gearbox: &InstanceSpec<'_>, name: &str) -> Option<String> {
        if gearbox.manifest.has_input(name) {
            return Some(name.to_string());
        }
        let suffixed = ConventionRole::ReductionInput.apply(name);
        gearbox.manifest.has_input(&suffixed).then_some(suffixed)
    }

    fn route_rotational_speed(
        &self,
        table: &mut BindingTable<'_>,
        power_source: Option<&InstanceSpec<'_>>,
        fixed_source: Option<&InstanceSpec<'_>>,
        topology: &Topology<'_>,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), PipelineError> {
        match (&self.fixed_override, fixed_source) {
            (Some(fixed), Some(source)) => {
                let port = fixed.port_name.as_str();
                if let Some(ps) = power_source.filter(|ps| ps.manifest.has_output(port)) {
                    diagnostics.push(Diagnostic::OverrideWarning {
                        stage: ps.id.to_string(),
                        port: port.to_string(),
                        value: fixed.value,
                        unit: fixed.unit.clone(),
                    });
                    let discarded = ConventionRole::Discarded.apply(port);
                    table.promote(ps, Direction::Output, port, &discarded, WiringRule::OverrideDiscard);
                }

                match topology {
                    Topology::WithGearbox { gearbox } => {
                        let gearbox_input = Self::reduction_input(gearbox, port).ok_or_else(|| {
                            PipelineError::configuration(
                                gearbox.id,
                                ConventionRole::ReductionInput.apply(port),
                                format!("gearbox has no '{port}' input to receive the fixed value"),
                            )
                        })?;
                        let fixed_name = ConventionRole::FixedValue.apply(port);
                        table.promote(source, Direction::Output, port, &fixed_name, WiringRule::FixedValue);
                        table.promote(gearbox, Direction::Input, &gearbox_input, &fixed_name, WiringRule::FixedValue);
                    }
                    Topology::NoGearbox => {
                        table.promote(source, Direction::Output, port, port, WiringRule::FixedValue);
                    }
                }
                Ok(())
            }
            (Some(fixed), None) => Err(PipelineError::configuration(
                "fixed_value_source",
                fixed.port_name.as_str(),
                "a fixed value is configured but its source was not instantiated",
            )),
            (None, _) => match topology {
                Topology::WithGearbox { gearbox } => {
                    let ps = power_source
                        .filter(|ps| ps.manifest.has_output(RPM))
                        .ok_or_else(|| {
                            PipelineError::configuration(
                                power_source.map(|ps| ps.id).unwrap_or("power_source"),
                                RPM,
                                "power source produces no RPM output to drive the gearbox and no fixed RPM is configured",
                            )
                        })?;
                    let gearbox_input = Self::reduction_input(gearbox, RPM).ok_or_else(|| {
                        PipelineError::configuration(
                            gearbox.id,
                            ConventionRole::ReductionInput.apply(RPM),
                            "gearbox has no RPM input",
                        )
                    })?;
                    let link = ConventionRole::ReductionLink.apply(RPM);
                    table.promote(ps, Direction::Output, RPM, &link, WiringRule::RpmLink);
                    table.promote(gearbox, Direction::Input, &gearbox_input, &link, WiringRule::RpmLink);
                    Ok(())
                }
                Topology::NoGearbox => Ok(()),
            },
        }
    }

    /// Promoted input names of the propeller group (both branches together).
    fn propeller_group_inputs(
        table: &BindingTable<'_>,
        base: Option<&InstanceSpec<'_>>,
        max: Option<&InstanceSpec<'_>>,
    ) -> BTreeSet<String> {
        [base, max]
            .into_iter()
            .flatten()
            .flat_map(|instance| {
                instance
                    .manifest
                    .input_names()
                    .filter_map(|name| table.promoted(instance, Direction::Input, name))
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    fn feed_propeller_from_gearbox(
        table: &mut BindingTable<'_>,
        gearbox: &InstanceSpec<'_>,
        propeller_inputs: &BTreeSet<String>,
    ) {
        for name in propeller_inputs {
            let reduced = ConventionRole::ReductionOutput.apply(name);
            if gearbox.manifest.has_output(&reduced) {
                table.promote(gearbox, Direction::Output, &reduced, name, WiringRule::ReductionOutput);
            }
        }
    }

    fn route_propeller_thrust(
        table: &mut BindingTable<'_>,
        base: Option<&InstanceSpec<'_>>,
        max: Option<&InstanceSpec<'_>>,
    ) {
        if let Some(base) = base.filter(|b| b.manifest.has_output(THRUST)) {
            let alias = ConventionRole::PropellerThrust.apply(THRUST);
            table.promote(base, Direction::Output, THRUST, &alias, WiringRule::PropellerThrust);
        }
        if let Some(max) = max.filter(|m| m.manifest.has_output(THRUST)) {
            let alias = ConventionRole::PropellerThrust.apply(THRUST_MAX);
            table.promote(max, Direction::Output, THRUST, &alias, WiringRule::PropellerThrust);
        }
    }
}

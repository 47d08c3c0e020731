// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::backends::stub::{StubOutput, StubPhase, StubStage};
use crate::config::{StageOptions, StageOptionsMap, Verbosity};
use crate::engine::{LevelByLevelExecutor, SequentialExecutor};
use crate::errors::{EvaluationError, PipelineError};
use crate::pipeline::{PipelineBuilder, PipelineConfig, PipelineOptions};
use crate::ports::{PortValue, PortValues};
use crate::traits::{BuildPhase, PipelineExecutor};
use crate::wiring::Diagnostic;

/// Build-and-evaluate tests for whole turboprop pipelines made of stub stages
#[cfg(test)]
mod tests {
    use super::*;

    fn close(actual: &[f64], expected: &[f64]) -> bool {
        actual.len() == expected.len()
            && actual
                .iter()
                .zip(expected)
                .all(|(a, e)| (a - e).abs() < 1e-9 * e.abs().max(1.0))
    }

    fn values<'a>(outputs: &'a PortValues, name: &str) -> &'a [f64] {
        &outputs
            .get(name)
            .unwrap_or_else(|| panic!("no output '{name}' in {:?}", outputs.keys().collect::<Vec<_>>()))
            .values
    }

    /// Constant power, RPM driven by a per-node throttle, and its own thrust.
    fn turboshaft(shaft_power: f64, shaft_power_max: f64) -> StubStage {
        StubStage::new("turboshaft")
            .input("throttle", None)
            .output("shaft_power", Some("hp"), StubOutput::Constant(shaft_power))
            .output("shaft_power_max", Some("hp"), StubOutput::Constant(shaft_power_max))
            .output("rpm", Some("rpm"), StubOutput::Scale("throttle", 6000.0))
            .output("thrust", Some("lbf"), StubOutput::Constant(50.0))
            .output("thrust_max", Some("lbf"), StubOutput::Constant(60.0))
    }

    fn gearbox() -> StubStage {
        StubStage::new("gearbox")
            .input("shaft_power_in", Some("hp"))
            .input("shaft_power_max_in", Some("hp"))
            .input("rpm_in", Some("rpm"))
            .output("shaft_power_out", Some("hp"), StubOutput::Copy("shaft_power_in"))
            .output("shaft_power_max_out", Some("hp"), StubOutput::Copy("shaft_power_max_in"))
            .output("rpm_out", Some("rpm"), StubOutput::Scale("rpm_in", 0.1))
    }

    /// Thrust proportional to shaft power; reports the RPM it saw.
    fn propeller() -> StubStage {
        StubStage::new("propeller")
            .input("shaft_power", Some("hp"))
            .input_with_default("rpm", Some("rpm"), 0.0)
            .output("thrust", Some("lbf"), StubOutput::Scale("shaft_power", 0.5))
            .output("rpm_seen", Some("rpm"), StubOutput::Copy("rpm"))
    }

    fn throttle(levels: &[f64]) -> PortValues {
        PortValues::new().with("throttle", PortValue::new(levels.to_vec(), None))
    }

    fn builder(config: PipelineConfig) -> PipelineBuilder {
        PipelineBuilder::new(config, PipelineOptions::default())
    }

    #[tokio::test]
    async fn test_direct_drive_sums_engine_and_propeller_thrust() {
        let config = PipelineConfig::new(Arc::new(turboshaft(1000.0, 1200.0)))
            .with_propeller(Arc::new(propeller()));
        let (pipeline, diagnostics) = builder(config).build_node(3).unwrap();
        assert!(diagnostics.is_empty());

        let outputs = LevelByLevelExecutor::new(4)
            .evaluate(&pipeline, throttle(&[1.0, 1.0, 1.0]))
            .await
            .unwrap();

        assert!(close(values(&outputs, "thrust"), &[550.0; 3]));
        assert!(close(values(&outputs, "thrust_max"), &[660.0; 3]));
        assert!(close(values(&outputs, "rpm"), &[6000.0; 3]));
        // Without a gearbox nothing is renamed for a reduction stage.
        assert!(outputs.keys().all(|k| !k.ends_with("_gearbox")));
    }

    #[tokio::test]
    async fn test_gearbox_receives_power_source_rpm_per_node() {
        let config = PipelineConfig::new(Arc::new(turboshaft(1000.0, 1200.0)))
            .with_gearbox(Arc::new(gearbox()))
            .with_propeller(Arc::new(propeller()));
        let (pipeline, _) = builder(config).build_node(2).unwrap();

        let outputs = LevelByLevelExecutor::new(2)
            .evaluate(&pipeline, throttle(&[0.5, 1.0]))
            .await
            .unwrap();

        assert!(close(values(&outputs, "rpm_seen"), &[300.0, 600.0]));
        assert!(close(values(&outputs, "rpm"), &[300.0, 600.0]));
        assert!(close(values(&outputs, "thrust"), &[550.0, 550.0]));
        assert!(close(values(&outputs, "thrust_max"), &[660.0, 660.0]));

        let wiring = pipeline.wiring();
        let link = wiring.edge_into("gearbox", "rpm_in").unwrap();
        assert_eq!(link.producer.to_string(), "turboshaft.rpm");
        assert_eq!(link.alias.as_deref(), Some("rpm_gearbox"));
    }

    #[tokio::test]
    async fn test_fixed_rpm_replaces_power_source_rpm() {
        let config = PipelineConfig::new(Arc::new(turboshaft(1000.0, 1000.0)))
            .with_gearbox(Arc::new(gearbox()))
            .with_propeller(Arc::new(propeller()));
        let options = PipelineOptions::default()
            .with_fixed_rpm(100.0, Some("rad/s"))
            .with_verbosity(Verbosity::Quiet);
        let (pipeline, diagnostics) = PipelineBuilder::new(config, options).build_node(2).unwrap();

        assert_eq!(diagnostics.len(), 1);
        assert!(pipeline.instance("fixed_rpm_source").is_some());

        // The warning reports the value the source publishes, in rpm.
        let fixed_rpm = 100.0 * 60.0 / (2.0 * std::f64::consts::PI);
        let Some(Diagnostic::OverrideWarning { value, unit, .. }) = diagnostics.iter().next() else {
            panic!("expected an override warning");
        };
        assert!((value - fixed_rpm).abs() < 1e-9, "{value}");
        assert_eq!(unit.as_deref(), Some("rpm"));
        assert!(diagnostics.iter().next().unwrap().to_string().ends_with(" rpm"));

        let outputs = SequentialExecutor::new()
            .evaluate(&pipeline, throttle(&[0.5, 1.0]))
            .await
            .unwrap();

        assert!(close(values(&outputs, "rpm_seen"), &[fixed_rpm * 0.1; 2]));
        assert!(!outputs.contains_key("AUTO_OVERRIDE:rpm"));
        assert!(!outputs.contains_key("rpm_gearbox"));
        assert!(pipeline
            .wiring()
            .edges()
            .iter()
            .all(|e| e.producer.to_string() != "turboshaft.rpm"));
    }

    #[test]
    fn test_quiet_build_keeps_diagnostics_but_emits_none() {
        let config = PipelineConfig::new(Arc::new(turboshaft(1000.0, 1000.0)))
            .with_propeller(Arc::new(propeller()));
        let quiet = PipelineOptions::default()
            .with_fixed_rpm(1500.0, None)
            .with_verbosity(Verbosity::Quiet);
        let builder = PipelineBuilder::new(config, quiet);

        let (_, diagnostics) = builder.build_node(1).unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.emit(builder.declared().options().verbosity), 0);
        assert_eq!(diagnostics.emit(Verbosity::Brief), 1);
    }

    #[test]
    fn test_wiring_is_identical_across_builds() {
        let config = PipelineConfig::new(Arc::new(turboshaft(1000.0, 1200.0)))
            .with_gearbox(Arc::new(gearbox()))
            .with_propeller(Arc::new(propeller()));
        let builder = PipelineBuilder::new(config, PipelineOptions::default().with_fixed_rpm(1500.0, None));

        let (first, first_diagnostics) = builder.build_node(4).unwrap();
        let (second, second_diagnostics) = builder.build_node(4).unwrap();
        assert_eq!(
            serde_json::to_string(first.wiring()).unwrap(),
            serde_json::to_string(second.wiring()).unwrap()
        );
        assert_eq!(first_diagnostics, second_diagnostics);
        assert_eq!(first.levels(), second.levels());
    }

    #[tokio::test]
    async fn test_max_branch_reads_max_power_even_when_equal() {
        let config = PipelineConfig::new(Arc::new(turboshaft(800.0, 800.0)))
            .with_propeller(Arc::new(propeller()));
        let (pipeline, _) = builder(config).build_node(1).unwrap();

        let wiring = pipeline.wiring();
        assert_eq!(
            wiring.edge_into("propeller_max", "shaft_power").unwrap().producer.to_string(),
            "turboshaft.shaft_power_max"
        );
        assert_eq!(
            wiring.edge_into("propeller_base", "shaft_power").unwrap().producer.to_string(),
            "turboshaft.shaft_power"
        );

        let outputs = SequentialExecutor::new()
            .evaluate(&pipeline, throttle(&[1.0]))
            .await
            .unwrap();
        assert!(close(values(&outputs, "propeller_thrust"), &[400.0]));
        assert!(close(values(&outputs, "propeller_thrust_max"), &[400.0]));
    }

    #[test]
    fn test_propeller_is_built_once_per_branch() {
        let propeller = Arc::new(propeller());
        let config = PipelineConfig::new(Arc::new(turboshaft(1000.0, 1200.0))).with_propeller(propeller.clone());
        let (pipeline, _) = builder(config).build_node(5).unwrap();

        assert_eq!(propeller.node_builds(), 2);
        assert_eq!(
            pipeline.instance_ids().collect::<Vec<_>>(),
            vec!["turboshaft", "propeller_base", "propeller_max", "thrust_adder", "max_thrust_adder"]
        );
    }

    #[tokio::test]
    async fn test_single_node_produces_single_values() {
        let config = PipelineConfig::new(Arc::new(turboshaft(1000.0, 1200.0)))
            .with_gearbox(Arc::new(gearbox()))
            .with_propeller(Arc::new(propeller()));
        let (pipeline, _) = builder(config).build_node(1).unwrap();

        let outputs = LevelByLevelExecutor::new(1)
            .evaluate(&pipeline, throttle(&[1.0]))
            .await
            .unwrap();
        assert!(outputs.iter().all(|(_, v)| v.len() == 1));
    }

    #[tokio::test]
    async fn test_omitted_gearbox_behaves_like_direct_drive() {
        let config = PipelineConfig::new(Arc::new(turboshaft(1000.0, 1200.0)))
            .with_gearbox(Arc::new(StubStage::omitted("gearbox")))
            .with_propeller(Arc::new(propeller()));
        let (pipeline, _) = builder(config).build_node(2).unwrap();

        assert!(pipeline.instance("gearbox").is_none());
        assert!(!pipeline.wiring().mentions("rpm_gearbox"));

        let outputs = SequentialExecutor::new()
            .evaluate(&pipeline, throttle(&[1.0, 1.0]))
            .await
            .unwrap();
        assert!(close(values(&outputs, "rpm"), &[6000.0, 6000.0]));
        assert!(close(values(&outputs, "thrust"), &[550.0, 550.0]));
    }

    #[test]
    fn test_stage_options_are_looked_up_by_stage_id() {
        let power_source = Arc::new(turboshaft(1000.0, 1200.0));
        let propeller = Arc::new(propeller());
        let config = PipelineConfig::new(power_source.clone()).with_propeller(propeller.clone());
        let options = PipelineOptions::default().with_stage_options(
            StageOptionsMap::new().with("propeller", StageOptions::new().with("diameter", 9.0)),
        );
        PipelineBuilder::new(config, options).build_node(1).unwrap();

        let seen = propeller.last_options().unwrap();
        assert_eq!(seen.get_f64("diameter").unwrap(), Some(9.0));
        assert!(power_source.last_options().unwrap().is_empty());
    }

    #[test]
    fn test_stage_build_failure_names_the_stage() {
        let config = PipelineConfig::new(Arc::new(turboshaft(1000.0, 1200.0)))
            .with_propeller(Arc::new(propeller()));
        let options = PipelineOptions::default().with_stage_options(
            StageOptionsMap::new().with("turboshaft", StageOptions::new().with("reject", "too hot")),
        );
        let err = PipelineBuilder::new(config, options).build_node(1).unwrap_err();
        match err {
            PipelineError::StageBuild { stage, phase, .. } => {
                assert_eq!(stage, "turboshaft");
                assert_eq!(phase, BuildPhase::Node);
            }
            other => panic!("expected a stage build error, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_batch_phases_join_ports_by_name() {
        let power_source = turboshaft(1000.0, 1200.0).pre(
            StubPhase::new().output("design_power", Some("hp"), StubOutput::Constant(1000.0)),
        );
        let propeller = propeller().pre(
            StubPhase::new()
                .input("design_power", Some("hp"))
                .output("diameter", Some("ft"), StubOutput::Scale("design_power", 0.01)),
        );
        let builder = builder(
            PipelineConfig::new(Arc::new(power_source)).with_propeller(Arc::new(propeller)),
        );

        let pre = builder.build_pre().unwrap();
        assert_eq!(pre.phase(), BuildPhase::Pre);
        assert_eq!(pre.node_count(), None);
        assert_eq!(pre.levels().len(), 2);
        let edge = pre.wiring().edge_into("propeller", "design_power").unwrap();
        assert_eq!(edge.producer.to_string(), "turboshaft.design_power");
        assert_eq!(edge.alias, None);

        let outputs = SequentialExecutor::new().evaluate(&pre, PortValues::new()).await.unwrap();
        assert!(close(values(&outputs, "diameter"), &[10.0]));

        let post = builder.build_post().unwrap();
        assert!(post.is_empty());
        let outputs = SequentialExecutor::new().evaluate(&post, PortValues::new()).await.unwrap();
        assert!(outputs.is_empty());
    }

    #[test]
    fn test_default_propeller_fills_the_slot() {
        let config = PipelineConfig::new(Arc::new(turboshaft(1000.0, 1200.0)));
        assert!(config.propeller().is_default());

        let (pipeline, _) = builder(config).build_node(2).unwrap();
        assert!(pipeline.instance("propeller_model_base").is_some());
        assert!(pipeline.instance("propeller_model_max").is_some());
    }

    #[tokio::test]
    async fn test_missing_required_input_is_reported() {
        let config = PipelineConfig::new(Arc::new(turboshaft(1000.0, 1200.0)))
            .with_propeller(Arc::new(propeller()));
        let (pipeline, _) = builder(config).build_node(2).unwrap();
        assert_eq!(pipeline.required_inputs().collect::<Vec<_>>(), vec!["throttle"]);

        let err = SequentialExecutor::new()
            .evaluate(&pipeline, PortValues::new())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            EvaluationError::MissingInput {
                instance: "turboshaft".into(),
                port: "throttle".into(),
                promoted: "throttle".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_wrongly_sized_input_is_a_shape_error() {
        let config = PipelineConfig::new(Arc::new(turboshaft(1000.0, 1200.0)))
            .with_propeller(Arc::new(propeller()));
        let (pipeline, _) = builder(config).build_node(3).unwrap();

        let err = LevelByLevelExecutor::new(2)
            .evaluate(&pipeline, throttle(&[1.0]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EvaluationError::ShapeMismatch { expected: 3, actual: 1, .. }
        ));
    }

    #[tokio::test]
    async fn test_failing_computation_aborts_evaluation() {
        let propeller = StubStage::new("propeller").node(
            StubPhase::new()
                .input("shaft_power", Some("hp"))
                .output("thrust", Some("lbf"), StubOutput::Constant(0.0))
                .failing(),
        );
        let config = PipelineConfig::new(Arc::new(turboshaft(1000.0, 1200.0)))
            .with_propeller(Arc::new(propeller));
        let (pipeline, _) = builder(config).build_node(2).unwrap();

        for executor in [
            Box::new(SequentialExecutor::new()) as Box<dyn PipelineExecutor>,
            Box::new(LevelByLevelExecutor::new(4)),
        ] {
            let err = executor
                .evaluate(&pipeline, throttle(&[1.0, 1.0]))
                .await
                .unwrap_err();
            match err {
                EvaluationError::ComputationFailed { instance, .. } => {
                    assert!(instance.starts_with("propeller_"), "{instance}");
                }
                other => panic!("{} returned {other}", executor.name()),
            }
        }
    }

    #[tokio::test]
    async fn test_executors_agree() {
        let config = PipelineConfig::new(Arc::new(turboshaft(1000.0, 1200.0)))
            .with_gearbox(Arc::new(gearbox()))
            .with_propeller(Arc::new(propeller()));
        let (pipeline, _) = builder(config).build_node(4).unwrap();
        let inputs = throttle(&[0.25, 0.5, 0.75, 1.0]);

        let sequential = SequentialExecutor::new()
            .evaluate(&pipeline, inputs.clone())
            .await
            .unwrap();
        let level_by_level = LevelByLevelExecutor::new(3)
            .evaluate(&pipeline, inputs)
            .await
            .unwrap();
        assert_eq!(sequential, level_by_level);
    }
}

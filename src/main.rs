// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context, Result};
use std::env;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use turboprop_composer::config::{load_and_validate_config, Config, RuntimeBuilder};
use turboprop_composer::pipeline::{FrozenPipeline, PipelineBuilder};
use turboprop_composer::ports::{PortValue, PortValues};
use turboprop_composer::traits::PipelineExecutor;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <config.yaml|config.toml> [more configs ...]", args[0]);
        eprintln!("Example: {} demos/turboprop-gearbox.yaml", args[0]);
        std::process::exit(1);
    }

    println!("🚀 Turboprop Composition");
    println!("═══════════════════════════════════");

    let mut failures = 0;
    for (i, config_file) in args[1..].iter().enumerate() {
        if i > 0 {
            println!("\n{}", "─".repeat(80));
        }
        if let Err(e) = run_single_config(config_file).await {
            eprintln!("❌ Failed to evaluate {}: {:#}", config_file, e);
            failures += 1;
        }
    }

    if failures > 0 {
        bail!("{} configuration(s) failed", failures);
    }
    println!("\n🎉 Done!");
    Ok(())
}

async fn run_single_config(config_file: &str) -> Result<()> {
    let start_time = Instant::now();
    let config = load_and_validate_config(config_file)
        .with_context(|| format!("loading {config_file}"))?;
    let (declared, executor) = RuntimeBuilder::from_config(&config)?;
    let builder = PipelineBuilder::from_declared(declared);

    println!("📋 Configuration: {} ({})", config_file, config.name);
    println!("🔧 Strategy: {}", executor.name());
    println!("🔢 Nodes: {}", config.node_count);
    if let Some(fixed) = &config.fixed_rpm {
        println!("📌 Fixed RPM: {} {}", fixed.value, fixed.unit.as_deref().unwrap_or("rpm"));
    }

    let pre = builder.build_pre()?;
    run_phase("Pre-batch", &pre, executor.as_ref(), &config).await?;

    // Diagnostics are reported through tracing by the builder, gated on verbosity.
    let (node, _diagnostics) = builder.build_node(config.node_count)?;
    print_wiring(&node);
    run_phase("Per-node", &node, executor.as_ref(), &config).await?;

    let post = builder.build_post()?;
    run_phase("Post-batch", &post, executor.as_ref(), &config).await?;

    println!("\n⏱️  Total Time: {:?}", start_time.elapsed());
    Ok(())
}

/// Broadcast the configured scalar inputs to the pipeline's exposed inputs.
fn inputs_for(pipeline: &FrozenPipeline, config: &Config) -> PortValues {
    let len = pipeline.node_count().unwrap_or(1);
    pipeline
        .wiring()
        .exposed_inputs()
        .iter()
        .filter_map(|exposed| {
            config.inputs.get(&exposed.name).map(|input| {
                (
                    exposed.name.clone(),
                    PortValue::broadcast(input.value, len, input.unit.as_deref()),
                )
            })
        })
        .collect::<std::collections::BTreeMap<_, _>>()
        .into()
}

async fn run_phase(
    label: &str,
    pipeline: &FrozenPipeline,
    executor: &dyn PipelineExecutor,
    config: &Config,
) -> Result<()> {
    if pipeline.is_empty() {
        println!("\n⏭️  {}: nothing to evaluate", label);
        return Ok(());
    }

    let missing: Vec<&str> = pipeline
        .required_inputs()
        .filter(|name| !config.inputs.contains_key(*name))
        .collect();
    if !missing.is_empty() {
        bail!("{} pipeline needs inputs: {}", label, missing.join(", "));
    }

    let outputs = executor
        .evaluate(pipeline, inputs_for(pipeline, config))
        .await
        .with_context(|| format!("evaluating {label} pipeline"))?;

    println!("\n📊 {} Outputs:", label);
    for (name, value) in outputs.iter() {
        let formatted: Vec<String> = value.values.iter().map(|v| format!("{:.2}", v)).collect();
        println!(
            "   {:<24} [{}] {}",
            name,
            formatted.join(", "),
            value.unit.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

fn print_wiring(pipeline: &FrozenPipeline) {
    println!("\n🔄 Wiring:");
    for edge in pipeline.wiring().edges() {
        match &edge.alias {
            Some(alias) => println!("   {} → {} (as '{}')", edge.producer, edge.consumer, alias),
            None => println!("   {} → {}", edge.producer, edge.consumer),
        }
    }
    let inputs: Vec<&str> = pipeline
        .wiring()
        .exposed_inputs()
        .iter()
        .map(|i| i.name.as_str())
        .collect();
    println!("   exposed inputs: {}", inputs.join(", "));
}

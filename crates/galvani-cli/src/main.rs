//! Galvani command-line interface.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use galvani_core::{AnalyticSimulator, DesignLoop, FirstOrderSizer, KeywordSelector};
use galvani_schema::library;
use galvani_state::{ConstraintMap, DesignState, DesignStatus, DesignStore, StateUpdate, Value};

#[derive(Parser)]
#[command(name = "galvani")]
#[command(about = "First-order analog circuit design automation", long_about = None)]
#[command(version)]
struct Cli {
    /// Free-text design specification
    #[arg(
        value_name = "SPEC",
        default_value = "Design a lowpass filter with 1kHz cutoff"
    )]
    specification: String,

    /// JSON file with design constraints (name -> number or string)
    #[arg(short, long, value_name = "FILE")]
    constraints: Option<PathBuf>,

    /// Maximum design-loop rounds
    #[arg(long, default_value_t = 3)]
    max_iterations: usize,

    /// Dump the final state as JSON instead of a text summary
    #[arg(long)]
    json: bool,

    /// Verbose stage logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    let constraints = match &cli.constraints {
        Some(path) => load_constraints(path)?,
        None => demo_constraints(),
    };

    let mut store = DesignStore::new();
    store.apply(StateUpdate::Specification(cli.specification.clone()));
    store.apply(StateUpdate::Constraints(constraints));

    let design_loop = DesignLoop::new(
        Box::new(KeywordSelector),
        Box::new(FirstOrderSizer),
        Box::new(AnalyticSimulator),
    )
    .with_max_iterations(cli.max_iterations);

    if !cli.json {
        print_banner();
        println!("Starting autonomous design loop...\n");
    }

    let status = design_loop.run(&mut store);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(store.state())?);
    } else {
        println!("Design loop complete.");
        summarize(store.state());
    }

    Ok(if status == DesignStatus::DesignValidated {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn load_constraints(path: &PathBuf) -> Result<ConstraintMap> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading constraints file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("parsing constraints file {}", path.display()))
}

fn demo_constraints() -> ConstraintMap {
    let mut constraints = ConstraintMap::new();
    constraints.insert("circuit_type".into(), "rc_lowpass".into());
    constraints.insert("target_fc_hz".into(), Value::Num(1000.0));
    constraints
}

fn print_banner() {
    println!("\n{}", "=".repeat(70));
    println!("     GALVANI ANALOG CIRCUIT DESIGN SYSTEM");
    println!("{}\n", "=".repeat(70));
}

fn summarize(state: &DesignState) {
    let line = "-".repeat(70);
    println!("\n{line}");
    println!("FINAL DESIGN SUMMARY");
    println!("{line}");

    println!("\n[1] Specification");
    println!("    {}", state.specification.as_deref().unwrap_or("(none)"));

    println!("\n[2] Topology Selection");
    let topology = state.selected_topology.as_deref().unwrap_or("(none)");
    let display = library::lookup(topology)
        .map(|info| info.display_name)
        .unwrap_or(topology);
    println!("    Selected:   {topology} ({display})");
    if let Some(confidence) = state.topology_confidence {
        println!("    Confidence: {confidence:.2}");
    }

    println!("\n[3] Sizing Parameters");
    match &state.sizing {
        Some(sizing) => {
            for (key, value) in sizing {
                println!("    {key}: {value:.6e}");
            }
        }
        None => println!("    (none)"),
    }

    println!("\n[4] Constraint Evaluation");
    match &state.constraint_report {
        Some(report) => {
            println!("    Passed:       {}", report.passed);
            println!("    Completeness: {:.2}", report.completeness_score);
            if !report.issues.is_empty() {
                println!("    Issues:");
                for issue in &report.issues {
                    println!("       - {issue}");
                }
            }
            if !report.warnings.is_empty() {
                println!("    Warnings:");
                for warning in &report.warnings {
                    println!("       - {warning}");
                }
            }
        }
        None => println!("    (not run)"),
    }

    println!("\n[5] Simulation Metrics");
    match &state.simulation_metrics {
        Some(metrics) => {
            for (key, value) in metrics {
                println!("    {key}: {value:.6e}");
            }
        }
        None => println!("    (not run)"),
    }

    println!("\n[6] Refinement Analysis");
    match &state.refinement_report {
        Some(report) => {
            println!("    Changed: {}", report.changed);
            for (key, change) in &report.changes {
                println!(
                    "    {key}: {:.6e} -> {:.6e} (factor {:.3})",
                    change.old, change.new, change.factor
                );
            }
            for note in &report.notes {
                println!("       - {note}");
            }
        }
        None => println!("    (not run)"),
    }

    println!("\n[7] Execution History");
    println!("    Total events: {}", state.history.len());
    println!("    Last 5 events:");
    for entry in state.history.iter().rev().take(5).rev() {
        println!("       - {} {}", entry.event, entry.data);
    }

    println!("\n[8] Final Status");
    println!("    {}", state.status);
    println!("\n{line}\n");
}

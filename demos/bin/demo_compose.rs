//! Circuit Composition Demo
//!
//! Builds each scenario from two halves, composes them, executes the result
//! and checks the counts and snapshots against what the halves imply.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tessera_demos::scenarios::{self, Composition};
use tessera_demos::{print_failure, print_header, print_result, print_section, print_success};
use tessera_sim::{Executor, SimulatorConfig};

#[derive(Parser, Debug)]
#[command(name = "demo-compose")]
#[command(about = "Compose circuits and check the executed distribution")]
struct Args {
    /// Shots per execution
    #[arg(short, long, default_value = "1024")]
    shots: u32,

    /// Execution seed
    #[arg(long, default_value = "78")]
    seed: u64,

    /// Allowed deviation from the expected count of any bitstring
    #[arg(short, long, default_value = "41")]
    threshold: u64,

    /// Composition modes to run (default: both)
    #[arg(short, long, value_enum)]
    mode: Vec<Composition>,

    /// Simulator configuration file (YAML)
    #[arg(short, long, env = "TESSERA_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = SimulatorConfig::load(args.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    print_header("Circuit Composition Demo");
    print_result("Shots", args.shots);
    print_result("Seed", args.seed);
    print_result("Parallel shots", config.parallel_shots);

    let modes = if args.mode.is_empty() {
        vec![Composition::Combine, Composition::Extend]
    } else {
        args.mode.clone()
    };
    let executor = Executor::new(config);

    let mut failures = 0;
    for scenario in scenarios::all()? {
        print_section(scenario.name);
        for &mode in &modes {
            let report = scenarios::run(&scenario, mode, &executor, args.shots, args.seed)?;

            let counts: Vec<String> = report
                .counts
                .iter()
                .map(|(bits, n)| format!("{bits}: {n}"))
                .collect();
            print_result(&format!("{mode} counts"), counts.join(", "));
            if let Some(fidelity) = report.fidelity {
                print_result(&format!("{mode} snapshot fidelity"), format!("{fidelity:.6}"));
            }

            if report.passed(args.threshold) {
                print_success(&format!("{mode}: within ±{}", args.threshold));
            } else {
                failures += 1;
                print_failure(&format!(
                    "{mode}: deviation {} exceeds ±{}",
                    report.max_deviation, args.threshold
                ));
            }
        }
    }

    println!();
    if failures > 0 {
        anyhow::bail!("{failures} scenario run(s) outside tolerance");
    }
    print_success("All scenarios match");
    Ok(())
}

//! clcheck - randomized consistency checker for cachedlist

mod scenarios;
mod workload;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed for the random workload (picked at random if omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of random operations
    #[arg(short, long, default_value_t = 2000)]
    ops: usize,

    /// Scenario to run
    #[arg(long, value_enum, default_value_t = Scenario::All)]
    scenario: Scenario,

    /// Log every operation
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Scenario {
    All,
    Basic,
    Find,
    Random,
    Sort,
    JoinSplit,
    Iterate,
}

impl Scenario {
    fn expand(self) -> Vec<Scenario> {
        match self {
            Scenario::All => vec![
                Scenario::Basic,
                Scenario::Find,
                Scenario::Random,
                Scenario::Sort,
                Scenario::JoinSplit,
                Scenario::Iterate,
            ],
            one => vec![one],
        }
    }
}

fn run(scenario: Scenario, seed: u64, ops: usize) -> Result<()> {
    match scenario {
        Scenario::All => Ok(()),
        Scenario::Basic => scenarios::basic(),
        Scenario::Find => scenarios::find(),
        Scenario::Random => workload::run(seed, ops),
        Scenario::Sort => scenarios::sort(seed),
        Scenario::JoinSplit => scenarios::join_split(),
        Scenario::Iterate => scenarios::iterate(),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let seed = args.seed.unwrap_or_else(rand::random::<u64>);

    info!("Starting clcheck v{}", env!("CARGO_PKG_VERSION"));
    info!("Seed: {}", seed);
    info!("Random operations: {}", args.ops);

    let mut failed = Vec::new();
    for scenario in args.scenario.expand() {
        match run(scenario, seed, args.ops) {
            Ok(()) => info!(?scenario, "passed"),
            Err(e) => {
                error!(?scenario, seed, "failed: {:#}", e);
                failed.push(scenario);
            }
        }
    }

    if !failed.is_empty() {
        bail!("{} scenario(s) failed with seed {}: {:?}", failed.len(), seed, failed);
    }
    info!("All scenarios passed");
    Ok(())
}

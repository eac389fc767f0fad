use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use salvo::{
    init_logging, run_comparison, run_single, AlgorithmRegistry, CancelToken, CompareRequest,
    PlacementStrategy, RunError, RunRequest, SimConfig, SolutionGrid, BOARD_SIZE,
};
use serde::{Deserialize, Serialize};
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every registered algorithm.
    List {
        #[arg(long, help = "Directory of declarative algorithm definitions (*.json)")]
        algorithms_dir: Option<PathBuf>,
    },
    /// Evaluate one algorithm over many simulated games.
    Run {
        #[arg(long)]
        algorithm: String,
        #[command(flatten)]
        opts: RunOpts,
    },
    /// Evaluate several algorithms on the same boards and compare them.
    Compare {
        #[arg(long, num_args = 2.., required = true)]
        algorithms: Vec<String>,
        #[command(flatten)]
        opts: RunOpts,
    },
}

#[derive(Args)]
struct RunOpts {
    #[arg(long, default_value_t = 1000)]
    simulations: usize,
    #[arg(long, help = "Fix RNG seed for reproducible runs (e.g., --seed 12345)")]
    seed: Option<u64>,
    #[arg(long, default_value_t = BOARD_SIZE)]
    board_size: usize,
    #[arg(long, default_value_t = PlacementStrategy::RandomEachRound)]
    placement: PlacementStrategy,
    #[arg(long = "grid", help = "JSON file holding one solution grid or a list of them")]
    grids: Vec<PathBuf>,
    #[arg(long, help = "Worker threads (default: one per core)")]
    threads: Option<usize>,
    #[arg(long, help = "Cancel the run after this many milliseconds")]
    timeout_ms: Option<u64>,
    #[arg(long, help = "Directory of declarative algorithm definitions (*.json)")]
    algorithms_dir: Option<PathBuf>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GridFile {
    Many(Vec<SolutionGrid>),
    One(SolutionGrid),
}

impl RunOpts {
    fn config(&self) -> SimConfig {
        let mut config = SimConfig::default()
            .with_simulations(self.simulations)
            .with_board_size(self.board_size);
        config.seed = self.seed;
        config.threads = self.threads;
        config
    }

    fn grids(&self) -> anyhow::Result<Vec<SolutionGrid>> {
        let mut grids = Vec::new();
        for path in &self.grids {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            match serde_json::from_str(&text)
                .with_context(|| format!("{} is not a solution grid", path.display()))?
            {
                GridFile::Many(many) => grids.extend(many),
                GridFile::One(one) => grids.push(one),
            }
        }
        Ok(grids)
    }
}

fn registry(dir: Option<&Path>) -> anyhow::Result<AlgorithmRegistry> {
    let mut registry = AlgorithmRegistry::with_builtins();
    if let Some(dir) = dir {
        let loaded = registry.load_dir(dir)?;
        info!("loaded {} algorithm(s) from {}", loaded.len(), dir.display());
    }
    Ok(registry)
}

/// Run `job` off the async runtime. When `timeout_ms` elapses first the
/// token is cancelled and the job is awaited until it notices.
async fn execute<T, F>(timeout_ms: Option<u64>, job: F) -> anyhow::Result<T>
where
    T: Send + 'static,
    F: FnOnce(&CancelToken) -> Result<T, RunError> + Send + 'static,
{
    let cancel = CancelToken::new();
    let worker_token = cancel.clone();
    let mut handle = tokio::task::spawn_blocking(move || job(&worker_token));
    let joined = match timeout_ms {
        Some(ms) => match tokio::time::timeout(Duration::from_millis(ms), &mut handle).await {
            Ok(joined) => joined,
            Err(_) => {
                warn!("timed out after {} ms, cancelling", ms);
                cancel.cancel();
                handle.await
            }
        },
        None => handle.await,
    };
    Ok(joined??)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::List { algorithms_dir } => {
            let registry = registry(algorithms_dir.as_deref())?;
            print_json(&registry.list())?;
        }
        Commands::Run { algorithm, opts } => {
            let registry = registry(opts.algorithms_dir.as_deref())?;
            let request = RunRequest {
                algorithm,
                ship_placement_strategy: opts.placement,
                placement_grids: opts.grids()?,
                config: opts.config(),
            };
            let result =
                execute(opts.timeout_ms, move |cancel| run_single(&registry, &request, cancel)).await?;
            print_json(&result)?;
        }
        Commands::Compare { algorithms, opts } => {
            let registry = registry(opts.algorithms_dir.as_deref())?;
            let request = CompareRequest {
                algorithms,
                ship_placement_strategy: opts.placement,
                placement_grids: opts.grids()?,
                config: opts.config(),
            };
            let result = execute(opts.timeout_ms, move |cancel| {
                run_comparison(&registry, &request, cancel)
            })
            .await?;
            print_json(&result)?;
        }
    }
    Ok(())
}

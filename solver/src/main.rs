use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use tdmaze::{Adjacency, CellType, Grid, NodeGraph, OptimizerConfig, Strategy};

/// Find the blocker placements that make enemies walk furthest.
#[derive(Parser, Debug)]
#[command(name = "solver")]
#[command(about = "Blocker placement optimizer for tower defense grids")]
struct Args {
    /// Grid snapshot file; read from stdin if omitted
    grid: Option<PathBuf>,

    /// Search strategy: exhaustive, cutoff or qlearn
    #[arg(short, long)]
    strategy: Option<Strategy>,

    /// Neighbor mode, 4 or 8
    #[arg(short, long)]
    adjacency: Option<Adjacency>,

    /// Most blockers to place
    #[arg(short, long)]
    limit: Option<usize>,

    /// Seed for the Q-learning exploration
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file with an optimizer configuration; flags take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print placements as JSON instead of grids
    #[arg(long)]
    json: bool,
}

impl Args {
    fn optimizer_config(&self) -> Result<OptimizerConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => OptimizerConfig::default(),
        };

        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(adjacency) = self.adjacency {
            config.adjacency = adjacency;
        }
        if self.limit.is_some() {
            config.blocker_limit = self.limit;
        }
        if self.seed.is_some() {
            config.qlearn.seed = self.seed;
        }

        Ok(config)
    }

    fn read_grid(&self) -> Result<Grid> {
        let raw = match &self.grid {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("reading grid {}", path.display()))?,
            None => {
                let mut raw = String::new();
                io::stdin().read_to_string(&mut raw).context("reading grid from stdin")?;
                raw
            }
        };

        Ok(raw.parse()?)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = args.optimizer_config()?;
    let grid = args.read_grid()?;
    info!("optimizing with {:?}", config);

    let placements = grid.optimize(&config).context("invalid map")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&placements)?);
        return Ok(());
    }

    if placements.is_empty() {
        println!("no maze found");
        return Ok(());
    }

    for (i, placement) in placements.iter().enumerate() {
        let blocked = grid.with_blockers(placement);
        let graph = NodeGraph::build(&blocked, config.adjacency);
        let distances = graph.multi_source_distances(graph.spawn_nodes(), CellType::Exit)
            .map(|distances| distances.to_string())
            .unwrap_or_else(|| "unreachable".to_owned());

        println!("solution {} ({} blockers, distances {}):", i + 1, placement.len(), distances);
        print!("{}", blocked);
        println!();
    }

    Ok(())
}

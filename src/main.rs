//! Shipwright - Entry Point
//!
//! Loads the prefab and block catalogs, replays one or more construct plans
//! (in parallel when there are several) and writes each finished construct
//! as JSON.

use std::path::PathBuf;

use clap::Parser;
use shipwright::catalog::{BlockCatalog, PrefabLibrary};
use shipwright::construct::{check_output_names, run_batch, ConstructPlan, PlanOutcome};
use shipwright::core::error::Result;

/// Shipwright - build ship constructs from scripted plans
#[derive(Parser, Debug)]
#[command(name = "shipwright")]
#[command(about = "Replay construct plans against a prefab library and block catalog")]
struct Args {
    /// Prefab library: a TOML file or a directory of them
    #[arg(long, default_value = "data/shipyard/prefabs.toml")]
    prefabs: PathBuf,

    /// Block catalog: a TOML file or a directory of them
    #[arg(long, default_value = "data/shipyard/blocks.toml")]
    blocks: PathBuf,

    /// Plan files to build
    #[arg(long, required = true)]
    plan: Vec<PathBuf>,

    /// Override every plan's seed
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for <plan name>.json outputs (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print the construction log of each plan
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("shipwright=info")),
        )
        .init();

    let args = Args::parse();

    let mut library = PrefabLibrary::new();
    let prefab_count = if args.prefabs.is_dir() {
        library.load_directory(&args.prefabs)?
    } else {
        library.load_file(&args.prefabs)?
    };

    let mut catalog = BlockCatalog::new();
    let block_count = if args.blocks.is_dir() {
        catalog.load_directory(&args.blocks)?
    } else {
        catalog.load_file(&args.blocks)?
    };

    tracing::info!(
        "Loaded {} reference blocks and {} block types",
        prefab_count,
        block_count
    );

    let mut plans = args
        .plan
        .iter()
        .map(|path| ConstructPlan::load_file(path))
        .collect::<Result<Vec<_>>>()?;
    if let Some(seed) = args.seed {
        for plan in &mut plans {
            plan.seed = seed;
        }
    }

    if let Some(dir) = &args.output {
        check_output_names(&plans)?;
        std::fs::create_dir_all(dir)?;
    }

    for result in run_batch(&plans, &library, &catalog) {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Plan failed: {}", e);
                continue;
            }
        };

        print_summary(&outcome, args.verbose);

        let json = outcome.output.to_json_pretty()?;
        match &args.output {
            Some(dir) => {
                let path = dir.join(format!("{}.json", outcome.name));
                std::fs::write(&path, json)?;
                tracing::info!("Wrote {}", path.display());
            }
            None => println!("{}", json),
        }
    }

    Ok(())
}

fn print_summary(outcome: &PlanOutcome, verbose: bool) {
    eprintln!("=== {} ===", outcome.name);
    eprintln!(
        "Extents: x {} / y {} / z {} (tolerance {})",
        outcome.extents.width_x,
        outcome.extents.height_y,
        outcome.extents.length_z,
        outcome.extents.tolerance
    );
    eprintln!(
        "Blocks placed: {} | steps failed: {} of {}",
        outcome.output.len(),
        outcome.failed_steps(),
        outcome.steps.len()
    );
    if verbose {
        eprint!("{}", outcome.log);
    }
}

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use graph_fixture::prelude::*;
use log::info;

mod common;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    common::init_logging(&args.verbose);

    let Args {
        algorithm,
        n,
        k,
        out_dir,
        density,
        seed,
        verbose: _,
    } = args;

    let mut request = FixtureRequest::new(algorithm, n).density(density);
    if let Some(k) = k {
        request = request.pattern_size(k);
    }
    if let Some(seed) = seed {
        request = request.seed(seed);
    }

    let start = Instant::now();
    let fixture = request.generate()?;
    let files = fixture.write_to(&out_dir)?;
    info!(
        "Finished {algorithm} fixture with seed {} in {:?}",
        fixture.seed(),
        start.elapsed()
    );

    let files = files
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>();
    println!("{}", files.join(","));

    Ok(())
}

#[derive(Debug, Parser)]
#[command(
    version,
    about = "Generate a random graph fixture for a solver benchmark"
)]
struct Args {
    /// Fixture family to generate
    #[arg(long, value_enum)]
    algorithm: Family,

    /// Number of target nodes
    #[arg(long)]
    n: usize,

    /// Pattern size, required for subgraph families
    #[arg(long)]
    k: Option<usize>,

    /// Directory receiving the graph files and metadata.json
    #[arg(long)]
    out_dir: PathBuf,

    /// Fraction of the possible edges, in (0, 1]
    #[arg(long, default_value_t = DEFAULT_DENSITY)]
    density: f64,

    /// Seed of the random generator, derived from the clock if absent
    #[arg(long)]
    seed: Option<u64>,

    #[command(flatten)]
    verbose: common::Verbose,
}

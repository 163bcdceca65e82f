use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use graph_fixture::fixture::wall_clock_seed;
use graph_fixture::prelude::*;
use log::{info, warn};
use num_format::{Locale, ToFormattedString};

mod common;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    common::init_logging(&args.verbose);

    let seed = args.seed.unwrap_or_else(wall_clock_seed);
    let abort_after = args.abort_after.map(Duration::from_millis);
    let job = args.job(seed);

    info!("Generating {} with seed {seed}", job.output().display());

    let generator = Generator::new();
    let mut handle = generator.spawn(job)?;
    let start = Instant::now();

    let outcome = 'poll: loop {
        thread::sleep(POLL_INTERVAL);

        if let Some(abort_after) = abort_after {
            if start.elapsed() >= abort_after && !handle.token().is_cancelled() {
                info!("Requesting abort after {:?}", start.elapsed());
                handle.cancel();
            }
        }

        for message in handle.poll() {
            match message {
                Message::Progress { stage, done, total } => info!(
                    "{stage:?}: {} / {}",
                    done.to_formatted_string(&Locale::en),
                    total.to_formatted_string(&Locale::en)
                ),
                Message::Finished(outcome) => break 'poll outcome,
            }
        }
    };

    handle.join()?;

    let path = report(outcome, start.elapsed())?;
    println!("{}", path.display());

    Ok(())
}

/// Turns the terminal outcome into the exported path. An aborted run is an
/// error, so the process exits with a non-zero status.
fn report(outcome: Outcome, elapsed: Duration) -> Result<PathBuf, Error> {
    match outcome {
        Outcome::Completed(summary) => {
            info!(
                "Exported {} nodes and {} edges in {elapsed:?}, next free index is {}",
                summary.node_count.to_formatted_string(&Locale::en),
                summary.edge_count.to_formatted_string(&Locale::en),
                summary.next_index
            );
            Ok(summary.path)
        }
        Outcome::Aborted(reason) => {
            warn!("{reason}");
            Err(Error::Aborted { reason })
        }
        Outcome::Failed(error) => Err(error),
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Model {
    Random,
    Grid,
    Ring,
    Path,
    Star,
}

#[derive(Debug, Parser)]
#[command(
    version,
    about = "Generate a large graph model in the background and export it"
)]
struct Args {
    /// Structural model of the graph
    #[arg(short, long, value_enum, default_value = "random")]
    topology: Model,

    /// Number of nodes, ignored for grids
    #[arg(short, long, default_value_t = 1000)]
    nodes: usize,

    /// Edge probability of the random model
    #[arg(short = 'p', long, default_value_t = 0.01)]
    density: f64,

    /// Neighbors per node of the ring model
    #[arg(short, long, default_value_t = 4)]
    k_neighbors: usize,

    #[arg(long, default_value_t = 10)]
    rows: usize,

    #[arg(long, default_value_t = 10)]
    cols: usize,

    #[arg(long)]
    directed: bool,

    #[arg(long)]
    weighted: bool,

    #[arg(long, default_value_t = 1)]
    weight_min: u32,

    #[arg(long, default_value_t = 20)]
    weight_max: u32,

    /// Node labels are <prefix><index>
    #[arg(long, default_value = "")]
    prefix: String,

    #[arg(long, default_value_t = 0)]
    start_index: usize,

    #[arg(short, long, value_enum, default_value = "csv")]
    format: ExportFormat,

    /// Output file
    #[arg(short, long)]
    output: PathBuf,

    /// Start label written to the edge-list comment line
    #[arg(long)]
    start: Option<String>,

    /// Target label written to the edge-list comment line
    #[arg(long)]
    target: Option<String>,

    #[arg(long)]
    seed: Option<u64>,

    /// Request cancellation after this many milliseconds
    #[arg(long, value_name = "MS")]
    abort_after: Option<u64>,

    #[command(flatten)]
    verbose: common::Verbose,
}

impl Args {
    fn job(&self, seed: u64) -> MassJob {
        let topology = match self.topology {
            Model::Random => Topology::Random {
                probability: self.density,
            },
            Model::Grid => Topology::Grid {
                rows: self.rows,
                cols: self.cols,
            },
            Model::Ring => Topology::Ring {
                neighbors: self.k_neighbors,
            },
            Model::Path => Topology::Path,
            Model::Star => Topology::Star,
        };

        MassJob::new(topology, self.nodes, self.output.clone())
            .directed(self.directed)
            .weighted(self.weighted)
            .weights(WeightRange::new(self.weight_min, self.weight_max))
            .labels(self.prefix.clone(), self.start_index)
            .format(self.format)
            .endpoints(self.start.clone(), self.target.clone())
            .seed(seed)
    }
}

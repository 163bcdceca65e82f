//! Background generation with progress reporting and cooperative
//! cancellation.
//!
//! A [`Generator`] runs at most one [`MassJob`] at a time on a dedicated
//! worker thread. The worker owns the graph for the whole run and talks to
//! the caller only through a bounded channel of [`Message`]s: throttled node
//! and edge checkpoints, followed by exactly one terminal [`Outcome`].
//!
//! ```no_run
//! use std::time::Duration;
//! use graph_fixture::prelude::*;
//!
//! let job = MassJob::new(Topology::Ring { neighbors: 6 }, 1000, "ring.csv").seed(42);
//! let handle = Generator::new().spawn(job)?;
//!
//! let outcome = handle.wait(Duration::from_millis(100), |stage, done, total| {
//!     println!("{stage:?}: {done}/{total}");
//! });
//! assert!(matches!(outcome, Outcome::Completed(_)));
//! # Ok::<(), graph_fixture::Error>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use log::{info, trace};
use num_format::{Locale, ToFormattedString};
use rand::prelude::*;

use crate::connectivity::ensure_connected;
use crate::graph::Graph;
use crate::output::ExportFormat;
use crate::progress::{CancellationToken, Progress, Stage};
use crate::topology::{Topology, WeightRange};
use crate::Error;

const CHANNEL_CAPACITY: usize = 1024;

/// A generate-and-export job of the interactive variant.
#[derive(Debug, Clone, PartialEq)]
pub struct MassJob {
    topology: Topology,
    node_count: usize,
    directed: bool,
    weighted: bool,
    weights: WeightRange,
    prefix: String,
    start_index: usize,
    format: ExportFormat,
    output: PathBuf,
    start_label: Option<String>,
    target_label: Option<String>,
    seed: u64,
}

impl MassJob {
    /// Creates an undirected, unweighted job writing a CSV edge list.
    ///
    /// `node_count` is ignored by grids, which always have `rows * cols`
    /// nodes.
    pub fn new(topology: Topology, node_count: usize, output: impl Into<PathBuf>) -> Self {
        Self {
            topology,
            node_count,
            directed: false,
            weighted: false,
            weights: WeightRange::default(),
            prefix: String::new(),
            start_index: 0,
            format: ExportFormat::default(),
            output: output.into(),
            start_label: None,
            target_label: None,
            seed: 0,
        }
    }

    #[must_use]
    pub fn directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    #[must_use]
    pub fn weighted(mut self, weighted: bool) -> Self {
        self.weighted = weighted;
        self
    }

    #[must_use]
    pub fn weights(mut self, weights: WeightRange) -> Self {
        self.weights = weights;
        self
    }

    /// Labels nodes `<prefix><index>`, counting from `start_index`.
    #[must_use]
    pub fn labels(mut self, prefix: impl Into<String>, start_index: usize) -> Self {
        self.prefix = prefix.into();
        self.start_index = start_index;
        self
    }

    #[must_use]
    pub fn format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the labels written to the comment line of the edge-list format.
    #[must_use]
    pub fn endpoints(mut self, start: Option<String>, target: Option<String>) -> Self {
        self.start_label = start;
        self.target_label = target;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Builds the graph of this job.
    ///
    /// Returns the graph and the next free label index.
    pub fn generate(&self, progress: &mut Progress<'_>) -> Result<(Graph, usize), Error> {
        self.topology.validate(self.node_count)?;

        let node_count = self.topology.node_count(self.node_count);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let start = Instant::now();

        let mut graph = Graph::new(self.directed, self.weighted);
        for i in 0..node_count {
            graph.add_node(format!("{}{}", self.prefix, self.start_index + i));
            progress.node_created(i + 1)?;
        }

        self.topology
            .fill(&mut graph, self.weights, &mut rng, progress)?;

        if !self.topology.is_connected_by_construction() {
            ensure_connected(&mut graph, self.weights, &mut rng, progress)?;
        }

        progress.finish_edges(graph.edge_count());

        info!(
            "Generated {:?} model with {} nodes and {} edges in {:?}",
            self.topology,
            graph.node_count().to_formatted_string(&Locale::en),
            graph.edge_count().to_formatted_string(&Locale::en),
            start.elapsed()
        );

        Ok((graph, self.start_index + node_count))
    }

    fn export(&self, graph: &Graph) -> Result<(), Error> {
        if let Some(parent) = self.output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let start = Instant::now();
        self.format.write_file(
            graph,
            &self.output,
            self.start_label.as_deref(),
            self.target_label.as_deref(),
        )?;
        info!(
            "Exported to {} in {:?}",
            self.output.display(),
            start.elapsed()
        );

        Ok(())
    }

    fn execute(
        &self,
        token: &CancellationToken,
        progress: &mut Progress<'_>,
    ) -> Result<Summary, Error> {
        let (graph, next_index) = self.generate(progress)?;

        if token.is_cancelled() {
            return Err(Error::Aborted {
                reason: "Aborted before export.",
            });
        }

        self.export(&graph)?;

        // Files written up to this point are kept.
        if token.is_cancelled() {
            return Err(Error::Aborted {
                reason: "Aborted during export.",
            });
        }

        Ok(Summary {
            path: self.output.clone(),
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            next_index,
        })
    }

    fn run(&self, token: &CancellationToken, sender: &Sender<Message>) -> Outcome {
        let node_count = self.topology.node_count(self.node_count);
        let edge_goal = self.topology.estimated_edges(node_count, self.directed);

        let mut progress = Progress::new(node_count, edge_goal)
            .with_token(token.clone())
            .with_sink(|stage, done, total| {
                trace!("{stage:?} checkpoint {done}/{total}");
                let _ = sender.send(Message::Progress { stage, done, total });
            });

        match self.execute(token, &mut progress) {
            Ok(summary) => Outcome::Completed(summary),
            Err(Error::Aborted { reason }) => Outcome::Aborted(reason),
            Err(error) => Outcome::Failed(error),
        }
    }
}

/// The result of a finished job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub path: PathBuf,
    pub node_count: usize,
    pub edge_count: usize,
    /// The first label index not used by this job.
    pub next_index: usize,
}

#[derive(Debug)]
pub enum Outcome {
    Completed(Summary),
    Failed(Error),
    /// Cancellation was requested. Carries the user facing reason.
    Aborted(&'static str),
}

#[derive(Debug)]
pub enum Message {
    Progress {
        stage: Stage,
        done: usize,
        total: usize,
    },
    Finished(Outcome),
}

/// Runs at most one [`MassJob`] at a time.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    active: Arc<AtomicBool>,
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Starts `job` on a worker thread.
    ///
    /// Fails with [`Error::Busy`] while another job of this generator is
    /// running. The generator is free again before the terminal message is
    /// delivered.
    pub fn spawn(&self, job: MassJob) -> Result<GenerationHandle, Error> {
        if self
            .active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(Error::Busy);
        }
        let guard = ActiveGuard(Arc::clone(&self.active));

        let (sender, receiver) = bounded(CHANNEL_CAPACITY);
        let token = CancellationToken::new();
        let worker_token = token.clone();

        let worker = thread::Builder::new()
            .name("mass-export".to_string())
            .spawn(move || {
                let outcome = job.run(&worker_token, &sender);
                drop(guard);
                let _ = sender.send(Message::Finished(outcome));
            })?;

        Ok(GenerationHandle {
            receiver,
            token,
            worker: Some(worker),
        })
    }
}

struct ActiveGuard(Arc<AtomicBool>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// The caller side of a running job.
pub struct GenerationHandle {
    receiver: Receiver<Message>,
    token: CancellationToken,
    worker: Option<JoinHandle<()>>,
}

impl GenerationHandle {
    /// Requests cooperative cancellation. The job stops at its next
    /// checkpoint and finishes with [`Outcome::Aborted`].
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Returns all messages that are currently queued, without blocking.
    pub fn poll(&self) -> impl Iterator<Item = Message> + '_ {
        self.receiver.try_iter()
    }

    /// Blocks until the job finishes, passing checkpoints to `on_progress`.
    ///
    /// The channel is polled every `interval`.
    pub fn wait(
        mut self,
        interval: Duration,
        mut on_progress: impl FnMut(Stage, usize, usize),
    ) -> Outcome {
        loop {
            match self.receiver.recv_timeout(interval) {
                Ok(Message::Progress { stage, done, total }) => on_progress(stage, done, total),
                Ok(Message::Finished(outcome)) => {
                    return match self.join() {
                        Ok(()) => outcome,
                        Err(error) => Outcome::Failed(error),
                    };
                }
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    return Outcome::Failed(self.join().err().unwrap_or(Error::WorkerPanicked));
                }
            }
        }
    }

    /// Waits for the worker thread to exit.
    pub fn join(&mut self) -> Result<(), Error> {
        match self.worker.take() {
            Some(worker) => worker.join().map_err(|_| Error::WorkerPanicked),
            None => Ok(()),
        }
    }
}

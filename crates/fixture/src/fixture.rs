use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use log::info;
use rand::prelude::*;

use crate::connectivity::ensure_connected;
use crate::graph::Graph;
use crate::metadata::{Metadata, METADATA_FILE};
use crate::output::{EdgeBlock, GraphOutput, Lad, WeightedEdgeList};
use crate::pattern::embed_pattern;
use crate::progress::Progress;
use crate::topology::{self, check_density, Topology, WeightRange};
use crate::Error;

/// Density used when a request does not set one.
pub const DEFAULT_DENSITY: f64 = 0.05;

/// Number of distinct vertex labels assigned by the labelled families.
const VERTEX_LABELS: usize = 4;

/// The kind of fixture to generate, named after the solver input it feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Family {
    /// A weighted, directed edge list with a designated start and target.
    #[cfg_attr(feature = "clap", value(alias = "dijkstra"))]
    ShortestPath,
    /// Pattern and target as plain adjacency lists.
    #[cfg_attr(feature = "clap", value(alias = "glasgow"))]
    LabelledAdjacency,
    /// Pattern and target in the labelled edge-block format.
    #[cfg_attr(feature = "clap", value(alias = "vf3"))]
    LabelledEdgeBlock,
    /// Both subgraph formats, with vertex labels in the adjacency lists.
    #[cfg_attr(feature = "clap", value(alias = "subgraph"))]
    Combined,
}

impl Family {
    pub fn name(&self) -> &'static str {
        match self {
            Family::ShortestPath => "shortest-path",
            Family::LabelledAdjacency => "labelled-adjacency",
            Family::LabelledEdgeBlock => "labelled-edge-block",
            Family::Combined => "combined",
        }
    }

    /// Returns `true` if the family embeds a pattern and requires a pattern
    /// size.
    pub fn needs_pattern(&self) -> bool {
        !matches!(self, Family::ShortestPath)
    }

    fn has_vertex_labels(&self) -> bool {
        matches!(self, Family::LabelledEdgeBlock | Family::Combined)
    }
}

impl Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters of a batch fixture.
///
/// The request is validated as a whole before any generation work starts.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureRequest {
    family: Family,
    node_count: usize,
    pattern_size: Option<usize>,
    density: f64,
    seed: Option<u64>,
}

impl FixtureRequest {
    pub fn new(family: Family, node_count: usize) -> Self {
        Self {
            family,
            node_count,
            pattern_size: None,
            density: DEFAULT_DENSITY,
            seed: None,
        }
    }

    #[must_use]
    pub fn pattern_size(mut self, k: usize) -> Self {
        self.pattern_size = Some(k);
        self
    }

    #[must_use]
    pub fn density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    /// Fixes the seed. Without it, the seed is derived from the wall clock.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        let node_count = self.node_count;
        if node_count < 2 {
            return Err(Error::InvalidNodeCount {
                min: 2,
                actual: node_count,
            });
        }

        if self.family.needs_pattern() {
            match self.pattern_size {
                None => {
                    return Err(Error::MissingPatternSize {
                        family: self.family,
                    })
                }
                Some(k) if k == 0 || k >= node_count => {
                    return Err(Error::InvalidPatternSize { k, node_count })
                }
                Some(_) => {}
            }
        }

        check_density(self.density)
    }

    /// Generates the fixture in memory.
    pub fn generate(&self) -> Result<Fixture, Error> {
        self.validate()?;

        let seed = self.seed.unwrap_or_else(wall_clock_seed);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut progress = Progress::silent();
        let start = Instant::now();

        let (target, pattern) = match (self.family, self.pattern_size) {
            (family, Some(k)) if family.needs_pattern() => {
                let (target, pattern) = self.subgraph(k, &mut rng, &mut progress)?;
                (target, Some(pattern))
            }
            _ => (self.shortest_path(&mut rng, &mut progress)?, None),
        };

        info!(
            "Generated {} fixture with {} nodes and {} edges (seed {seed}) in {:?}",
            self.family,
            target.node_count(),
            target.edge_count(),
            start.elapsed()
        );

        Ok(Fixture {
            family: self.family,
            pattern_size: self.pattern_size.filter(|_| self.family.needs_pattern()),
            density: self.density,
            seed,
            target,
            pattern,
        })
    }

    fn shortest_path(
        &self,
        rng: &mut StdRng,
        progress: &mut Progress<'_>,
    ) -> Result<Graph, Error> {
        let labels = (0..self.node_count).map(|i| format!("v{i}"));
        let mut graph = Graph::with_nodes(true, true, labels);
        topology::fill_shortest_path(&mut graph, self.density, rng, progress)?;
        Ok(graph)
    }

    fn subgraph(
        &self,
        k: usize,
        rng: &mut StdRng,
        progress: &mut Progress<'_>,
    ) -> Result<(Graph, Pattern), Error> {
        let node_count = self.node_count;
        let mut target = Graph::with_nodes(false, false, (0..node_count).map(|i| i.to_string()));

        let topology = Topology::Random {
            probability: self.density,
        };
        topology.fill(&mut target, WeightRange::default(), rng, progress)?;
        ensure_connected(&mut target, WeightRange::default(), rng, progress)?;

        if self.family.has_vertex_labels() {
            let labels = (0..node_count).map(|i| (i % VERTEX_LABELS) as u32).collect();
            target.set_vertex_labels(labels)?;
        }

        let selection = embed_pattern(&mut target, k, rng)?;
        let graph = selection.to_graph(&target)?;

        Ok((
            target,
            Pattern {
                graph,
                nodes: selection.nodes().to_vec(),
            },
        ))
    }
}

/// Derives a seed from the wall clock in milliseconds, masked to 32 bits.
pub fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64 & 0xFFFF_FFFF)
        .unwrap_or_default()
}

#[derive(Debug, Clone)]
struct Pattern {
    graph: Graph,
    nodes: Vec<usize>,
}

/// A generated fixture, ready to be written.
#[derive(Debug, Clone)]
pub struct Fixture {
    family: Family,
    pattern_size: Option<usize>,
    density: f64,
    seed: u64,
    target: Graph,
    pattern: Option<Pattern>,
}

impl Fixture {
    pub fn family(&self) -> Family {
        self.family
    }

    /// Returns the seed the fixture was generated with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn target(&self) -> &Graph {
        &self.target
    }

    pub fn pattern(&self) -> Option<&Graph> {
        self.pattern.as_ref().map(|pattern| &pattern.graph)
    }

    /// Returns the target indices of the pattern nodes, in pattern order.
    pub fn pattern_nodes(&self) -> Option<&[usize]> {
        self.pattern.as_ref().map(|pattern| pattern.nodes.as_slice())
    }

    /// Writes all files of the fixture into `out_dir`, followed by
    /// `metadata.json`, and returns the paths of the graph files.
    ///
    /// The directory is created if it does not exist.
    pub fn write_to<P: AsRef<Path>>(&self, out_dir: P) -> Result<Vec<PathBuf>, Error> {
        let out_dir = out_dir.as_ref();
        fs::create_dir_all(out_dir)?;

        let mut files = Vec::new();

        match &self.pattern {
            None => {
                let target = &self.target;
                let node_count = target.node_count();
                let format = WeightedEdgeList::new()
                    .start(target.label(0))
                    .target(target.label(node_count - 1));

                let path = out_dir.join("dijkstra_generated.csv");
                format.write_file(target, &path)?;
                files.push(path);
            }
            Some(pattern) => {
                if matches!(self.family, Family::LabelledAdjacency | Family::Combined) {
                    let format = if self.family == Family::Combined {
                        Lad::labelled()
                    } else {
                        Lad::plain()
                    };
                    files.extend(self.write_pair(out_dir, "glasgow", "lad", &format, pattern)?);
                }
                if matches!(self.family, Family::LabelledEdgeBlock | Family::Combined) {
                    files.extend(self.write_pair(out_dir, "vf3", "vf", &EdgeBlock, pattern)?);
                }
            }
        }

        self.metadata(&files)
            .write_file(out_dir.join(METADATA_FILE))?;

        info!("Wrote {} files to {}", files.len() + 1, out_dir.display());

        Ok(files)
    }

    fn write_pair<O: GraphOutput>(
        &self,
        out_dir: &Path,
        prefix: &str,
        extension: &str,
        format: &O,
        pattern: &Pattern,
    ) -> Result<[PathBuf; 2], Error> {
        let pattern_path = out_dir.join(format!("{prefix}_pattern.{extension}"));
        let target_path = out_dir.join(format!("{prefix}_target.{extension}"));

        format.write_file(&pattern.graph, &pattern_path)?;
        format.write_file(&self.target, &target_path)?;

        Ok([pattern_path, target_path])
    }

    /// Returns the metadata record for the given written files.
    pub fn metadata(&self, files: &[PathBuf]) -> Metadata {
        Metadata {
            algorithm: self.family.name().to_string(),
            n: self.target.node_count(),
            k: self.pattern_size,
            density: self.density,
            seed: self.seed,
            files: files
                .iter()
                .map(|path| path.to_string_lossy().into_owned())
                .collect(),
            pattern_nodes: self.pattern_nodes().map(<[usize]>::to_vec),
        }
    }
}

//! Edge set generators for the supported topology models.
//!
//! Every generator fills a [`Graph`] whose nodes already exist. Generators
//! never add self-loops or duplicate edges, see [`Graph::add_edge`].

use log::debug;
use rand::prelude::*;

use crate::graph::{Graph, Weight};
use crate::progress::Progress;
use crate::Error;

/// Weights of the shortest-path backbone and its extra edges.
pub const SHORTEST_PATH_WEIGHTS: WeightRange = WeightRange { min: 1, max: 20 };

/// Probabilities at or above `1.0` are clamped to this value to keep the
/// skip distance finite.
const MAX_PROBABILITY: f64 = 1.0 - 1e-12;

/// The inclusive range edge weights are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightRange {
    min: Weight,
    max: Weight,
}

impl WeightRange {
    /// Creates a new range, swapping the bounds if they are reversed.
    pub fn new(min: Weight, max: Weight) -> Self {
        Self {
            min: Weight::min(min, max),
            max: Weight::max(min, max),
        }
    }

    pub fn min(&self) -> Weight {
        self.min
    }

    pub fn max(&self) -> Weight {
        self.max
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Weight {
        rng.gen_range(self.min..=self.max)
    }
}

impl Default for WeightRange {
    fn default() -> Self {
        SHORTEST_PATH_WEIGHTS
    }
}

/// The structural model of a generated graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Topology {
    /// Every candidate pair is included independently with `probability`.
    Random { probability: f64 },
    /// A `rows x cols` lattice with edges to the right and lower neighbor.
    Grid { rows: usize, cols: usize },
    /// Each node connects to its `neighbors` nearest nodes on a cycle.
    Ring { neighbors: usize },
    /// A linear chain.
    Path,
    /// A single hub connected to every other node.
    Star,
}

impl Topology {
    /// Returns the number of nodes the model needs. Only grids override the
    /// requested count.
    pub fn node_count(&self, requested: usize) -> usize {
        match *self {
            Topology::Grid { rows, cols } => rows.saturating_mul(cols),
            _ => requested,
        }
    }

    pub fn validate(&self, requested: usize) -> Result<(), Error> {
        match *self {
            Topology::Random { probability } => check_density(probability)?,
            Topology::Grid { rows, cols } if rows == 0 || cols == 0 => {
                return Err(Error::InvalidGrid { rows, cols });
            }
            _ => {}
        }

        let node_count = self.node_count(requested);
        if node_count < 2 {
            return Err(Error::InvalidNodeCount {
                min: 2,
                actual: node_count,
            });
        }

        Ok(())
    }

    /// Returns `true` if every graph produced by this model is a single
    /// component, so connectivity repair can be skipped.
    pub fn is_connected_by_construction(&self) -> bool {
        match *self {
            Topology::Random { .. } => false,
            Topology::Ring { neighbors } => neighbors >= 1,
            Topology::Grid { .. } | Topology::Path | Topology::Star => true,
        }
    }

    /// Returns the expected number of edges after generation and repair,
    /// used as the initial edge progress goal.
    ///
    /// The count is exact for the deterministic models. A random graph
    /// needs at least a spanning tree once repaired, so its estimate is
    /// never below `N - 1`.
    pub fn estimated_edges(&self, node_count: usize, directed: bool) -> usize {
        let both_ways = if directed { 2 } else { 1 };
        let max = usize::try_from(max_pairs(node_count, directed)).unwrap_or(usize::MAX);
        let spanning = node_count.saturating_sub(1);

        let estimate = match *self {
            Topology::Random { probability } => {
                let sampled = (max as f64 * probability.clamp(0.0, 1.0)).round() as usize;
                usize::max(sampled, spanning)
            }
            Topology::Grid { rows, cols } => {
                rows * cols.saturating_sub(1) + cols * rows.saturating_sub(1)
            }
            Topology::Ring { neighbors: 0 } => spanning,
            Topology::Ring { neighbors } => {
                usize::min(node_count * ring_offsets(neighbors) * both_ways, max)
            }
            Topology::Path => spanning,
            Topology::Star => spanning * both_ways,
        };
        estimate.min(max)
    }

    /// Fills `graph` with the edges of this model and returns the number of
    /// inserted edges.
    ///
    /// All nodes must already exist. Weights are drawn from `weights` and
    /// dropped if the graph is unweighted.
    pub fn fill<R: Rng>(
        &self,
        graph: &mut Graph,
        weights: WeightRange,
        rng: &mut R,
        progress: &mut Progress<'_>,
    ) -> Result<usize, Error> {
        let node_count = graph.node_count();
        let directed = graph.is_directed();
        let mut inserted = 0;

        match *self {
            Topology::Random { probability } => {
                let mut order = (0..node_count).collect::<Vec<_>>();
                order.shuffle(rng);

                let mut sampler = SkipSampler::new(node_count, probability, directed);
                while let Some((i, j)) = sampler.sample(rng) {
                    progress.check()?;
                    let w = weights.sample(rng);
                    inserted += insert(graph, order[i], order[j], w, progress)?;
                }
            }
            Topology::Grid { rows, cols } => {
                for r in 0..rows {
                    progress.check()?;
                    for c in 0..cols {
                        progress.check()?;
                        let idx = r * cols + c;
                        if idx >= node_count {
                            continue;
                        }
                        if c + 1 < cols && idx + 1 < node_count {
                            let w = weights.sample(rng);
                            inserted += insert(graph, idx, idx + 1, w, progress)?;
                        }
                        if r + 1 < rows && idx + cols < node_count {
                            let w = weights.sample(rng);
                            inserted += insert(graph, idx, idx + cols, w, progress)?;
                        }
                    }
                }
            }
            Topology::Ring { neighbors } => {
                let offsets = ring_offsets(neighbors);
                for i in 0..node_count {
                    progress.check()?;
                    for d in 1..=offsets {
                        progress.check()?;
                        let j = (i + d) % node_count;
                        let w = weights.sample(rng);
                        inserted += insert(graph, i, j, w, progress)?;
                        if directed {
                            inserted += insert(graph, j, i, w, progress)?;
                        }
                    }
                }
            }
            Topology::Path => {
                for i in 1..node_count {
                    progress.check()?;
                    let w = weights.sample(rng);
                    inserted += insert(graph, i - 1, i, w, progress)?;
                }
            }
            Topology::Star => {
                for i in 1..node_count {
                    progress.check()?;
                    let w = weights.sample(rng);
                    inserted += insert(graph, 0, i, w, progress)?;
                    if directed {
                        inserted += insert(graph, i, 0, w, progress)?;
                    }
                }
            }
        }

        debug!("{self:?} inserted {inserted} edges over {node_count} nodes");

        Ok(inserted)
    }
}

fn insert(
    graph: &mut Graph,
    source: usize,
    target: usize,
    weight: Weight,
    progress: &mut Progress<'_>,
) -> Result<usize, Error> {
    if graph.add_edge(source, target, weight) {
        progress.edges_added(1)?;
        Ok(1)
    } else {
        Ok(0)
    }
}

// Number of forward offsets per node; `neighbors / 2`, but at least one so that
// a ring with `neighbors >= 1` is always closed.
fn ring_offsets(neighbors: usize) -> usize {
    if neighbors == 0 {
        0
    } else {
        usize::max(1, neighbors / 2)
    }
}

pub(crate) fn check_density(density: f64) -> Result<(), Error> {
    if density > 0.0 && density <= 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidDensity { density })
    }
}

/// Returns the number of distinct non-loop node pairs.
pub fn max_pairs(node_count: usize, directed: bool) -> u64 {
    let n = node_count as u64;
    let ordered = n * n.saturating_sub(1);
    if directed {
        ordered
    } else {
        ordered / 2
    }
}

/// Returns `clamp(N - 1, round(density * max_pairs), max_pairs)`.
pub fn target_edge_count(node_count: usize, density: f64, directed: bool) -> usize {
    let max = max_pairs(node_count, directed);
    let requested = (density * max as f64).round() as u64;
    let min = node_count.saturating_sub(1) as u64;
    u64::max(min, u64::min(max, requested)) as usize
}

/// Draws the pairs of a uniform random graph without scanning all pairs.
///
/// Candidate pairs are enumerated in a fixed linear order: row-major over
/// `(i, j)` with `i != j` for directed graphs, and row-major over the upper
/// triangle `i < j` for undirected graphs. Instead of testing every pair, the
/// sampler jumps straight to the next included candidate by drawing a
/// geometrically distributed skip distance, which gives an expected running
/// time linear in the number of sampled pairs.
#[derive(Debug, Clone)]
pub struct SkipSampler {
    node_count: u64,
    directed: bool,
    log_q: f64,
    total: u64,
    next: u64,
}

impl SkipSampler {
    pub fn new(node_count: usize, probability: f64, directed: bool) -> Self {
        let probability = f64::min(probability, MAX_PROBABILITY);
        let total = if node_count <= 1 || probability <= 0.0 {
            0
        } else {
            max_pairs(node_count, directed)
        };

        Self {
            node_count: node_count as u64,
            directed,
            log_q: (-probability).ln_1p(),
            total,
            next: 0,
        }
    }

    /// Returns the next sampled pair, or `None` once the candidate space is
    /// exhausted.
    pub fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<(usize, usize)> {
        if self.next >= self.total {
            return None;
        }

        let u = loop {
            let u: f64 = rng.gen();
            if u > 0.0 {
                break u;
            }
        };

        // floor() of a non-negative finite value; saturates for huge skips.
        let skip = (u.ln() / self.log_q).floor() as u64;
        let idx = self.next.saturating_add(skip);
        if idx >= self.total {
            self.next = self.total;
            return None;
        }
        self.next = idx + 1;

        Some(if self.directed {
            directed_index_to_pair(idx, self.node_count)
        } else {
            undirected_index_to_pair(idx, self.node_count)
        })
    }
}

fn directed_index_to_pair(idx: u64, n: u64) -> (usize, usize) {
    let row = idx / (n - 1);
    let mut col = idx % (n - 1);
    if col >= row {
        col += 1;
    }
    (row as usize, col as usize)
}

fn undirected_index_to_pair(idx: u64, n: u64) -> (usize, usize) {
    // Number of pairs in all rows before `row`.
    let offset = |row: u64| row * (2 * n - row - 1) / 2;

    // offset(lo) <= idx < offset(hi)
    let (mut lo, mut hi) = (0, n - 1);
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if offset(mid) <= idx {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let col = idx - offset(lo) + lo + 1;
    (lo as usize, col as usize)
}

/// Fills `graph` with a shortest-path fixture.
///
/// The fixture consists of a Hamiltonian backbone `0 -> 1 -> ... -> N-1` and
/// extra random edges that never touch the start node `0` or the target node
/// `N-1`. Extra edges are drawn by rejection sampling until
/// [`target_edge_count`] is reached or a retry budget of ten times the
/// initial deficit is spent; in the latter case the lower count is kept.
///
/// Returns the number of extra edges.
pub fn fill_shortest_path<R: Rng>(
    graph: &mut Graph,
    density: f64,
    rng: &mut R,
    progress: &mut Progress<'_>,
) -> Result<usize, Error> {
    let node_count = graph.node_count();
    let weights = SHORTEST_PATH_WEIGHTS;

    for i in 1..node_count {
        progress.check()?;
        let w = weights.sample(rng);
        if graph.add_edge(i - 1, i, w) {
            progress.edges_added(1)?;
        }
    }

    let target = target_edge_count(node_count, density, graph.is_directed());
    let deficit = target.saturating_sub(graph.edge_count());
    let budget = deficit.saturating_mul(10);
    let (start, end) = (0, node_count - 1);

    let mut extra = 0;
    let mut attempts = 0;
    while graph.edge_count() < target && attempts < budget {
        progress.check()?;
        attempts += 1;

        let u = rng.gen_range(0..node_count);
        let v = rng.gen_range(0..node_count);
        if u == v || u == start || u == end || v == start || v == end {
            continue;
        }
        if !graph.contains_edge(u, v) {
            let w = weights.sample(rng);
            graph.add_edge(u, v, w);
            progress.edges_added(1)?;
            extra += 1;
        }
    }

    if graph.edge_count() < target {
        debug!(
            "Retry budget of {budget} spent, keeping {} of {target} requested edges",
            graph.edge_count()
        );
    }

    Ok(extra)
}

use bitvec::prelude::*;
use log::debug;
use rand::prelude::*;

use crate::bfs;
use crate::graph::{AdjacencyList, Graph};
use crate::Error;

/// A connected node subset of a target graph, see [`embed_pattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSelection {
    nodes: Vec<usize>,
    adjacency: AdjacencyList,
}

impl PatternSelection {
    /// Returns the selected target node indices in ascending order. The
    /// position of a node in this slice is its index in the pattern.
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Returns the induced undirected adjacency, re-indexed to `0..k`.
    pub fn adjacency(&self) -> &AdjacencyList {
        &self.adjacency
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Builds the pattern graph.
    ///
    /// Nodes are labelled `"0"` to `"k-1"` and carry the vertex labels of
    /// the target nodes they were cut from. Edges are the target edges among
    /// the selected nodes, with their direction and weight preserved.
    pub fn to_graph(&self, target: &Graph) -> Result<Graph, Error> {
        let mut position = vec![None; target.node_count()];
        for (index, &node) in self.nodes.iter().enumerate() {
            position[node] = Some(index);
        }

        let mut pattern = Graph::with_nodes(
            target.is_directed(),
            target.is_weighted(),
            (0..self.nodes.len()).map(|i| i.to_string()),
        );

        for edge in target.edges() {
            if let (Some(source), Some(target)) = (position[edge.source], position[edge.target]) {
                pattern.add_edge(source, target, edge.weight_or_unit());
            }
        }

        if let Some(labels) = target.vertex_labels() {
            pattern.set_vertex_labels(self.nodes.iter().map(|&node| labels[node]).collect())?;
        }

        Ok(pattern)
    }
}

/// Selects `k` nodes of `target` that induce a connected subgraph.
///
/// A component with at least `k` nodes is picked at random from the
/// undirected closure. Starting at a random member, the selection grows by
/// repeatedly moving a random frontier node into it and extending the
/// frontier with that node's unselected neighbors.
///
/// If `k >= 2` and the selected nodes induce no edge, an edge between the
/// two smallest selected nodes is inserted into `target` so that the pattern
/// always has at least one edge. A pattern of size one never has an edge.
pub fn embed_pattern<R: Rng>(
    target: &mut Graph,
    k: usize,
    rng: &mut R,
) -> Result<PatternSelection, Error> {
    let node_count = target.node_count();
    if k == 0 || k >= node_count {
        return Err(Error::InvalidPatternSize { k, node_count });
    }

    let mut closure = target.undirected_closure();
    let components = bfs::components(&closure);
    let candidates = components
        .iter()
        .filter(|component| component.len() >= k)
        .collect::<Vec<_>>();

    let component = candidates
        .choose(rng)
        .ok_or(Error::NoComponentLargeEnough { k })?;

    debug!(
        "Growing pattern of size {k} inside a component of {} nodes ({} candidates)",
        component.len(),
        candidates.len()
    );

    let mut nodes = grow(&closure, component, k, rng)?;
    nodes.sort_unstable();

    let mut adjacency = closure.induced(&nodes);
    if k >= 2 && adjacency.entry_count() == 0 {
        debug!("Pattern has no internal edge, linking {} and {}", nodes[0], nodes[1]);
        target.add_edge(nodes[0], nodes[1], 1);
        closure = target.undirected_closure();
        adjacency = closure.induced(&nodes);
    }

    Ok(PatternSelection { nodes, adjacency })
}

fn grow<R: Rng>(
    closure: &AdjacencyList,
    component: &[usize],
    k: usize,
    rng: &mut R,
) -> Result<Vec<usize>, Error> {
    let mut selected = BitVec::<usize>::repeat(false, closure.node_count());
    let mut in_frontier = BitVec::<usize>::repeat(false, closure.node_count());
    let mut frontier = Vec::new();
    let mut nodes = Vec::with_capacity(k);

    let mut node = component[rng.gen_range(0..component.len())];
    loop {
        selected.set(node, true);
        nodes.push(node);
        if nodes.len() == k {
            return Ok(nodes);
        }

        for &neighbor in closure.neighbors(node) {
            if !selected[neighbor] && !in_frontier[neighbor] {
                in_frontier.set(neighbor, true);
                frontier.push(neighbor);
            }
        }

        if frontier.is_empty() {
            return Err(Error::FrontierExhausted {
                selected: nodes.len(),
                k,
            });
        }

        node = frontier.swap_remove(rng.gen_range(0..frontier.len()));
        in_frontier.set(node, false);
    }
}

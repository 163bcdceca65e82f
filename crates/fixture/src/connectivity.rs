use log::debug;
use rand::Rng;

use crate::dss::{DisjointSetStruct, UnionFind};
use crate::graph::Graph;
use crate::progress::Progress;
use crate::topology::WeightRange;
use crate::Error;

/// Merges all weakly connected components of `graph` into one.
///
/// Components are computed with a [`DisjointSetStruct`] over the existing
/// edges. Consecutive components are then bridged by an edge between their
/// smallest members: `(c[i-1][0], c[i][0])`. Directed graphs also receive the
/// reverse edge, so the result is strongly connected along the bridges.
///
/// Returns the number of inserted edges.
pub fn ensure_connected<R: Rng>(
    graph: &mut Graph,
    weights: WeightRange,
    rng: &mut R,
    progress: &mut Progress<'_>,
) -> Result<usize, Error> {
    let mut dss = DisjointSetStruct::new(graph.node_count());
    for edge in graph.edges() {
        dss.union(edge.source, edge.target);
    }

    let components = dss.components();
    if components.len() <= 1 {
        return Ok(0);
    }

    debug!("Bridging {} components", components.len());

    let mut inserted = 0;
    for pair in components.windows(2) {
        progress.check()?;

        let (u, v) = (pair[0][0], pair[1][0]);
        let w = weights.sample(rng);

        if graph.add_edge(u, v, w) {
            inserted += 1;
            progress.edges_added(1)?;
        }
        if graph.is_directed() && graph.add_edge(v, u, w) {
            inserted += 1;
            progress.edges_added(1)?;
        }

        dss.union(u, v);
    }

    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use rand::prelude::*;

    use super::*;

    fn repair(graph: &mut Graph) -> usize {
        let mut rng = StdRng::seed_from_u64(0);
        ensure_connected(
            graph,
            WeightRange::default(),
            &mut rng,
            &mut Progress::silent(),
        )
        .unwrap()
    }

    fn component_count(graph: &Graph) -> usize {
        let mut dss = DisjointSetStruct::new(graph.node_count());
        for edge in graph.edges() {
            dss.union(edge.source, edge.target);
        }
        dss.components().len()
    }

    #[test]
    fn connected_graph_is_untouched() {
        let mut graph = Graph::with_nodes(false, false, ["a", "b", "c"]);
        graph.add_edge(0, 1, 1);
        graph.add_edge(1, 2, 1);

        assert_eq!(repair(&mut graph), 0);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn bridges_smallest_members() {
        let mut graph = Graph::with_nodes(false, false, ["0", "1", "2", "3", "4"]);
        graph.add_edge(1, 3, 1);

        assert_eq!(repair(&mut graph), 3);
        assert!(graph.contains_edge(0, 1));
        assert!(graph.contains_edge(1, 2));
        assert!(graph.contains_edge(2, 4));
        assert_eq!(component_count(&graph), 1);
    }

    #[test]
    fn directed_bridges_go_both_ways() {
        let mut graph = Graph::with_nodes(true, true, ["0", "1", "2"]);

        assert_eq!(repair(&mut graph), 4);
        assert!(graph.contains_edge(0, 1));
        assert!(graph.contains_edge(1, 0));
        assert!(graph.contains_edge(1, 2));
        assert!(graph.contains_edge(2, 1));

        let weights = graph
            .edges()
            .iter()
            .map(|e| e.weight.unwrap())
            .collect::<Vec<_>>();
        assert_eq!(weights[0], weights[1]);
    }

    #[test]
    fn repair_respects_cancellation() {
        let token = crate::progress::CancellationToken::new();
        token.cancel();

        let mut graph = Graph::with_nodes(false, false, ["0", "1"]);
        let mut rng = StdRng::seed_from_u64(0);
        let mut progress = Progress::new(2, 1).with_token(token);

        let err = ensure_connected(&mut graph, WeightRange::default(), &mut rng, &mut progress)
            .unwrap_err();
        assert!(err.is_aborted());
        assert_eq!(graph.edge_count(), 0);
    }
}

use std::io::Write;

use crate::graph::Graph;
use crate::output::GraphOutput;
use crate::Error;

/// The labelled edge-block format read by the VF3 solver.
///
/// ```text
/// 3        node count
/// 0 1      index and vertex label, one line per node
/// 1 1
/// 2 1
/// 1        out-degree of node 0
/// 0 1      its edges
/// 0        out-degree of node 1
/// 0        out-degree of node 2
/// ```
///
/// Nodes without vertex labels are written with label `1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeBlock;

impl GraphOutput for EdgeBlock {
    fn write_graph<W: Write>(&self, graph: &Graph, output: &mut W) -> Result<(), Error> {
        let canonical = graph.canonical();
        let adjacency = canonical.adjacency();
        let node_count = adjacency.node_count();

        writeln!(output, "{node_count}")?;

        for index in 0..node_count {
            writeln!(output, "{index} {}", canonical.vertex_label(index))?;
        }

        for index in 0..node_count {
            writeln!(output, "{}", adjacency.degree(index))?;
            for neighbor in adjacency.neighbors(index) {
                writeln!(output, "{index} {neighbor}")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::encode;

    #[test]
    fn directed_edge_blocks() {
        let mut graph = Graph::with_nodes(true, false, ["a", "b", "c"]);
        graph.add_edge(0, 1, 1);

        assert_eq!(
            encode(&EdgeBlock, &graph),
            "3\n0 1\n1 1\n2 1\n1\n0 1\n0\n0\n"
        );
    }

    #[test]
    fn undirected_edges_appear_in_both_blocks() {
        let mut graph = Graph::with_nodes(false, false, ["0", "1", "2"]);
        graph.add_edge(2, 1, 1);
        graph.set_vertex_labels(vec![0, 1, 2]).unwrap();

        assert_eq!(
            encode(&EdgeBlock, &graph),
            "3\n0 0\n1 1\n2 2\n0\n1\n1 2\n1\n2 1\n"
        );
    }
}

use std::io::Write;

use crate::graph::Graph;
use crate::output::GraphOutput;
use crate::Error;

/// The adjacency list format read by the Glasgow subgraph solver.
///
/// The first line holds the node count. Each following line describes one
/// node in canonical order: an optional vertex label, the degree and the
/// space separated canonical indices of its neighbors. Directed graphs list
/// out-neighbors, undirected graphs list all neighbors.
///
/// ```text
/// 3
/// 1 1
/// 2 0 2
/// 1 1
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lad {
    labelled: bool,
}

impl Lad {
    pub fn plain() -> Self {
        Self { labelled: false }
    }

    /// Prefixes every node line with its vertex label, `1` if the graph has
    /// none.
    pub fn labelled() -> Self {
        Self { labelled: true }
    }
}

impl GraphOutput for Lad {
    fn write_graph<W: Write>(&self, graph: &Graph, output: &mut W) -> Result<(), Error> {
        let canonical = graph.canonical();
        let adjacency = canonical.adjacency();

        writeln!(output, "{}", adjacency.node_count())?;

        for index in 0..adjacency.node_count() {
            if self.labelled {
                write!(output, "{} ", canonical.vertex_label(index))?;
            }
            write!(output, "{}", adjacency.degree(index))?;
            for neighbor in adjacency.neighbors(index) {
                write!(output, " {neighbor}")?;
            }
            writeln!(output)?;
        }

        Ok(())
    }
}

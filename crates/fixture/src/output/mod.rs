//! Text exchange formats consumed by external solvers.
//!
//! All encoders work on the [`Canonical`](crate::graph::Canonical) view of a
//! graph: nodes are numbered by their label in numeric-aware order, so the
//! written indices never depend on insertion order.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::graph::Graph;
use crate::Error;

pub mod edgelist;
pub mod grf;
pub mod lad;

pub use edgelist::{Header, WeightedEdgeList};
pub use grf::EdgeBlock;
pub use lad::Lad;

/// Encodes a graph into a text format.
pub trait GraphOutput {
    fn write_graph<W: Write>(&self, graph: &Graph, output: &mut W) -> Result<(), Error>;

    /// Creates (or truncates) the file at `path` and writes the graph to it.
    fn write_file<P: AsRef<Path>>(&self, graph: &Graph, path: P) -> Result<(), Error> {
        let file = File::create(path.as_ref())?;
        let mut output = BufWriter::new(file);
        self.write_graph(graph, &mut output)?;
        output.flush()?;
        Ok(())
    }
}

/// The formats available for exporting generated models.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ExportFormat {
    /// Weighted edge list.
    #[default]
    Csv,
    /// Plain adjacency list.
    Lad,
    /// Labelled edge-block format.
    Grf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Lad => "lad",
            ExportFormat::Grf => "grf",
        }
    }

    /// Writes `graph` to `path`. The start and target labels are only used
    /// by the edge-list format.
    pub fn write_file(
        &self,
        graph: &Graph,
        path: &Path,
        start: Option<&str>,
        target: Option<&str>,
    ) -> Result<(), Error> {
        match self {
            ExportFormat::Csv => {
                let mut format = WeightedEdgeList::new();
                if let Some(start) = start {
                    format = format.start(start);
                }
                if let Some(target) = target {
                    format = format.target(target);
                }
                format.write_file(graph, path)
            }
            ExportFormat::Lad => Lad::plain().write_file(graph, path),
            ExportFormat::Grf => EdgeBlock.write_file(graph, path),
        }
    }
}

#[cfg(test)]
pub(crate) fn encode<O: GraphOutput>(format: &O, graph: &Graph) -> String {
    let mut output = Vec::new();
    format.write_graph(graph, &mut output).unwrap();
    String::from_utf8(output).unwrap()
}

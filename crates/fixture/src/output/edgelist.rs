use std::io::Write;

use csv::{Terminator, WriterBuilder};

use crate::graph::Graph;
use crate::output::GraphOutput;
use crate::Error;

/// Column names of the edge-list header row.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Header {
    /// `source,target,weight`
    #[default]
    Long,
    /// `src,dst,w`
    Short,
}

impl Header {
    fn columns(&self, include_weight: bool) -> &'static [&'static str] {
        match (self, include_weight) {
            (Header::Long, true) => &["source", "target", "weight"],
            (Header::Long, false) => &["source", "target"],
            (Header::Short, true) => &["src", "dst", "w"],
            (Header::Short, false) => &["src", "dst"],
        }
    }
}

/// A comma separated edge list with node labels and integer weights.
///
/// ```text
/// # start=v0 target=v4
/// source,target,weight
/// v0,v1,7
/// ```
///
/// The comment line is only written if a start or a target label is set.
/// Unweighted graphs are written with unit weights unless the weight column
/// is disabled. Rows are ordered by the canonical index of their source and
/// then their target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedEdgeList {
    header: Header,
    include_weight: bool,
    start: Option<String>,
    target: Option<String>,
}

impl Default for WeightedEdgeList {
    fn default() -> Self {
        Self {
            header: Header::default(),
            include_weight: true,
            start: None,
            target: None,
        }
    }
}

impl WeightedEdgeList {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn header(mut self, header: Header) -> Self {
        self.header = header;
        self
    }

    #[must_use]
    pub fn include_weight(mut self, include_weight: bool) -> Self {
        self.include_weight = include_weight;
        self
    }

    #[must_use]
    pub fn start(mut self, label: impl Into<String>) -> Self {
        self.start = Some(label.into());
        self
    }

    #[must_use]
    pub fn target(mut self, label: impl Into<String>) -> Self {
        self.target = Some(label.into());
        self
    }

    fn comment(&self) -> Option<String> {
        let parts = [("start", &self.start), ("target", &self.target)]
            .into_iter()
            .filter_map(|(key, label)| label.as_ref().map(|label| format!("{key}={label}")))
            .collect::<Vec<_>>();

        (!parts.is_empty()).then(|| format!("# {}", parts.join(" ")))
    }
}

impl GraphOutput for WeightedEdgeList {
    fn write_graph<W: Write>(&self, graph: &Graph, output: &mut W) -> Result<(), Error> {
        if let Some(comment) = self.comment() {
            writeln!(output, "{comment}")?;
        }

        let canonical = graph.canonical();
        let mut edges = graph.edges().iter().collect::<Vec<_>>();
        edges.sort_by_key(|edge| {
            (
                canonical.index_of(edge.source),
                canonical.index_of(edge.target),
            )
        });

        let mut writer = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(output);

        writer.write_record(self.header.columns(self.include_weight))?;

        for edge in edges {
            let source = graph.label(edge.source);
            let target = graph.label(edge.target);
            if self.include_weight {
                let weight = edge.weight_or_unit().to_string();
                writer.write_record([source, target, weight.as_str()])?;
            } else {
                writer.write_record([source, target])?;
            }
        }

        writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::encode;

    fn graph() -> Graph {
        let mut graph = Graph::with_nodes(true, true, ["v10", "v2", "v1"]);
        graph.add_edge(0, 1, 4);
        graph.add_edge(2, 0, 3);
        graph.add_edge(1, 2, 9);
        graph
    }

    #[test]
    fn rows_follow_canonical_order() {
        let csv = encode(&WeightedEdgeList::new(), &graph());

        assert_eq!(csv, "source,target,weight\nv1,v10,3\nv2,v1,9\nv10,v2,4\n");
    }

    #[test]
    fn comment_line() {
        let format = WeightedEdgeList::new().start("v1").target("v10");
        let csv = encode(&format, &graph());
        assert!(csv.starts_with("# start=v1 target=v10\nsource,target,weight\n"));

        let csv = encode(&WeightedEdgeList::new().target("v2"), &graph());
        assert!(csv.starts_with("# target=v2\n"));
    }

    #[test]
    fn short_header_without_weights() {
        let format = WeightedEdgeList::new()
            .header(Header::Short)
            .include_weight(false);

        assert_eq!(
            encode(&format, &graph()),
            "src,dst\nv1,v10\nv2,v1\nv10,v2\n"
        );
    }

    #[test]
    fn unweighted_graph_uses_unit_weight() {
        let mut graph = Graph::with_nodes(false, false, ["a", "b"]);
        graph.add_edge(1, 0, 5);

        assert_eq!(
            encode(&WeightedEdgeList::new(), &graph),
            "source,target,weight\nb,a,1\n"
        );
    }

    #[test]
    fn labels_are_quoted_when_needed() {
        let mut graph = Graph::with_nodes(true, false, ["a,b", "c"]);
        graph.add_edge(0, 1, 1);

        assert_eq!(
            encode(&WeightedEdgeList::new().include_weight(false), &graph),
            "source,target\n\"a,b\",c\n"
        );
    }
}

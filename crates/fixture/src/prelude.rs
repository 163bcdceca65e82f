pub use crate::dss::{DisjointSetStruct, UnionFind};
pub use crate::fixture::{Family, Fixture, FixtureRequest, DEFAULT_DENSITY};
pub use crate::graph::{AdjacencyList, Edge, Graph, Weight};
pub use crate::metadata::Metadata;
pub use crate::output::{EdgeBlock, ExportFormat, GraphOutput, Header, Lad, WeightedEdgeList};
pub use crate::pattern::PatternSelection;
pub use crate::progress::{CancellationToken, Progress, Stage};
pub use crate::task::{GenerationHandle, Generator, MassJob, Message, Outcome, Summary};
pub use crate::topology::{Topology, WeightRange};

pub use crate::Error;

//! A library that synthesizes random graph fixtures for graph-algorithm
//! benchmarks.
//!
//! A fixture is a randomly generated graph, serialized into the exchange
//! formats consumed by external shortest-path and subgraph-matching solvers.
//! Subgraph-isomorphism fixtures additionally carry a *pattern*: a connected
//! induced subgraph cut out of the generated *target* graph, so that every
//! pattern is guaranteed to have at least one embedding.
//!
//! Generation is deterministic: the same parameters and the same seed always
//! produce byte-identical files. All randomness flows through a single
//! [`rand::rngs::StdRng`] that is seeded once per invocation and passed into
//! every generation routine.
//!
//! # Generation pipeline
//!
//! Each fixture is built in the same order:
//!
//! 1. a [`topology`] generator fills the edge set of a fresh [`Graph`],
//! 2. the [`connectivity`] repairer merges all components into one using a
//!    [`DisjointSetStruct`], unless the topology is connected by construction,
//! 3. for subgraph fixtures, the [`pattern`] embedder grows a connected node
//!    subset of the requested size inside the target graph,
//! 4. the [`output`] encoders write the files, followed by a [`Metadata`]
//!    record.
//!
//! # How to generate a fixture
//!
//! ```
//! use graph_fixture::prelude::*;
//!
//! let fixture = FixtureRequest::new(Family::Combined, 10)
//!     .pattern_size(3)
//!     .density(0.2)
//!     .seed(7)
//!     .generate()
//!     .expect("valid request");
//!
//! assert_eq!(fixture.seed(), 7);
//! assert_eq!(fixture.pattern_nodes().map(|nodes| nodes.len()), Some(3));
//! assert_eq!(fixture.target().node_count(), 10);
//! ```
//!
//! Invalid requests are rejected before any generation work starts:
//!
//! ```
//! use graph_fixture::prelude::*;
//!
//! let err = FixtureRequest::new(Family::LabelledAdjacency, 10)
//!     .pattern_size(10)
//!     .generate()
//!     .unwrap_err();
//!
//! assert!(matches!(err, Error::InvalidPatternSize { k: 10, node_count: 10 }));
//! ```
//!
//! # Background generation
//!
//! The [`task`] module runs the interactive variant of the pipeline on a
//! background thread. The caller polls a bounded channel for node and edge
//! checkpoints and can request cooperative cancellation at any time.

pub mod bfs;
pub mod connectivity;
pub mod dss;
pub mod fixture;
pub mod graph;
pub mod metadata;
pub mod output;
pub mod pattern;
pub mod prelude;
pub mod progress;
pub mod task;
pub mod topology;

pub use crate::dss::DisjointSetStruct;
pub use crate::fixture::{Family, Fixture, FixtureRequest};
pub use crate::graph::{AdjacencyList, Edge, Graph};
pub use crate::metadata::Metadata;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("error while writing fixture")]
    IoError {
        #[from]
        source: std::io::Error,
    },
    #[error("error while writing edge list")]
    CsvError {
        #[from]
        source: csv::Error,
    },
    #[error("error while writing metadata")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },
    #[error("node count must be >= {min}, got {actual}")]
    InvalidNodeCount { min: usize, actual: usize },
    #[error("k is required for {family} generation")]
    MissingPatternSize { family: Family },
    #[error("k must satisfy 1 <= k < {node_count}, got {k}")]
    InvalidPatternSize { k: usize, node_count: usize },
    #[error("density must be in the range (0, 1], got {density}")]
    InvalidDensity { density: f64 },
    #[error("grid dimensions must be positive, got {rows}x{cols}")]
    InvalidGrid { rows: usize, cols: usize },
    #[error("number of vertex labels must be the same as node count")]
    InvalidNodeValues,
    #[error("no connected component is large enough for a pattern of size {k}")]
    NoComponentLargeEnough { k: usize },
    #[error("frontier exhausted after selecting {selected} of {k} pattern nodes")]
    FrontierExhausted { selected: usize, k: usize },
    #[error("{reason}")]
    Aborted { reason: &'static str },
    #[error("another generation is already running")]
    Busy,
    #[error("generation worker panicked")]
    WorkerPanicked,
}

impl Error {
    /// Returns `true` if the error signals cooperative cancellation rather
    /// than a genuine failure.
    pub fn is_aborted(&self) -> bool {
        matches!(self, Error::Aborted { .. })
    }
}

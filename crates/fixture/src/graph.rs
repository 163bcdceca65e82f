use std::cmp::Ordering;

use fxhash::FxHashSet;

use crate::Error;

/// Integer edge weight.
pub type Weight = u32;

/// An edge between two nodes, identified by their insertion index.
///
/// The weight is `Some` if and only if the owning graph is weighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    pub weight: Option<Weight>,
}

impl Edge {
    /// Returns the weight of the edge, treating absent weights as unit.
    pub fn weight_or_unit(&self) -> Weight {
        self.weight.unwrap_or(1)
    }
}

/// The in-memory fixture model.
///
/// A graph is an ordered set of labelled nodes plus a list of edges. Nodes are
/// addressed by their insertion index; labels are only used for the exported
/// representation. The edge set never contains self-loops and never contains
/// two edges for the same endpoint pair: for directed graphs the ordered pair
/// is unique, for undirected graphs the unordered pair is.
///
/// # Example
///
/// ```
/// use graph_fixture::Graph;
///
/// let mut graph = Graph::with_nodes(false, false, ["a", "b", "c"]);
///
/// assert!(graph.add_edge(0, 1, 1));
/// assert!(!graph.add_edge(1, 0, 1)); // same unordered pair
/// assert!(!graph.add_edge(2, 2, 1)); // self-loop
///
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Graph {
    directed: bool,
    weighted: bool,
    labels: Vec<String>,
    vertex_labels: Option<Vec<u32>>,
    edges: Vec<Edge>,
    edge_keys: FxHashSet<(usize, usize)>,
}

impl Graph {
    pub fn new(directed: bool, weighted: bool) -> Self {
        Self {
            directed,
            weighted,
            labels: Vec::new(),
            vertex_labels: None,
            edges: Vec::new(),
            edge_keys: FxHashSet::default(),
        }
    }

    pub fn with_nodes<L, I>(directed: bool, weighted: bool, labels: I) -> Self
    where
        L: Into<String>,
        I: IntoIterator<Item = L>,
    {
        let mut graph = Self::new(directed, weighted);
        graph.labels = labels.into_iter().map(Into::into).collect();
        graph
    }

    /// Appends a node and returns its index.
    pub fn add_node(&mut self, label: impl Into<String>) -> usize {
        self.labels.push(label.into());
        self.labels.len() - 1
    }

    /// Inserts the edge `(source, target)`.
    ///
    /// Returns `false` without modifying the graph if the edge would be a
    /// self-loop, a duplicate, or reference an unknown node. The weight is
    /// dropped if the graph is unweighted.
    pub fn add_edge(&mut self, source: usize, target: usize, weight: Weight) -> bool {
        let node_count = self.node_count();
        if source == target || source >= node_count || target >= node_count {
            return false;
        }

        if !self.edge_keys.insert(self.edge_key(source, target)) {
            return false;
        }

        self.edges.push(Edge {
            source,
            target,
            weight: self.weighted.then_some(weight),
        });

        true
    }

    /// Returns `true` if an edge between the two nodes exists under the
    /// directedness of the graph.
    pub fn contains_edge(&self, source: usize, target: usize) -> bool {
        self.edge_keys.contains(&self.edge_key(source, target))
    }

    fn edge_key(&self, source: usize, target: usize) -> (usize, usize) {
        if self.directed || source < target {
            (source, target)
        } else {
            (target, source)
        }
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    #[inline]
    pub fn is_weighted(&self) -> bool {
        self.weighted
    }

    pub fn label(&self, node: usize) -> &str {
        &self.labels[node]
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the integer vertex label of every node, if any were assigned.
    pub fn vertex_labels(&self) -> Option<&[u32]> {
        self.vertex_labels.as_deref()
    }

    pub fn set_vertex_labels(&mut self, vertex_labels: Vec<u32>) -> Result<(), Error> {
        if vertex_labels.len() != self.node_count() {
            return Err(Error::InvalidNodeValues);
        }
        self.vertex_labels = Some(vertex_labels);
        Ok(())
    }

    /// Returns the adjacency of the undirected closure of this graph, in node
    /// insertion order. Neighbor lists are sorted and deduplicated.
    pub fn undirected_closure(&self) -> AdjacencyList {
        let mut lists = vec![Vec::new(); self.node_count()];
        for edge in &self.edges {
            lists[edge.source].push(edge.target);
            lists[edge.target].push(edge.source);
        }
        AdjacencyList::from_lists(lists)
    }

    /// Derives the export view of the graph.
    ///
    /// Nodes are renumbered by sorting their labels with [`natural_cmp`], so
    /// the exported indices depend only on the labels and never on insertion
    /// order. Neighbor lists hold out-neighbors for directed graphs and all
    /// neighbors for undirected graphs.
    pub fn canonical(&self) -> Canonical<'_> {
        let mut order = (0..self.node_count()).collect::<Vec<_>>();
        order.sort_by(|&a, &b| natural_cmp(&self.labels[a], &self.labels[b]));

        let mut position = vec![0; self.node_count()];
        for (index, &node) in order.iter().enumerate() {
            position[node] = index;
        }

        let mut lists = vec![Vec::new(); self.node_count()];
        for edge in &self.edges {
            let (source, target) = (position[edge.source], position[edge.target]);
            lists[source].push(target);
            if !self.directed {
                lists[target].push(source);
            }
        }

        Canonical {
            graph: self,
            order,
            position,
            adjacency: AdjacencyList::from_lists(lists),
        }
    }
}

/// The export view of a [`Graph`], see [`Graph::canonical`].
#[derive(Debug)]
pub struct Canonical<'a> {
    graph: &'a Graph,
    order: Vec<usize>,
    position: Vec<usize>,
    adjacency: AdjacencyList,
}

impl<'a> Canonical<'a> {
    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    /// Maps a canonical index to the node index of the underlying graph.
    pub fn node(&self, index: usize) -> usize {
        self.order[index]
    }

    /// Maps a node index of the underlying graph to its canonical index.
    pub fn index_of(&self, node: usize) -> usize {
        self.position[node]
    }

    pub fn adjacency(&self) -> &AdjacencyList {
        &self.adjacency
    }

    /// Returns the vertex label at the given canonical index, defaulting to
    /// `1` for graphs without vertex labels.
    pub fn vertex_label(&self, index: usize) -> u32 {
        self.graph
            .vertex_labels()
            .map_or(1, |labels| labels[self.order[index]])
    }
}

/// Sorted, deduplicated neighbor lists over a dense `0..n` index range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyList {
    lists: Vec<Vec<usize>>,
}

impl AdjacencyList {
    pub fn from_lists(mut lists: Vec<Vec<usize>>) -> Self {
        for list in &mut lists {
            list.sort_unstable();
            list.dedup();
        }
        Self { lists }
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.lists.len()
    }

    /// Returns the number of stored (node, neighbor) entries.
    pub fn entry_count(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }

    #[inline]
    pub fn degree(&self, node: usize) -> usize {
        self.lists[node].len()
    }

    #[inline]
    pub fn neighbors(&self, node: usize) -> &[usize] {
        self.lists[node].as_slice()
    }

    /// Restricts the adjacency to the given nodes and renumbers them by their
    /// position in `nodes`.
    pub fn induced(&self, nodes: &[usize]) -> AdjacencyList {
        let mut position = vec![None; self.node_count()];
        for (index, &node) in nodes.iter().enumerate() {
            position[node] = Some(index);
        }

        let lists = nodes
            .iter()
            .map(|&node| {
                self.neighbors(node)
                    .iter()
                    .filter_map(|&neighbor| position[neighbor])
                    .collect()
            })
            .collect();

        AdjacencyList::from_lists(lists)
    }
}

/// Compares two labels with numeric-aware ordering.
///
/// Labels are split into runs of ASCII digits and runs of other characters.
/// Digit runs compare by numeric value, other runs compare lexicographically,
/// and a digit run sorts before a text run at the same position.
///
/// # Example
///
/// ```
/// use std::cmp::Ordering;
/// use graph_fixture::graph::natural_cmp;
///
/// assert_eq!(natural_cmp("v2", "v10"), Ordering::Less);
/// assert_eq!(natural_cmp("10", "9"), Ordering::Greater);
/// assert_eq!(natural_cmp("b", "a1"), Ordering::Greater);
/// ```
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = Runs(a);
    let mut right = Runs(b);

    loop {
        let ordering = match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(Run::Digits(x)), Some(Run::Digits(y))) => cmp_digits(x, y),
            (Some(Run::Text(x)), Some(Run::Text(y))) => x.cmp(y),
            (Some(Run::Digits(_)), Some(Run::Text(_))) => Ordering::Less,
            (Some(Run::Text(_)), Some(Run::Digits(_))) => Ordering::Greater,
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }
}

// Compares digit runs of arbitrary length without parsing them.
fn cmp_digits(x: &str, y: &str) -> Ordering {
    let x = x.trim_start_matches('0');
    let y = y.trim_start_matches('0');
    x.len().cmp(&y.len()).then_with(|| x.cmp(y))
}

enum Run<'a> {
    Digits(&'a str),
    Text(&'a str),
}

struct Runs<'a>(&'a str);

impl<'a> Iterator for Runs<'a> {
    type Item = Run<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.0.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .0
            .find(|c: char| c.is_ascii_digit() != digits)
            .unwrap_or(self.0.len());
        let (run, rest) = self.0.split_at(end);
        self.0 = rest;

        Some(if digits {
            Run::Digits(run)
        } else {
            Run::Text(run)
        })
    }
}

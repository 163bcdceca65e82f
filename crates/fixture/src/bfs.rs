use std::collections::VecDeque;

use bitvec::prelude::*;

use crate::graph::AdjacencyList;

pub fn bfs_undirected(
    adjacency: &AdjacencyList,
    node_ids: impl IntoIterator<Item = usize>,
) -> UndirectedBreadthFirst<'_> {
    UndirectedBreadthFirst::new(adjacency, node_ids)
}

/// Breadth-first traversal over symmetric neighbor lists.
///
/// Yields every node reachable from the start nodes exactly once, in
/// visiting order.
pub struct UndirectedBreadthFirst<'a> {
    adjacency: &'a AdjacencyList,
    seen: BitVec<usize>,
    visited: BitVec<usize>,
    queue: VecDeque<usize>,
}

impl<'a> UndirectedBreadthFirst<'a> {
    pub fn new(adjacency: &'a AdjacencyList, node_ids: impl IntoIterator<Item = usize>) -> Self {
        let bitvec = BitVec::repeat(false, adjacency.node_count());
        let visited = bitvec.clone();

        let mut seen = bitvec;
        let mut queue = VecDeque::new();
        Self::enqueue_into(&mut seen, &mut queue, node_ids);

        Self {
            adjacency,
            seen,
            visited,
            queue,
        }
    }

    fn dequeue(&mut self) -> Option<usize> {
        loop {
            let node_id = self.queue.pop_front()?;

            if !self.visited.replace(node_id, true) {
                return Some(node_id);
            }
        }
    }

    fn enqueue_into(
        seen: &mut BitVec<usize>,
        queue: &mut VecDeque<usize>,
        node_ids: impl IntoIterator<Item = usize>,
    ) {
        for node_id in node_ids {
            if !seen.replace(node_id, true) {
                queue.push_back(node_id);
            }
        }
    }

    fn enqueue_neighbors_of(&mut self, node_id: usize) {
        let node_ids = self
            .adjacency
            .neighbors(node_id)
            .iter()
            .copied()
            .filter(|&node_id| !self.visited[node_id]);

        Self::enqueue_into(&mut self.seen, &mut self.queue, node_ids);
    }
}

impl<'a> Iterator for UndirectedBreadthFirst<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let node_id = self.dequeue()?;

        self.enqueue_neighbors_of(node_id);

        Some(node_id)
    }
}

/// Partitions the nodes into connected components.
///
/// Components are discovered in ascending order of their smallest node and
/// their members are sorted ascending.
pub fn components(adjacency: &AdjacencyList) -> Vec<Vec<usize>> {
    let mut assigned = BitVec::<usize>::repeat(false, adjacency.node_count());
    let mut components = Vec::new();

    for start in 0..adjacency.node_count() {
        if assigned[start] {
            continue;
        }

        let mut component = bfs_undirected(adjacency, [start]).collect::<Vec<_>>();
        for &node_id in &component {
            assigned.set(node_id, true);
        }
        component.sort_unstable();
        components.push(component);
    }

    components
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjacency(node_count: usize, edges: &[(usize, usize)]) -> AdjacencyList {
        let mut lists = vec![Vec::new(); node_count];
        for &(u, v) in edges {
            lists[u].push(v);
            lists[v].push(u);
        }
        AdjacencyList::from_lists(lists)
    }

    #[test]
    fn undirected() {
        let adjacency = adjacency(4, &[(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)]);

        let actual: Vec<usize> = bfs_undirected(&adjacency, [0]).collect();
        let expected: Vec<usize> = vec![0, 1, 2, 3];

        assert_eq!(actual, expected);
    }

    #[test]
    fn unreachable_nodes_are_skipped() {
        let adjacency = adjacency(5, &[(3, 1), (1, 4)]);

        let actual: Vec<usize> = bfs_undirected(&adjacency, [4]).collect();

        assert_eq!(actual, vec![4, 1, 3]);
    }

    #[test]
    fn partitions_into_components() {
        let adjacency = adjacency(6, &[(5, 1), (3, 2), (2, 4)]);

        assert_eq!(
            components(&adjacency),
            vec![vec![0], vec![1, 5], vec![2, 3, 4]]
        );
    }
}

/// A Disjoint Set Struct over the dense node range `0..len`.
///
/// The implementation is an arena of parent indices. `find` applies path
/// halving, `union` attaches the larger root to the smaller one
/// (Union-by-Min), so the representative of a set is always its smallest
/// member.
///
/// The struct is owned by a single generation pipeline and therefore uses
/// plain indices instead of atomics.
#[derive(Debug, Clone)]
pub struct DisjointSetStruct(Box<[usize]>);

/// Near-constant-time set membership tracking.
#[allow(clippy::len_without_is_empty)]
pub trait UnionFind {
    /// Joins the set of `id1` with the set of `id2`.
    fn union(&mut self, id1: usize, id2: usize);
    /// Find the set of `id`.
    fn find(&mut self, id: usize) -> usize;
    /// Returns the number of elements in the union find,
    /// also referred to as its 'length'.
    fn len(&self) -> usize;
}

impl UnionFind for DisjointSetStruct {
    /// Joins the set of `id1` with the set of `id2`.
    ///
    /// # Examples
    ///
    /// ```
    /// use graph_fixture::dss::{DisjointSetStruct, UnionFind};
    ///
    /// let mut dss = DisjointSetStruct::new(10);
    /// dss.union(2, 4);
    /// assert_eq!(dss.find(2), 2);
    /// assert_eq!(dss.find(4), 2);
    /// ```
    fn union(&mut self, id1: usize, id2: usize) {
        let mut id1 = self.find(id1);
        let mut id2 = self.find(id2);

        if id1 == id2 {
            return;
        }

        // The smaller set id wins, so only the entry of the larger one changes.
        if id1 < id2 {
            std::mem::swap(&mut id1, &mut id2);
        }

        self.0[id1] = id2;
    }

    /// Find the set of `id`.
    ///
    /// # Examples
    ///
    /// ```
    /// use graph_fixture::dss::{DisjointSetStruct, UnionFind};
    ///
    /// let mut dss = DisjointSetStruct::new(10);
    /// assert_eq!(dss.find(4), 4);
    /// dss.union(4, 2);
    /// assert_eq!(dss.find(4), 2);
    /// ```
    fn find(&mut self, mut id: usize) -> usize {
        let mut parent = self.0[id];

        while id != parent {
            let grand_parent = self.0[parent];
            self.0[id] = grand_parent;
            id = parent;
            parent = grand_parent;
        }

        id
    }

    /// Returns the number of elements in the dss.
    ///
    /// # Examples
    ///
    /// ```
    /// use graph_fixture::dss::{DisjointSetStruct, UnionFind};
    ///
    /// let dss = DisjointSetStruct::new(3);
    /// assert_eq!(dss.len(), 3);
    /// ```
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl DisjointSetStruct {
    /// Creates a new disjoint-set struct of `size` singleton sets.
    pub fn new(size: usize) -> Self {
        Self((0..size).collect())
    }

    /// Groups all ids by their set.
    ///
    /// Groups are ordered by their representative and members are listed in
    /// ascending order, so the first member of each group is its smallest id.
    pub fn components(&mut self) -> Vec<Vec<usize>> {
        let mut slot = vec![usize::MAX; self.len()];
        let mut components = Vec::new();

        for id in 0..self.len() {
            let root = self.find(id);
            if slot[root] == usize::MAX {
                slot[root] = components.len();
                components.push(Vec::new());
            }
            components[slot[root]].push(id);
        }

        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union() {
        let mut dss = DisjointSetStruct::new(10);

        assert_eq!(dss.find(9), 9);
        dss.union(9, 7);
        assert_eq!(dss.find(9), 7);
        dss.union(7, 4);
        assert_eq!(dss.find(9), 4);
        dss.union(4, 2);
        assert_eq!(dss.find(9), 2);
        dss.union(2, 0);
        assert_eq!(dss.find(9), 0);
    }

    #[test]
    fn test_union_with_path_halving() {
        let mut dss = DisjointSetStruct::new(10);

        dss.union(4, 3);
        dss.union(3, 2);
        dss.union(2, 1);
        dss.union(1, 0);

        dss.union(9, 8);
        dss.union(8, 7);
        dss.union(7, 6);
        dss.union(6, 5);

        assert_eq!(dss.find(4), 0);
        assert_eq!(dss.find(9), 5);

        dss.union(5, 4);

        for i in 0..dss.len() {
            assert_eq!(dss.find(i), 0);
        }
    }

    #[test]
    fn test_components() {
        let mut dss = DisjointSetStruct::new(6);

        dss.union(5, 1);
        dss.union(3, 2);

        assert_eq!(
            dss.components(),
            vec![vec![0], vec![1, 5], vec![2, 3], vec![4]]
        );
    }
}

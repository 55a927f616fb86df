//! Disjoint-set forest (union-find) with path compression and union by rank.
//!
//! Used transiently by [`kruskal`](crate::tsp::kruskal) to reject edges that
//! would close a cycle.

/// A fixed-size disjoint-set forest over `0..n`.
///
/// # Examples
///
/// ```
/// use u_tsp::union_find::DisjointSet;
///
/// let mut ds = DisjointSet::new(4);
/// ds.union_set(0, 1);
/// ds.union_set(2, 3);
/// assert!(ds.is_same_set(0, 1));
/// assert!(!ds.is_same_set(1, 2));
/// ```
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl DisjointSet {
    /// Creates `n` singleton sets.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Representative of `x`'s set. Every node on the walk is re-parented
    /// directly onto the root.
    ///
    /// # Panics
    /// Panics if `x >= len()`.
    pub fn find_set(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    pub fn is_same_set(&mut self, x: usize, y: usize) -> bool {
        self.find_set(x) == self.find_set(y)
    }

    /// Merges the sets of `x` and `y`. The lower-rank root goes under the
    /// higher-rank one; on equal ranks `x`'s root goes under `y`'s.
    pub fn union_set(&mut self, x: usize, y: usize) {
        let rx = self.find_set(x);
        let ry = self.find_set(y);
        if rx == ry {
            return;
        }

        if self.rank[rx] > self.rank[ry] {
            self.parent[ry] = rx;
        } else {
            self.parent[rx] = ry;
            if self.rank[rx] == self.rank[ry] {
                self.rank[ry] += 1;
            }
        }
    }
}

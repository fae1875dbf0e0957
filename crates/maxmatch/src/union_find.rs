//! Union-find over vertex classes, used to contract blossoms virtually.
//!
//! Contraction never touches the adjacency: edge scans still visit the
//! original neighbors, and `find` maps each one to the representative of
//! its current top-level blossom. `union_into` deliberately re-roots at a
//! chosen representative (the blossom base) rather than by rank, because
//! callers need `find(v)` to return the base vertex itself.

/// Path-halving union-find.
#[derive(Clone, Debug)]
pub struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        UnionFind {
            parent: (0..n).collect(),
        }
    }

    /// Reset every element to its own class.
    pub fn reset(&mut self) {
        for (i, p) in self.parent.iter_mut().enumerate() {
            *p = i;
        }
    }

    /// Representative of `v`'s class. Every other node on the walk is
    /// re-parented to its grandparent.
    pub fn find(&mut self, mut v: usize) -> usize {
        while self.parent[v] != v {
            self.parent[v] = self.parent[self.parent[v]];
            v = self.parent[v];
        }
        v
    }

    /// Merge `a`'s class into the class rooted at `r`. `r` must be a
    /// representative (or be made one afterwards via `make_rep`).
    pub fn union_into(&mut self, a: usize, r: usize) {
        let fa = self.find(a);
        self.parent[fa] = r;
    }

    /// Merge `a`'s class into `b`'s, keeping `b`'s representative.
    pub fn union(&mut self, a: usize, b: usize) {
        let fa = self.find(a);
        let fb = self.find(b);
        if fa != fb {
            self.parent[fa] = fb;
        }
    }

    /// Force `v` to be the representative of its class.
    pub fn make_rep(&mut self, v: usize) {
        let r = self.find(v);
        if r != v {
            self.parent[r] = v;
            self.parent[v] = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_into_keeps_chosen_root() {
        let mut uf = UnionFind::new(6);
        uf.union_into(1, 0);
        uf.union_into(2, 0);
        assert_eq!(uf.find(1), 0);
        assert_eq!(uf.find(2), 0);
        assert_eq!(uf.find(3), 3);
    }

    #[test]
    fn make_rep_moves_representative() {
        let mut uf = UnionFind::new(4);
        uf.union(0, 1);
        uf.union(1, 2);
        let r = uf.find(0);
        assert_eq!(r, uf.find(2));
        uf.make_rep(0);
        assert_eq!(uf.find(1), 0);
        assert_eq!(uf.find(2), 0);
        assert_eq!(uf.find(0), 0);
    }

    #[test]
    fn reset_restores_singletons() {
        let mut uf = UnionFind::new(3);
        uf.union(0, 2);
        uf.reset();
        assert_eq!(uf.find(0), 0);
        assert_eq!(uf.find(2), 2);
    }
}

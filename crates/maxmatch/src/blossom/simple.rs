//! Edmonds' blossom algorithm, baseline variant.
//!
//! One augmenting path per BFS, one BFS per exposed vertex, repeated
//! until no path is found. Blossoms are tracked only through a flat
//! `base` map rewritten on contraction; whether a tree vertex is outer is
//! decided by the parity of its parent chain. The parity walk is guarded
//! by an epoch-stamped visited check because contracted blossoms can
//! introduce self-links into the chain.
//!
//! This is the pedagogical baseline: the forest variant in
//! `blossom::forest` is the one with real blossom records.

use std::collections::VecDeque;

use crate::graph::{collect_matching, Graph, Matching};

/// Baseline Edmonds engine over a borrowed graph.
pub struct BlossomSimple<'a> {
    g: &'a Graph,
    mate: Vec<Option<usize>>,
    parent: Vec<Option<usize>>,
    base: Vec<usize>,
    mark: Vec<u64>,
    epoch: u64,
}

/// Convenience: run the baseline engine over `g`.
pub fn maximum_matching(g: &Graph) -> Matching {
    BlossomSimple::new(g).maximum_matching()
}

impl<'a> BlossomSimple<'a> {
    pub fn new(g: &'a Graph) -> Self {
        let n = g.vertex_count();
        BlossomSimple {
            g,
            mate: vec![None; n],
            parent: vec![None; n],
            base: (0..n).collect(),
            mark: vec![0; n],
            epoch: 0,
        }
    }

    /// Stages until no augmenting path remains; returns the sorted matching.
    pub fn maximum_matching(&mut self) -> Matching {
        let n = self.g.vertex_count();
        let mut improved = true;
        let mut stage = 0u32;
        while improved {
            improved = false;
            for v in 0..n {
                if self.mate[v].is_none() {
                    let path = self.find_augmenting_path(v);
                    if !path.is_empty() {
                        self.augment(&path);
                        stage += 1;
                        tracing::debug!(stage, matched = path.len(), "augmented");
                        improved = true;
                        break;
                    }
                }
            }
        }
        collect_matching(&self.mate)
    }

    /// Parity of the parent chain from `v`; true for even (outer).
    fn is_outer(&mut self, v: usize) -> bool {
        if self.parent[v].is_none() {
            return false;
        }
        self.epoch += 1;
        let ep = self.epoch;
        let mut current = v;
        let mut distance = 0u32;
        while let Some(p) = self.parent[current] {
            if p == current || self.mark[current] == ep {
                break;
            }
            self.mark[current] = ep;
            current = p;
            distance += 1;
        }
        distance % 2 == 0
    }

    /// First common base on the ancestor chains of `v` and `w`.
    fn find_blossom(&mut self, v: usize, w: usize) -> usize {
        self.epoch += 1;
        let ep = self.epoch;
        let mut current = v;
        loop {
            self.mark[self.base[current]] = ep;
            match self.parent[current] {
                Some(p) if p != current => current = p,
                _ => break,
            }
        }
        current = w;
        loop {
            if self.mark[self.base[current]] == ep {
                return self.base[current];
            }
            match self.parent[current] {
                Some(p) if p != current => current = p,
                _ => break,
            }
        }
        v
    }

    /// Rewrite `base` along both chains down to the blossom base.
    fn contract_blossom(&mut self, blossom_base: usize, v: usize, w: usize) {
        for start in [v, w] {
            let mut current = start;
            while self.base[current] != blossom_base {
                self.base[current] = blossom_base;
                let Some(m) = self.mate[current] else { break };
                self.base[m] = blossom_base;
                let Some(next) = self.parent[m] else { break };
                current = next;
            }
        }
        self.base[v] = blossom_base;
        self.base[w] = blossom_base;
    }

    /// Path `w, v, parent(v), …` up to the root.
    fn build_path(&self, v: usize, w: usize) -> Vec<usize> {
        let mut path = vec![w, v];
        let mut current = v;
        while let Some(p) = self.parent[current] {
            if p == current {
                break;
            }
            path.push(p);
            current = p;
        }
        path
    }

    fn augment(&mut self, path: &[usize]) {
        let mut i = 0;
        while i + 1 < path.len() {
            let u = path[i];
            let v = path[i + 1];
            self.mate[u] = Some(v);
            self.mate[v] = Some(u);
            i += 2;
        }
    }

    fn find_augmenting_path(&mut self, start: usize) -> Vec<usize> {
        let n = self.g.vertex_count();
        for i in 0..n {
            self.parent[i] = None;
            self.base[i] = i;
        }
        // Root marks itself; membership is `parent.is_some()`.
        self.parent[start] = Some(start);

        let mut queue = VecDeque::new();
        queue.push_back(start);

        // Copy of the shared graph handle: neighbor slices borrow the
        // graph, not this engine, so scratch arrays stay mutable.
        let g = self.g;
        while let Some(v) = queue.pop_front() {
            for &w in g.neighbors(v) {
                if self.base[v] == self.base[w] {
                    continue;
                }
                if self.mate[w].is_none() {
                    return self.build_path(v, w);
                }
                if self.parent[w].is_none() {
                    // Grow: w becomes inner, its mate outer.
                    self.parent[w] = Some(v);
                    if let Some(mw) = self.mate[w] {
                        self.parent[mw] = Some(w);
                        queue.push_back(mw);
                    }
                } else if self.is_outer(w) {
                    let blossom_base = self.find_blossom(v, w);
                    self.contract_blossom(blossom_base, v, w);
                    queue.push_back(blossom_base);
                }
            }
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate;

    fn check(n: usize, edges: &[(usize, usize)], expected: usize) -> Matching {
        let g = Graph::from_edges(n, edges);
        let m = maximum_matching(&g);
        assert_eq!(m.len(), expected, "matching size on n={n}");
        assert!(validate(&g, &m).passed());
        m
    }

    #[test]
    fn triangle_with_tail() {
        check(5, &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4)], 2);
    }

    #[test]
    fn odd_cycle_five() {
        check(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)], 2);
    }

    #[test]
    fn two_disjoint_triangles() {
        check(6, &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)], 2);
    }

    #[test]
    fn nested_blossom_stress() {
        check(
            7,
            &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 2), (5, 2)],
            3,
        );
    }

    #[test]
    fn empty_and_trivial_graphs() {
        check(0, &[], 0);
        check(3, &[], 0);
        check(3, &[(0, 1)], 1);
    }

    #[test]
    fn petersen_graph_is_perfectly_matched() {
        let edges = [
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 4),
            (4, 0),
            (0, 5),
            (1, 6),
            (2, 7),
            (3, 8),
            (4, 9),
            (5, 7),
            (7, 9),
            (9, 6),
            (6, 8),
            (8, 5),
        ];
        check(10, &edges, 5);
    }
}

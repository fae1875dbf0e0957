//! Interleaved lowest-common-ancestor search on alternating forests.
//!
//! Given two even (S) vertices, climb toward the roots from both sides in
//! lockstep, stamping each visited blossom base with a per-call epoch.
//! The first base carrying the other side's stamp is the LCA — a blossom
//! has been found. If both climbs reach exposed roots without meeting,
//! the two vertices lie in different trees and the caller has an
//! augmenting path.
//!
//! The epoch counter makes the two tag arrays self-clearing: stale stamps
//! from earlier calls never compare equal. One call costs O(path length)
//! and allocates nothing.

use crate::union_find::UnionFind;

/// Epoch-tagged scratch state for interleaved LCA queries.
#[derive(Clone, Debug)]
pub struct LcaTags {
    tag_a: Vec<u64>,
    tag_b: Vec<u64>,
    epoch: u64,
}

impl LcaTags {
    pub fn new(n: usize) -> Self {
        LcaTags {
            tag_a: vec![0; n],
            tag_b: vec![0; n],
            epoch: 0,
        }
    }

    /// One climb step from base `h`: the base of the tree parent of
    /// `mate[h]`, or `None` when `h` is a root.
    fn climb(
        bases: &mut UnionFind,
        mate: &[Option<usize>],
        parent: &[Option<usize>],
        h: usize,
    ) -> Option<usize> {
        let m = mate[h]?;
        let p = parent[m]?;
        Some(bases.find(p))
    }

    /// LCA of the blossoms containing `u` and `v`, or `None` when they
    /// belong to different trees.
    pub fn lca(
        &mut self,
        bases: &mut UnionFind,
        mate: &[Option<usize>],
        parent: &[Option<usize>],
        u: usize,
        v: usize,
    ) -> Option<usize> {
        self.epoch += 1;
        let ep = self.epoch;
        let mut hu = bases.find(u);
        let mut hv = bases.find(v);
        self.tag_a[hu] = ep;
        self.tag_b[hv] = ep;
        loop {
            if self.tag_a[hv] == ep {
                return Some(hv);
            }
            if self.tag_b[hu] == ep {
                return Some(hu);
            }
            let nu = Self::climb(bases, mate, parent, hu);
            let nv = Self::climb(bases, mate, parent, hv);
            if nu.is_none() && nv.is_none() {
                return None;
            }
            if let Some(next) = nu {
                hu = next;
                self.tag_a[hu] = ep;
            }
            if let Some(next) = nv {
                hv = next;
                self.tag_b[hv] = ep;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Forest fixture: even vertices climb via base(parent(mate(v))).
    fn forest() -> (UnionFind, Vec<Option<usize>>, Vec<Option<usize>>) {
        // Tree rooted at 0:   0 --(1=2)-- 2 --(3=4)-- 4
        //                      \--(5=6)-- 6
        let mate = vec![
            None,
            Some(2),
            Some(1),
            Some(4),
            Some(3),
            Some(6),
            Some(5),
        ];
        let parent = vec![None, Some(0), None, Some(2), None, Some(0), None];
        (UnionFind::new(7), mate, parent)
    }

    #[test]
    fn meets_at_root_of_same_tree() {
        let (mut uf, mate, parent) = forest();
        let mut tags = LcaTags::new(7);
        assert_eq!(tags.lca(&mut uf, &mate, &parent, 4, 6), Some(0));
    }

    #[test]
    fn meets_below_root_when_paths_share_a_branch() {
        let (mut uf, mate, parent) = forest();
        let mut tags = LcaTags::new(7);
        assert_eq!(tags.lca(&mut uf, &mate, &parent, 4, 2), Some(2));
    }

    #[test]
    fn distinct_trees_report_none() {
        // Two trees: 0 --(1=2)-- 2   and   3 --(4=5)-- 5.
        let mate = vec![None, Some(2), Some(1), None, Some(5), Some(4)];
        let parent = vec![None, Some(0), None, None, Some(3), None];
        let mut uf = UnionFind::new(6);
        let mut tags = LcaTags::new(6);
        assert_eq!(tags.lca(&mut uf, &mate, &parent, 2, 5), None);
    }

    #[test]
    fn repeated_calls_do_not_need_clearing() {
        let (mut uf, mate, parent) = forest();
        let mut tags = LcaTags::new(7);
        for _ in 0..3 {
            assert_eq!(tags.lca(&mut uf, &mate, &parent, 4, 6), Some(0));
        }
    }
}

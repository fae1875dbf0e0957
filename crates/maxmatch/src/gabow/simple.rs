//! Gabow's O(V·E) engine: forest BFS with virtual contraction.
//!
//! Every iteration labels all exposed vertices as even roots at once and
//! grows one forest. Blossoms are contracted path-only through the shared
//! union-find — no records are built; instead each odd vertex absorbed
//! into a blossom stores the bridge `(x, y)` that swallowed it, and
//! augmentation unwinds those bridges with an explicit frame stack.
//! An even–even edge either closes a blossom (interleaved LCA finds the
//! meeting base) or joins two trees (LCA reports none) and augments.

use crate::graph::{collect_matching, Graph, Matching};
use crate::greedy::{seed_matching, Warmstart};
use crate::lca::LcaTags;
use crate::union_find::UnionFind;

const UNLABELED: u8 = 0;
const EVEN: u8 = 1;
const ODD: u8 = 2;

/// Gabow forest engine over a borrowed graph.
pub struct GabowSimple<'a> {
    g: &'a Graph,
    mate: Vec<Option<usize>>,
    label: Vec<u8>,
    parent: Vec<Option<usize>>,
    bridge: Vec<Option<(usize, usize)>>,
    bases: UnionFind,
    lca_tags: LcaTags,
    seeded: usize,
}

/// Convenience: run the engine without a warm start.
pub fn maximum_matching(g: &Graph) -> Matching {
    GabowSimple::new(g).maximum_matching(Warmstart::Off)
}

#[derive(Clone, Copy)]
struct TraceFrame {
    v: usize,
    stop: Option<usize>,
    phase: u8,
    bridge: (usize, usize),
}

impl TraceFrame {
    fn new(v: usize, stop: Option<usize>) -> Self {
        TraceFrame {
            v,
            stop,
            phase: 0,
            bridge: (0, 0),
        }
    }
}

impl<'a> GabowSimple<'a> {
    pub fn new(g: &'a Graph) -> Self {
        let n = g.vertex_count();
        GabowSimple {
            g,
            mate: vec![None; n],
            label: vec![UNLABELED; n],
            parent: vec![None; n],
            bridge: vec![None; n],
            bases: UnionFind::new(n),
            lca_tags: LcaTags::new(n),
            seeded: 0,
        }
    }

    /// Pairs added by the warm start of the last run.
    #[inline]
    pub fn seeded(&self) -> usize {
        self.seeded
    }

    /// Iterate forests until no augmenting path remains.
    pub fn maximum_matching(&mut self, warmstart: Warmstart) -> Matching {
        self.seeded = seed_matching(self.g, &mut self.mate, warmstart);
        let mut stage = 0u32;
        while self.find_and_augment() {
            stage += 1;
        }
        tracing::debug!(stages = stage, seeded = self.seeded, "search finished");
        collect_matching(&self.mate)
    }

    /// Walk from `x` back to the blossom base `b`, merging every cycle
    /// vertex into `b`'s class. Each odd vertex on the path records the
    /// bridge `(x, y)` and turns even.
    fn shrink_path(&mut self, b: usize, x: usize, y: usize, queue: &mut Vec<usize>) {
        let mut v = self.bases.find(x);
        while v != b {
            let mv = self.mate[v].expect("cycle vertex below the base is matched");
            self.bases.union_into(v, b);
            self.bases.union_into(mv, b);
            self.bridge[mv] = Some((x, y));
            if self.label[mv] != EVEN {
                self.label[mv] = EVEN;
                queue.push(mv);
            }
            let pm = self.parent[mv].expect("odd vertex has a tree parent");
            v = self.bases.find(pm);
        }
    }

    /// Collect the matched/unmatched edge flips from `v` to `stop`
    /// (`None` = this side's root). Odd vertices with a recorded bridge
    /// detour through it; the detour nests, hence the frame stack.
    fn trace_path(&self, v: usize, stop: Option<usize>, pairs: &mut Vec<(usize, usize)>) {
        let mut stack = vec![TraceFrame::new(v, stop)];
        while !stack.is_empty() {
            let idx = stack.len() - 1;
            let f = stack[idx];
            if Some(f.v) == f.stop {
                stack.pop();
                continue;
            }
            match f.phase {
                0 => {
                    if let Some((sb, tb)) = self.bridge[f.v] {
                        // Originally odd, absorbed into a blossom: walk
                        // the bridge side first, then cross it.
                        let m = self.mate[f.v].expect("bridged vertex is matched");
                        stack[idx].bridge = (sb, tb);
                        stack[idx].phase = 1;
                        stack.push(TraceFrame::new(sb, Some(m)));
                    } else {
                        match self.mate[f.v] {
                            None => {
                                stack.pop(); // exposed root
                            }
                            Some(m) => {
                                let pm = self.parent[m].expect("odd vertex has a tree parent");
                                pairs.push((m, pm));
                                stack[idx].v = pm;
                            }
                        }
                    }
                }
                1 => {
                    pairs.push(f.bridge);
                    stack[idx].phase = 2;
                    let (_, tb) = f.bridge;
                    let stop = f.stop;
                    stack.push(TraceFrame::new(tb, stop));
                }
                _ => {
                    stack.pop();
                }
            }
        }
    }

    /// Flip the alternating path root — u — v — root.
    fn augment_two_sides(&mut self, u: usize, v: usize) {
        let mut pairs = vec![(u, v)];
        self.trace_path(u, None, &mut pairs);
        self.trace_path(v, None, &mut pairs);
        for (a, b) in pairs {
            self.mate[a] = Some(b);
            self.mate[b] = Some(a);
        }
    }

    /// Grow one forest; augment along the first cross-tree even–even
    /// edge. Returns whether an augmentation happened.
    fn find_and_augment(&mut self) -> bool {
        let n = self.g.vertex_count();
        self.bases.reset();
        for i in 0..n {
            self.parent[i] = None;
            self.label[i] = UNLABELED;
            self.bridge[i] = None;
        }

        let mut queue: Vec<usize> = Vec::with_capacity(n);
        for v in 0..n {
            if self.mate[v].is_none() {
                self.label[v] = EVEN;
                queue.push(v);
            }
        }

        let g = self.g;
        let mut qi = 0;
        while qi < queue.len() {
            let u = queue[qi];
            qi += 1;

            let bu = self.bases.find(u);
            if self.label[bu] != EVEN {
                continue;
            }

            for &v in g.neighbors(u) {
                let bu = self.bases.find(u);
                let bv = self.bases.find(v);
                if bu == bv || self.mate[u] == Some(v) {
                    continue;
                }

                if self.label[bv] == UNLABELED {
                    // Grow: v is matched, else it would be a root.
                    self.label[v] = ODD;
                    self.parent[v] = Some(u);
                    let w = self.mate[v].expect("unlabeled non-root is matched");
                    self.label[w] = EVEN;
                    queue.push(w);
                } else if self.label[bv] == EVEN {
                    let lca =
                        self.lca_tags
                            .lca(&mut self.bases, &self.mate, &self.parent, u, v);
                    match lca {
                        Some(b) => {
                            self.shrink_path(b, u, v, &mut queue);
                            self.shrink_path(b, v, u, &mut queue);
                        }
                        None => {
                            self.augment_two_sides(u, v);
                            return true;
                        }
                    }
                }
                // ODD: ignore.
            }
        }
        false
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

    #[test]
    fn empty_and_trivial_graphs() {
        check(0, &[], 0);
        check(2, &[], 0);
        check(3, &[(1, 2)], 1);
    }

    #[test]
    fn warm_starts_do_not_change_the_size() {
        let edges = [(0, 1), (1, 2), (2, 3), (3, 4), (4, 0), (2, 5), (0, 6)];
        let g = Graph::from_edges(7, &edges);
        let cold = GabowSimple::new(&g).maximum_matching(Warmstart::Off);
        for ws in [Warmstart::Naive, Warmstart::MinDegree] {
            let mut engine = GabowSimple::new(&g);
            let warm = engine.maximum_matching(ws);
            assert_eq!(warm.len(), cold.len());
            assert!(engine.seeded() <= warm.len());
            assert!(validate(&g, &warm).passed());
        }
    }
}

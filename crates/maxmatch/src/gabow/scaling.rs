//! Gabow's scaling engine: level-structured search, O(E·√V) target.
//!
//! Phase 1 runs the forest search level by level: edges are filed into
//! Δ-indexed buckets and drained in order, so every tree vertex is
//! reached at its true alternating distance. Blossom contractions feed a
//! second, *deferred* union-find (`dbases`) whose unions are applied only
//! once the current bucket is empty — components of `dbases` are exactly
//! the blossoms of the contracted graph H at the Δ where the first
//! shortest augmenting path appeared.
//!
//! Phase 2 finds a maximal set of vertex-disjoint shortest augmenting
//! paths in H by iterative DFS with its own one-shot contraction
//! (`db2`), then unfolds every H-edge back to G through the recorded
//! bridges and flips all of them.

use crate::graph::{collect_matching, Graph, Matching};
use crate::greedy::{seed_matching, Warmstart};
use crate::lca::LcaTags;
use crate::levels::Buckets;
use crate::union_find::UnionFind;

const UNLABELED: u8 = 0;
const EVEN: u8 = 1;
const ODD: u8 = 2;

/// Scaling engine over a borrowed graph.
pub struct GabowScaling<'a> {
    g: &'a Graph,
    n: usize,
    mate: Vec<Option<usize>>,

    // Phase 1 state.
    label: Vec<u8>,
    parent: Vec<Option<usize>>,
    bridge: Vec<Option<(usize, usize)>>,
    bases: UnionFind,
    dbases: UnionFind,
    level_queue: Buckets<(usize, usize)>,
    lca_tags: LcaTags,
    in_tree: Vec<bool>,
    tree_nodes: Vec<usize>,
    delta: usize,

    // Phase 2 state over H.
    rep: Vec<usize>,
    mate_h: Vec<Option<usize>>,
    label_h: Vec<u8>,
    parent_h: Vec<Option<(usize, usize)>>, // (inside, outside) G-endpoints
    bridge_h: Vec<Option<(usize, usize)>>, // (scanning side, entered side)
    even_time_h: Vec<usize>,
    t_h: usize,
    db2: UnionFind,
    contracted_into: Vec<Vec<usize>>,

    seeded: usize,
}

/// Convenience: run the engine without a warm start.
pub fn maximum_matching(g: &Graph) -> Matching {
    GabowScaling::new(g).maximum_matching(Warmstart::Off)
}

#[derive(Clone, Copy)]
struct HFrame {
    vh: usize,
    ci: usize,
    ai: usize,
}

impl HFrame {
    fn new(vh: usize) -> Self {
        HFrame { vh, ci: 0, ai: 0 }
    }
}

#[derive(Clone, Copy)]
struct TraceHFrame {
    vh: usize,
    stop: usize,
    phase: u8,
    bridge: (usize, usize),
    side_b: usize,
}

#[derive(Clone, Copy)]
struct UnfoldFrame {
    v: usize,
    stop: usize,
    phase: u8,
    bridge: (usize, usize),
}

impl<'a> GabowScaling<'a> {
    pub fn new(g: &'a Graph) -> Self {
        let n = g.vertex_count();
        GabowScaling {
            g,
            n,
            mate: vec![None; n],
            label: vec![UNLABELED; n],
            parent: vec![None; n],
            bridge: vec![None; n],
            bases: UnionFind::new(n),
            dbases: UnionFind::new(n),
            level_queue: Buckets::new(),
            lca_tags: LcaTags::new(n),
            in_tree: vec![false; n],
            tree_nodes: Vec::new(),
            delta: 0,
            rep: (0..n).collect(),
            mate_h: vec![None; n],
            label_h: vec![UNLABELED; n],
            parent_h: vec![None; n],
            bridge_h: vec![None; n],
            even_time_h: vec![0; n],
            t_h: 0,
            db2: UnionFind::new(n),
            contracted_into: vec![Vec::new(); n],
            seeded: 0,
        }
    }

    #[inline]
    pub fn seeded(&self) -> usize {
        self.seeded
    }

    pub fn maximum_matching(&mut self, warmstart: Warmstart) -> Matching {
        self.seeded = seed_matching(self.g, &mut self.mate, warmstart);
        let mut phases = 0u32;
        while self.phase_1() {
            self.phase_2();
            phases += 1;
            tracing::debug!(
                phases,
                size = self.mate.iter().filter(|m| m.is_some()).count() / 2,
                "phase complete"
            );
        }
        collect_matching(&self.mate)
    }

    /// File edge `(from, w)` into the bucket its level class dictates.
    fn file_edge(&mut self, from: usize, w: usize, delta: usize) {
        let bw = self.bases.find(w);
        match self.label[bw] {
            ODD => {}
            UNLABELED => self.level_queue.push(delta + 1, (from, w)),
            _ => self.level_queue.push(delta, (from, w)),
        }
    }

    /// Path contraction with deferred dbase unions (applied by the
    /// caller once the current Δ bucket is drained).
    fn shrink_path(
        &mut self,
        b: usize,
        x: usize,
        y: usize,
        dunions: &mut Vec<(usize, usize)>,
    ) {
        let mut v = self.bases.find(x);
        while v != b {
            self.bases.union_into(v, b);
            dunions.push((v, b));
            let mv = self.mate[v].expect("cycle vertex below the base is matched");
            self.bases.union_into(mv, b);
            dunions.push((mv, b));
            self.bridge[mv] = Some((x, y));
            let delta = self.delta;
            for i in 0..self.g.neighbors(mv).len() {
                let w = self.g.neighbors(mv)[i];
                if self.mate[mv] == Some(w) {
                    continue;
                }
                self.file_edge(mv, w, delta);
            }
            let pm = self.parent[mv].expect("odd vertex has a tree parent");
            v = self.bases.find(pm);
        }
        dunions.push((b, b));
    }

    /// Level-by-level forest search. Returns true when at least one
    /// shortest augmenting path exists; H is then set up for Phase 2.
    fn phase_1(&mut self) -> bool {
        let n = self.n;
        self.delta = 0;
        self.tree_nodes.clear();
        self.level_queue.clear();
        let mut dunions: Vec<(usize, usize)> = Vec::new();

        self.bases.reset();
        self.dbases.reset();
        for i in 0..n {
            self.label[i] = UNLABELED;
            self.parent[i] = None;
            self.bridge[i] = None;
            self.in_tree[i] = false;
        }

        // Exposed vertices are even roots at Δ = 0.
        for v in 0..n {
            if self.mate[v].is_none() {
                self.label[v] = EVEN;
                self.in_tree[v] = true;
                self.tree_nodes.push(v);
                for i in 0..self.g.neighbors(v).len() {
                    let u = self.g.neighbors(v)[i];
                    self.file_edge(v, u, 0);
                }
            }
        }

        let mut found_sap = false;

        while self.delta <= n {
            while let Some((mut z, mut u)) = self.level_queue.pop(self.delta) {
                let mut bz = self.bases.find(z);
                let mut bu = self.bases.find(u);
                if self.label[bz] != EVEN {
                    std::mem::swap(&mut z, &mut u);
                    std::mem::swap(&mut bz, &mut bu);
                }
                if bz == bu || self.label[bz] != EVEN {
                    continue;
                }
                if self.mate[z] == Some(u) || self.label[bu] == ODD {
                    continue;
                }

                if self.label[bu] == UNLABELED {
                    let Some(mv) = self.mate[u] else { continue };
                    self.parent[u] = Some(z);
                    self.parent[mv] = Some(u);
                    self.label[u] = ODD;
                    self.label[mv] = EVEN;
                    self.in_tree[u] = true;
                    self.in_tree[mv] = true;
                    self.tree_nodes.push(u);
                    self.tree_nodes.push(mv);
                    let delta = self.delta;
                    for i in 0..self.g.neighbors(mv).len() {
                        let w = self.g.neighbors(mv)[i];
                        if self.mate[mv] == Some(w) {
                            continue;
                        }
                        self.file_edge(mv, w, delta);
                    }
                } else {
                    // Even–even: blossom or shortest augmenting path.
                    let lca =
                        self.lca_tags
                            .lca(&mut self.bases, &self.mate, &self.parent, z, u);
                    match lca {
                        Some(b) => {
                            self.shrink_path(b, z, u, &mut dunions);
                            self.shrink_path(b, u, z, &mut dunions);
                        }
                        None => found_sap = true,
                    }
                }
            }

            if found_sap {
                // Freeze H: component membership and the matching on H.
                let tn = std::mem::take(&mut self.tree_nodes);
                for &v in &tn {
                    let db = self.dbases.find(v);
                    self.contracted_into[db].push(v);
                    self.mate_h[v] = None;
                }
                for &u in &tn {
                    let uh = self.dbases.find(u);
                    if let Some(mv) = self.mate[u] {
                        if self.in_tree[mv] {
                            let vh = self.dbases.find(mv);
                            if uh != vh {
                                self.mate_h[uh] = Some(vh);
                                self.mate_h[vh] = Some(uh);
                            }
                        }
                    }
                }
                self.tree_nodes = tn;
                return true;
            }

            // Bucket Δ drained: apply the deferred unions now.
            for (a, b) in dunions.drain(..) {
                if a == b {
                    self.dbases.make_rep(a);
                } else {
                    self.dbases.union(a, b);
                }
            }
            self.delta += 1;
        }
        false
    }

    /// Iterative DFS in H from the even root `root_vh`; returns the
    /// exposed odd H-node closing an augmenting path, if any.
    fn find_ap_hg(&mut self, root_vh: usize) -> Option<usize> {
        let mut stk = vec![HFrame::new(root_vh)];
        while !stk.is_empty() {
            let idx = stk.len() - 1;
            let vh = stk[idx].vh;
            let mut pushed = false;

            'scan: while stk[idx].ci < self.contracted_into[vh].len() {
                let v = self.contracted_into[vh][stk[idx].ci];
                while stk[idx].ai < self.g.neighbors(v).len() {
                    let w = self.g.neighbors(v)[stk[idx].ai];
                    stk[idx].ai += 1;

                    if !self.in_tree[w] {
                        continue;
                    }
                    if self.mate[v] == Some(w) {
                        continue;
                    }
                    if self.dbases.find(v) == self.dbases.find(w) {
                        continue;
                    }
                    let uh = self.db2.find(self.rep[w]);
                    if self.mate_h[vh] == Some(uh) {
                        continue;
                    }
                    if self.label_h[uh] == ODD {
                        continue;
                    }

                    if self.label_h[uh] == UNLABELED {
                        self.label_h[uh] = ODD;
                        self.parent_h[uh] = Some((w, v));
                        match self.mate_h[uh] {
                            None => return Some(uh),
                            Some(muh) => {
                                self.label_h[muh] = EVEN;
                                self.even_time_h[muh] = self.t_h;
                                self.t_h += 1;
                                stk.push(HFrame::new(muh));
                                pushed = true;
                                break 'scan;
                            }
                        }
                    } else {
                        // Even–even inside one Phase-2 tree: contract the
                        // H-cycle into the older even node.
                        let bh = self.db2.find(vh);
                        let zh = self.db2.find(uh);
                        if self.even_time_h[bh] < self.even_time_h[zh] {
                            let mut odd_nodes = Vec::new();
                            let mut endpoints = Vec::new();
                            let mut cur = zh;
                            while cur != bh {
                                endpoints.push(cur);
                                let mc = self.mate_h[cur]
                                    .expect("non-root H-cycle node is matched");
                                endpoints.push(mc);
                                odd_nodes.push(mc);
                                let (ps, pt) =
                                    self.parent_h[mc].expect("H tree node has a parent edge");
                                let next = if self.rep[ps] == mc {
                                    self.rep[pt]
                                } else {
                                    self.rep[ps]
                                };
                                cur = self.db2.find(next);
                            }
                            for &nd in &endpoints {
                                self.db2.union(nd, bh);
                            }
                            self.db2.make_rep(bh);
                            for &mc in &odd_nodes {
                                self.bridge_h[mc] = Some((v, w));
                            }
                            if !odd_nodes.is_empty() {
                                for &mc in odd_nodes.iter().rev() {
                                    stk.push(HFrame::new(mc));
                                }
                                pushed = true;
                                break 'scan;
                            }
                        }
                    }
                }
                stk[idx].ci += 1;
                stk[idx].ai = 0;
            }

            if !pushed {
                stk.pop();
            }
        }
        None
    }

    /// Collect the non-matching G-edges along the H-path from `start_vh`
    /// back to `stop`, unwinding H-blossoms through their bridges.
    fn trace_h_path(
        &mut self,
        start_vh: usize,
        stop: usize,
        edges_out: &mut Vec<(usize, usize)>,
    ) {
        let mut stk = vec![TraceHFrame {
            vh: start_vh,
            stop,
            phase: 0,
            bridge: (0, 0),
            side_b: 0,
        }];
        while !stk.is_empty() {
            let idx = stk.len() - 1;
            let f = stk[idx];
            if f.vh == f.stop {
                stk.pop();
                continue;
            }
            if self.label_h[f.vh] == EVEN {
                let mvh = self.mate_h[f.vh].expect("even non-root H-node is matched");
                let (ps, pt) = self.parent_h[mvh].expect("H tree node has a parent edge");
                edges_out.push((ps, pt));
                stk[idx].vh = if self.rep[ps] == mvh {
                    self.rep[pt]
                } else {
                    self.rep[ps]
                };
                continue;
            }
            match f.phase {
                0 => {
                    let (bv, bw) = self.bridge_h[f.vh]
                        .expect("odd H-node was absorbed through a bridge");
                    // Walk down the entered side to the mate, cross the
                    // bridge, then walk the scanning side to the stop.
                    let side_a = self.rep[bw];
                    let side_b = self.rep[bv];
                    let mt = match self.mate_h[f.vh] {
                        Some(m) => self.rep[m],
                        None => f.vh,
                    };
                    stk[idx].bridge = (bv, bw);
                    stk[idx].side_b = side_b;
                    stk[idx].phase = 1;
                    stk.push(TraceHFrame {
                        vh: side_a,
                        stop: mt,
                        phase: 0,
                        bridge: (0, 0),
                        side_b: 0,
                    });
                }
                1 => {
                    edges_out.push(f.bridge);
                    stk[idx].phase = 2;
                    stk.push(TraceHFrame {
                        vh: f.side_b,
                        stop: f.stop,
                        phase: 0,
                        bridge: (0, 0),
                        side_b: 0,
                    });
                }
                _ => {
                    stk.pop();
                }
            }
        }
    }

    /// Unfold the alternating walk from `start` to its component base
    /// inside a single H-node, through Phase-1 bridges.
    fn find_path_in_g(&mut self, start: usize, stop: usize, pairs: &mut Vec<(usize, usize)>) {
        let mut stk = vec![UnfoldFrame {
            v: start,
            stop,
            phase: 0,
            bridge: (0, 0),
        }];
        while !stk.is_empty() {
            let idx = stk.len() - 1;
            let f = stk[idx];
            if f.v == f.stop {
                stk.pop();
                continue;
            }
            match f.phase {
                0 => {
                    if self.label[f.v] == EVEN {
                        let mv = self.mate[f.v].expect("even non-base vertex is matched");
                        let pm = self.parent[mv].expect("odd vertex has a tree parent");
                        pairs.push((mv, pm));
                        stk[idx].v = pm;
                    } else {
                        let (sb, tb) =
                            self.bridge[f.v].expect("odd vertex was absorbed through a bridge");
                        let mv = self.mate[f.v].expect("bridged vertex is matched");
                        stk[idx].bridge = (sb, tb);
                        stk[idx].phase = 1;
                        stk.push(UnfoldFrame {
                            v: sb,
                            stop: mv,
                            phase: 0,
                            bridge: (0, 0),
                        });
                    }
                }
                1 => {
                    pairs.push(f.bridge);
                    stk[idx].phase = 2;
                    let (_, tb) = f.bridge;
                    stk.push(UnfoldFrame {
                        v: tb,
                        stop: f.stop,
                        phase: 0,
                        bridge: (0, 0),
                    });
                }
                _ => {
                    stk.pop();
                }
            }
        }
    }

    /// Unfold every H-edge of one augmenting path to G and flip.
    fn augment_g(&mut self, h_edges: &[(usize, usize)]) {
        let mut pairs: Vec<(usize, usize)> = Vec::new();
        for &(u, v) in h_edges {
            pairs.push((u, v));
            let ru = self.rep[u];
            self.find_path_in_g(u, ru, &mut pairs);
            let rv = self.rep[v];
            self.find_path_in_g(v, rv, &mut pairs);
        }
        for (a, b) in pairs {
            self.mate[a] = Some(b);
            self.mate[b] = Some(a);
        }
    }

    /// Find all vertex-disjoint shortest augmenting paths in H, unfold
    /// each to G, and augment.
    fn phase_2(&mut self) {
        let tn = self.tree_nodes.clone();
        for &v in &tn {
            let db = self.dbases.find(v);
            self.rep[v] = db;
            self.label_h[v] = UNLABELED;
            self.parent_h[v] = None;
            self.bridge_h[v] = None;
            self.even_time_h[v] = 0;
        }
        self.db2.reset();
        self.t_h = 0;

        let mut all_paths: Vec<Vec<(usize, usize)>> = Vec::new();
        for &vh in &tn {
            if vh != self.rep[vh] {
                continue;
            }
            if self.label_h[vh] != UNLABELED || self.mate_h[vh].is_some() {
                continue;
            }
            self.label_h[vh] = EVEN;
            self.even_time_h[vh] = self.t_h;
            self.t_h += 1;

            if let Some(free_node) = self.find_ap_hg(vh) {
                let mut h_edges = Vec::new();
                let (ps, pt) = self.parent_h[free_node].expect("free H-node has a parent edge");
                h_edges.push((ps, pt));
                let next = if self.rep[ps] == free_node {
                    self.rep[pt]
                } else {
                    self.rep[ps]
                };
                self.trace_h_path(next, vh, &mut h_edges);
                all_paths.push(h_edges);
            }
        }

        for path in &all_paths {
            self.augment_g(path);
        }

        for &v in &tn {
            let db = self.dbases.find(v);
            self.contracted_into[db].clear();
            self.contracted_into[v].clear();
            self.mate_h[v] = None;
        }
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
        check(5, &[], 0);
        check(5, &[(0, 4)], 1);
    }

    #[test]
    fn long_even_path_needs_level_structure() {
        // Path on 8 vertices: perfect matching, found across levels.
        let edges: Vec<(usize, usize)> = (0..7).map(|i| (i, i + 1)).collect();
        check(8, &edges, 4);
    }

    #[test]
    fn warm_starts_do_not_change_the_size() {
        let edges = [(0, 1), (1, 2), (2, 3), (3, 4), (4, 0), (2, 5), (0, 6)];
        let g = Graph::from_edges(7, &edges);
        let cold = GabowScaling::new(&g).maximum_matching(Warmstart::Off);
        for ws in [Warmstart::Naive, Warmstart::MinDegree] {
            let warm = GabowScaling::new(&g).maximum_matching(ws);
            assert_eq!(warm.len(), cold.len());
            assert!(validate(&g, &warm).passed());
        }
    }
}

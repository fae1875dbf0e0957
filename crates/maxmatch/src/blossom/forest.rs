//! Edmonds' blossom algorithm, forest variant with full blossom records.
//!
//! Per stage, every exposed vertex roots an S-tree and one FIFO queue
//! drives the whole forest. Blossoms are first-class: an arena of ids in
//! `[n, 2n)` holds the cyclic sub-blossom list, the vertex pairs crossing
//! between consecutive sub-blossoms, the base vertex, and the enclosing
//! blossom. Contraction absorbs T-vertices into S and re-queues them;
//! augmentation walks each blossom cycle in the parity-chosen direction
//! and rotates the cycle so the entry vertex becomes the new base; at the
//! end of a stage every record is dissolved so `base[v] = v` again.
//!
//! Blossom augmentation and expansion run on explicit frame stacks —
//! nesting depth is unbounded and must not consume native stack.

use std::collections::VecDeque;

use crate::graph::{collect_matching, Graph, Matching};

const FREE: u8 = 0;
const S: u8 = 1;
const T: u8 = 2;
// Breadcrumb stamp used while tracing two tree paths; S | 4.
const CRUMB: u8 = 5;

/// A label edge `(from, to)`: `from` is the vertex on the root side of
/// the edge through which the labeled blossom was reached, `to` the
/// endpoint inside it. Roots carry no label edge.
type LabelEdge = Option<(usize, usize)>;

/// Forest Edmonds engine over a borrowed graph.
pub struct BlossomForest<'a> {
    g: &'a Graph,
    n: usize,
    mate: Vec<Option<usize>>,
    // Arrays below are indexed by blossom id (vertices are ids < n,
    // non-trivial blossoms ids in [n, 2n)).
    label: Vec<u8>,
    label_edge: Vec<LabelEdge>,
    blossom_parent: Vec<Option<usize>>,
    blossom_base: Vec<usize>,
    childs: Vec<Vec<usize>>,
    cyc_edges: Vec<Vec<(usize, usize)>>,
    in_blossom: Vec<usize>,
    free_ids: Vec<usize>,
    allocated: Vec<usize>,
    queue: VecDeque<usize>,
}

/// Convenience: run the forest engine over `g`.
pub fn maximum_matching(g: &Graph) -> Matching {
    BlossomForest::new(g).maximum_matching()
}

#[derive(Clone, Copy)]
enum AugPhase {
    Enter,
    Setup,
    Loop,
    AfterFirst,
    AfterSecond,
}

/// One pending blossom-augmentation: blossom `b`, entry vertex `v`.
#[derive(Clone, Copy)]
struct AugFrame {
    b: usize,
    v: usize,
    t: usize,
    i: usize,
    j: i64,
    jstep: i64,
    eu: usize,
    ev: usize,
    phase: AugPhase,
}

impl AugFrame {
    fn new(b: usize, v: usize) -> Self {
        AugFrame {
            b,
            v,
            t: 0,
            i: 0,
            j: 0,
            jstep: 0,
            eu: 0,
            ev: 0,
            phase: AugPhase::Enter,
        }
    }
}

#[inline]
fn wrap(j: i64, k: i64) -> usize {
    (((j % k) + k) % k) as usize
}

impl<'a> BlossomForest<'a> {
    pub fn new(g: &'a Graph) -> Self {
        let n = g.vertex_count();
        BlossomForest {
            g,
            n,
            mate: vec![None; n],
            label: vec![FREE; 2 * n],
            label_edge: vec![None; 2 * n],
            blossom_parent: vec![None; 2 * n],
            blossom_base: (0..n).chain(0..n).collect(),
            childs: vec![Vec::new(); 2 * n],
            cyc_edges: vec![Vec::new(); 2 * n],
            in_blossom: (0..n).collect(),
            free_ids: Vec::new(),
            allocated: Vec::new(),
            queue: VecDeque::new(),
        }
    }

    /// Stages until a stage finds no augmenting path.
    pub fn maximum_matching(&mut self) -> Matching {
        let mut stage = 0u32;
        loop {
            let augmented = self.run_stage();
            self.expand_all();
            stage += 1;
            tracing::debug!(
                stage,
                size = self.mate.iter().filter(|m| m.is_some()).count() / 2,
                "stage complete"
            );
            if !augmented {
                break;
            }
        }
        collect_matching(&self.mate)
    }

    /// One stage: reset, grow the forest, stop at the first augmentation.
    fn run_stage(&mut self) -> bool {
        self.reset_stage();
        for v in 0..self.n {
            if self.mate[v].is_none() {
                self.assign_label(v, S, None);
            }
        }

        let g = self.g;
        while let Some(v) = self.queue.pop_front() {
            for &w in g.neighbors(v) {
                if self.in_blossom[v] == self.in_blossom[w] {
                    continue;
                }
                let bw = self.in_blossom[w];
                match self.label[bw] {
                    FREE => {
                        // Unlabeled means matched: exposed vertices all
                        // became roots at stage start.
                        self.assign_label(w, T, Some((v, w)));
                    }
                    S => match self.scan_blossom(v, w) {
                        Some(base) => self.add_blossom(base, v, w),
                        None => {
                            self.augment_matching(v, w);
                            return true;
                        }
                    },
                    _ => {} // T: ignore
                }
            }
        }
        false
    }

    fn reset_stage(&mut self) {
        let n = self.n;
        for i in 0..2 * n {
            self.label[i] = FREE;
            self.label_edge[i] = None;
            self.blossom_parent[i] = None;
        }
        for v in 0..n {
            self.in_blossom[v] = v;
            self.blossom_base[v] = v;
        }
        self.free_ids.clear();
        self.free_ids.extend(n..2 * n);
        self.allocated.clear();
        self.queue.clear();
    }

    #[inline]
    fn base_vertex(&self, b: usize) -> usize {
        self.blossom_base[b]
    }

    /// Original vertices inside blossom `b`, in cycle order.
    fn leaves(&self, b: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![b];
        while let Some(t) = stack.pop() {
            if t < self.n {
                out.push(t);
            } else {
                stack.extend(self.childs[t].iter().rev());
            }
        }
        out
    }

    /// Label the top-level blossom containing `w`; S queues its leaves,
    /// T immediately labels the base's mate S through the matched edge.
    fn assign_label(&mut self, w: usize, t: u8, edge: LabelEdge) {
        let b = self.in_blossom[w];
        debug_assert!(self.label[w] == FREE && self.label[b] == FREE);
        self.label[w] = t;
        self.label[b] = t;
        self.label_edge[w] = edge;
        self.label_edge[b] = edge;
        if t == S {
            for leaf in self.leaves(b) {
                self.queue.push_back(leaf);
            }
        } else {
            let base = self.base_vertex(b);
            if let Some(m) = self.mate[base] {
                self.assign_label(m, S, Some((base, m)));
            }
        }
    }

    /// Trace both tree paths root-ward, dropping breadcrumbs; returns the
    /// base of the first blossom both paths share, or `None` when the
    /// paths end at different roots (augmenting path).
    fn scan_blossom(&mut self, v: usize, w: usize) -> Option<usize> {
        let mut path = Vec::new();
        let mut base = None;
        let mut cur = Some(v);
        let mut other = Some(w);
        while let Some(x) = cur {
            let b = self.in_blossom[x];
            if self.label[b] & 4 != 0 {
                base = Some(self.base_vertex(b));
                break;
            }
            debug_assert_eq!(self.label[b], S);
            path.push(b);
            self.label[b] = CRUMB;
            // Two tree steps: over the matched edge into the T-blossom,
            // then over its label edge into the next S-blossom.
            let next = match self.label_edge[b] {
                None => None,
                Some((t, _)) => {
                    let bt = self.in_blossom[t];
                    debug_assert_eq!(self.label[bt], T);
                    let (up, _) = self.label_edge[bt].expect("T-blossom has a label edge");
                    Some(up)
                }
            };
            if other.is_some() {
                cur = other;
                other = next;
            } else {
                cur = next;
            }
        }
        for b in path {
            self.label[b] = S;
        }
        base
    }

    /// Contract the cycle closed by the S–S edge `(v, w)` with the given
    /// base vertex into a fresh blossom record.
    fn add_blossom(&mut self, base: usize, v: usize, w: usize) {
        let bb = self.in_blossom[base];
        let mut bv = self.in_blossom[v];
        let mut bw = self.in_blossom[w];

        let b = self.free_ids.pop().expect("blossom arena exhausted");
        self.allocated.push(b);
        self.blossom_base[b] = base;
        self.blossom_parent[b] = None;
        self.blossom_parent[bb] = Some(b);

        let mut path = Vec::new();
        let mut eds: Vec<(usize, usize)> = Vec::new();

        // Chain from v's blossom back to the base.
        while bv != bb {
            self.blossom_parent[bv] = Some(b);
            path.push(bv);
            let le = self.label_edge[bv].expect("cycle blossom has a label edge");
            eds.push(le);
            bv = self.in_blossom[le.0];
        }
        path.push(bb);
        path.reverse();
        eds.reverse();
        eds.push((v, w));

        // Chain from w's blossom back to the base; label edges flip
        // orientation because the cycle is walked the other way here.
        while bw != bb {
            self.blossom_parent[bw] = Some(b);
            path.push(bw);
            let le = self.label_edge[bw].expect("cycle blossom has a label edge");
            eds.push((le.1, le.0));
            bw = self.in_blossom[le.0];
        }

        debug_assert_eq!(path.len() % 2, 1);
        debug_assert_eq!(path.len(), eds.len());
        self.childs[b] = path;
        self.cyc_edges[b] = eds;

        debug_assert_eq!(self.label[bb], S);
        self.label[b] = S;
        self.label_edge[b] = self.label_edge[bb];

        // Absorbed T-vertices are now reachable on even paths: relabel
        // their leaves S by queueing them.
        for leaf in self.leaves(b) {
            if self.label[self.in_blossom[leaf]] == T {
                self.queue.push_back(leaf);
            }
            self.in_blossom[leaf] = b;
        }
    }

    /// Flip matched edges along the alternating cycle portion of blossom
    /// `b` from entry vertex `v` to the base, recursively through nested
    /// sub-blossoms, then rotate the cycle so `v` is the new base.
    fn augment_blossom(&mut self, b: usize, v: usize) {
        let mut stack = vec![AugFrame::new(b, v)];
        while !stack.is_empty() {
            let idx = stack.len() - 1;
            let f = stack[idx];
            match f.phase {
                AugPhase::Enter => {
                    // Bubble up to the immediate child of b containing v.
                    let mut t = f.v;
                    while self.blossom_parent[t] != Some(f.b) {
                        t = self.blossom_parent[t].expect("entry vertex lies inside the blossom");
                    }
                    stack[idx].t = t;
                    stack[idx].phase = AugPhase::Setup;
                    if t >= self.n {
                        stack.push(AugFrame::new(t, f.v));
                    }
                }
                AugPhase::Setup => {
                    let k = self.childs[f.b].len() as i64;
                    let i = self
                        .childs[f.b]
                        .iter()
                        .position(|&c| c == f.t)
                        .expect("entry child is on the blossom cycle");
                    // Odd entry position walks forward (wrapping), even
                    // walks backward; either way the walk ends at the base.
                    let (j, jstep) = if i % 2 == 1 {
                        (i as i64 - k, 1)
                    } else {
                        (i as i64, -1)
                    };
                    stack[idx].i = i;
                    stack[idx].j = j;
                    stack[idx].jstep = jstep;
                    stack[idx].phase = AugPhase::Loop;
                }
                AugPhase::Loop => {
                    if f.j == 0 {
                        // Entry child becomes the new base.
                        self.childs[f.b].rotate_left(f.i);
                        self.cyc_edges[f.b].rotate_left(f.i);
                        let c0 = self.childs[f.b][0];
                        self.blossom_base[f.b] = self.base_vertex(c0);
                        debug_assert_eq!(self.blossom_base[f.b], f.v);
                        stack.pop();
                    } else {
                        let k = self.childs[f.b].len() as i64;
                        let j1 = f.j + f.jstep;
                        let (eu, ev) = if f.jstep == 1 {
                            self.cyc_edges[f.b][wrap(j1, k)]
                        } else {
                            let (a, c) = self.cyc_edges[f.b][wrap(j1 - 1, k)];
                            (c, a)
                        };
                        stack[idx].j = j1;
                        stack[idx].eu = eu;
                        stack[idx].ev = ev;
                        stack[idx].phase = AugPhase::AfterFirst;
                        let t1 = self.childs[f.b][wrap(j1, k)];
                        if t1 >= self.n {
                            stack.push(AugFrame::new(t1, eu));
                        }
                    }
                }
                AugPhase::AfterFirst => {
                    let k = self.childs[f.b].len() as i64;
                    let j2 = f.j + f.jstep;
                    stack[idx].j = j2;
                    stack[idx].phase = AugPhase::AfterSecond;
                    let t2 = self.childs[f.b][wrap(j2, k)];
                    if t2 >= self.n {
                        stack.push(AugFrame::new(t2, f.ev));
                    }
                }
                AugPhase::AfterSecond => {
                    self.mate[f.eu] = Some(f.ev);
                    self.mate[f.ev] = Some(f.eu);
                    stack[idx].phase = AugPhase::Loop;
                }
            }
        }
    }

    /// Flip matched status along the augmenting path through the S–S
    /// edge `(v, w)`, tracing each side back to its root.
    fn augment_matching(&mut self, v: usize, w: usize) {
        for (mut s, mut p) in [(v, w), (w, v)] {
            loop {
                let bs = self.in_blossom[s];
                debug_assert_eq!(self.label[bs], S);
                if bs >= self.n {
                    self.augment_blossom(bs, s);
                }
                self.mate[s] = Some(p);

                match self.label_edge[bs] {
                    None => break, // reached a root
                    Some((t, _)) => {
                        // t is the base vertex of the T-blossom above.
                        let bt = self.in_blossom[t];
                        debug_assert_eq!(self.label[bt], T);
                        let (up, inside) =
                            self.label_edge[bt].expect("T-blossom has a label edge");
                        if bt >= self.n {
                            self.augment_blossom(bt, inside);
                        }
                        self.mate[inside] = Some(up);
                        s = up;
                        p = inside;
                    }
                }
            }
        }
    }

    /// Dissolve every blossom allocated this stage, restoring
    /// `in_blossom[v] = v` through arbitrary nesting.
    fn expand_all(&mut self) {
        let allocated = std::mem::take(&mut self.allocated);
        let mut stack: Vec<usize> = allocated
            .into_iter()
            .filter(|&b| self.blossom_parent[b].is_none())
            .collect();
        while let Some(b) = stack.pop() {
            let kids = std::mem::take(&mut self.childs[b]);
            for s in kids {
                self.blossom_parent[s] = None;
                if s < self.n {
                    self.in_blossom[s] = s;
                } else {
                    stack.push(s);
                }
            }
            self.cyc_edges[b].clear();
            self.label_edge[b] = None;
            self.label[b] = FREE;
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
        check(4, &[], 0);
        check(4, &[(2, 3)], 1);
    }

    #[test]
    fn augmenting_through_a_contracted_blossom() {
        // Odd cycle 0-1-2-3-4 contracts with base 4; the pendant vertex
        // reaches it at a non-base cycle vertex, so augmentation walks
        // the cycle and rotates the base. The two pendant positions
        // exercise both walk directions (even and odd entry index).
        let m = check(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0), (3, 5)], 3);
        assert_eq!(m, vec![(0, 4), (1, 2), (3, 5)]);
        let m = check(6, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0), (0, 5)], 3);
        assert_eq!(m, vec![(0, 5), (1, 2), (3, 4)]);
    }

    #[test]
    fn chained_blossoms() {
        // Two odd cycles joined by a bridge edge; forces consecutive
        // contractions in one stage.
        let edges = [
            (0, 1),
            (1, 2),
            (2, 0),
            (2, 3),
            (3, 4),
            (4, 5),
            (5, 3),
            (5, 6),
        ];
        check(7, &edges, 3);
    }
}

//! Hopcroft-Karp: maximum bipartite matching in O(E·√V).
//!
//! Each stage is one layered BFS from every exposed left vertex (layer
//! distances stop at the first exposed right vertex) followed by DFS
//! passes that consume vertex-disjoint shortest augmenting paths. The
//! DFS is iterative with per-stage adjacency cursors so path length is
//! never bounded by native stack.

use crate::graph::{BipartiteGraph, Matching};

const INF: u32 = u32::MAX;

/// Bipartite warm-start selection, mirroring the general-graph modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BipartiteWarmstart {
    #[default]
    Off,
    Naive,
    MinDegree,
}

/// Hopcroft-Karp engine over a borrowed bipartite graph.
pub struct HopcroftKarp<'a> {
    g: &'a BipartiteGraph,
    pair_left: Vec<Option<usize>>,
    pair_right: Vec<Option<usize>>,
    // dist is indexed by left vertex; the extra slot is the shared
    // sentinel standing in for "exposed right vertex".
    dist: Vec<u32>,
    seeded: usize,
}

/// Convenience: run the engine without a warm start.
pub fn maximum_matching(g: &BipartiteGraph) -> Matching {
    HopcroftKarp::new(g).maximum_matching(BipartiteWarmstart::Off)
}

impl<'a> HopcroftKarp<'a> {
    pub fn new(g: &'a BipartiteGraph) -> Self {
        HopcroftKarp {
            g,
            pair_left: vec![None; g.left_count()],
            pair_right: vec![None; g.right_count()],
            dist: vec![0; g.left_count() + 1],
            seeded: 0,
        }
    }

    #[inline]
    pub fn seeded(&self) -> usize {
        self.seeded
    }

    pub fn maximum_matching(&mut self, warmstart: BipartiteWarmstart) -> Matching {
        self.seeded = match warmstart {
            BipartiteWarmstart::Off => 0,
            BipartiteWarmstart::Naive => self.seed_naive(),
            BipartiteWarmstart::MinDegree => self.seed_min_degree(),
        };

        let left = self.g.left_count();
        let mut cursor = vec![0usize; left];
        let mut stage = 0u32;
        while self.bfs() {
            cursor.fill(0);
            for u in 0..left {
                if self.pair_left[u].is_none() {
                    self.dfs(u, &mut cursor);
                }
            }
            stage += 1;
            tracing::debug!(
                stage,
                size = self.pair_left.iter().filter(|p| p.is_some()).count(),
                "stage complete"
            );
        }

        let mut matching: Matching = Vec::new();
        for u in 0..left {
            if let Some(v) = self.pair_left[u] {
                matching.push((u, v));
            }
        }
        matching.sort_unstable();
        matching
    }

    /// Layer the exposed left vertices at distance 0 and stop growing at
    /// the first layer containing an exposed right vertex.
    fn bfs(&mut self) -> bool {
        let left = self.g.left_count();
        let nil = left;
        let mut queue = Vec::new();
        let mut qi = 0;

        for u in 0..left {
            if self.pair_left[u].is_none() {
                self.dist[u] = 0;
                queue.push(u);
            } else {
                self.dist[u] = INF;
            }
        }
        self.dist[nil] = INF;

        while qi < queue.len() {
            let u = queue[qi];
            qi += 1;
            if self.dist[u] < self.dist[nil] {
                for &v in self.g.neighbors(u) {
                    let paired = self.pair_right[v].unwrap_or(nil);
                    if self.dist[paired] == INF {
                        self.dist[paired] = self.dist[u] + 1;
                        if paired != nil {
                            queue.push(paired);
                        }
                    }
                }
            }
        }
        self.dist[nil] != INF
    }

    /// Follow layer distances down to an exposed right vertex; on
    /// success flip the whole path, on failure close `u` for this stage.
    fn dfs(&mut self, root: usize, cursor: &mut [usize]) -> bool {
        let nil = self.g.left_count();
        let mut stack = vec![root];
        let mut picked: Vec<usize> = Vec::new();

        while let Some(&u) = stack.last() {
            let mut advanced = false;
            while cursor[u] < self.g.neighbors(u).len() {
                let v = self.g.neighbors(u)[cursor[u]];
                cursor[u] += 1;
                let paired = self.pair_right[v].unwrap_or(nil);
                if self.dist[paired] != self.dist[u].wrapping_add(1) {
                    continue;
                }
                if self.pair_right[v].is_none() {
                    // Exposed right endpoint: flip the path on the stack.
                    self.pair_right[v] = Some(u);
                    self.pair_left[u] = Some(v);
                    for i in (0..picked.len()).rev() {
                        let pu = stack[i];
                        let pv = picked[i];
                        self.pair_right[pv] = Some(pu);
                        self.pair_left[pu] = Some(pv);
                    }
                    return true;
                }
                picked.push(v);
                stack.push(paired);
                advanced = true;
                break;
            }
            if !advanced {
                self.dist[u] = INF;
                stack.pop();
                picked.pop();
            }
        }
        false
    }

    fn seed_naive(&mut self) -> usize {
        let mut count = 0;
        for u in 0..self.g.left_count() {
            if self.pair_left[u].is_some() {
                continue;
            }
            for &v in self.g.neighbors(u) {
                if self.pair_right[v].is_none() {
                    self.pair_left[u] = Some(v);
                    self.pair_right[v] = Some(u);
                    count += 1;
                    break;
                }
            }
        }
        count
    }

    fn seed_min_degree(&mut self) -> usize {
        let left = self.g.left_count();
        let mut right_deg = vec![0usize; self.g.right_count()];
        for u in 0..left {
            for &v in self.g.neighbors(u) {
                right_deg[v] += 1;
            }
        }
        let mut order: Vec<usize> = (0..left).collect();
        order.sort_unstable_by(|&a, &b| {
            self.g
                .neighbors(a)
                .len()
                .cmp(&self.g.neighbors(b).len())
                .then(a.cmp(&b))
        });
        let mut count = 0;
        for u in order {
            if self.pair_left[u].is_some() {
                continue;
            }
            let mut best: Option<usize> = None;
            let mut best_deg = usize::MAX;
            for &v in self.g.neighbors(u) {
                if self.pair_right[v].is_none() && right_deg[v] < best_deg {
                    best = Some(v);
                    best_deg = right_deg[v];
                }
            }
            if let Some(v) = best {
                self.pair_left[u] = Some(v);
                self.pair_right[v] = Some(u);
                count += 1;
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate_bipartite;

    fn check(l: usize, r: usize, edges: &[(usize, usize)], expected: usize) -> Matching {
        let g = BipartiteGraph::from_edges(l, r, edges);
        let m = maximum_matching(&g);
        assert_eq!(m.len(), expected, "matching size on L={l} R={r}");
        assert!(validate_bipartite(&g, &m).passed());
        m
    }

    #[test]
    fn complete_bipartite_k43() {
        let mut edges = Vec::new();
        for u in 0..4 {
            for v in 0..3 {
                edges.push((u, v));
            }
        }
        check(4, 3, &edges, 3);
    }

    #[test]
    fn single_edge_and_isolated_vertices() {
        check(3, 2, &[(1, 0)], 1);
        check(2, 2, &[], 0);
        check(0, 0, &[], 0);
    }

    #[test]
    fn augmenting_chain_is_found() {
        // 0-0, 1-{0,1}, 2-{1,2}: needs two reassignments for size 3.
        let m = check(3, 3, &[(0, 0), (1, 0), (1, 1), (2, 1), (2, 2)], 3);
        assert_eq!(m, vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn deficient_side_limits_the_matching() {
        // Three left vertices all confined to right vertex 0.
        check(3, 2, &[(0, 0), (1, 0), (2, 0)], 1);
    }

    #[test]
    fn warm_starts_do_not_change_the_size() {
        let edges = [(0, 0), (0, 1), (1, 0), (2, 1), (2, 2), (3, 2)];
        let g = BipartiteGraph::from_edges(4, 3, &edges);
        let cold = HopcroftKarp::new(&g).maximum_matching(BipartiteWarmstart::Off);
        for ws in [BipartiteWarmstart::Naive, BipartiteWarmstart::MinDegree] {
            let mut engine = HopcroftKarp::new(&g);
            let warm = engine.maximum_matching(ws);
            assert_eq!(warm.len(), cold.len());
            assert!(engine.seeded() <= warm.len());
        }
    }
}

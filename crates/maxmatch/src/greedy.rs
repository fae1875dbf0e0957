//! Greedy warm-starts for the matching engines.
//!
//! A warm start never changes the final matching size — the engines
//! augment until maximum regardless — it only shifts work out of the
//! search phases. Two modes:
//! - `Naive`: scan vertices in id order, matching each exposed vertex to
//!   its first exposed neighbor in adjacency (sort) order.
//! - `MinDegree`: scan vertices in ascending degree (ties by id),
//!   matching each to its lowest-degree exposed neighbor; among equal
//!   degrees the lowest id wins because adjacency is sorted.

use crate::graph::Graph;

/// Warm-start selection shared by the engines that support seeding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Warmstart {
    #[default]
    Off,
    Naive,
    MinDegree,
}

/// Seed `mate` in place; returns the number of pairs added.
pub fn seed_matching(g: &Graph, mate: &mut [Option<usize>], mode: Warmstart) -> usize {
    match mode {
        Warmstart::Off => 0,
        Warmstart::Naive => seed_naive(g, mate),
        Warmstart::MinDegree => seed_min_degree(g, mate),
    }
}

fn seed_naive(g: &Graph, mate: &mut [Option<usize>]) -> usize {
    let mut count = 0;
    for u in 0..g.vertex_count() {
        if mate[u].is_some() {
            continue;
        }
        for &v in g.neighbors(u) {
            if mate[v].is_none() {
                mate[u] = Some(v);
                mate[v] = Some(u);
                count += 1;
                break;
            }
        }
    }
    count
}

fn seed_min_degree(g: &Graph, mate: &mut [Option<usize>]) -> usize {
    let n = g.vertex_count();
    let mut count = 0;
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_unstable_by(|&a, &b| g.degree(a).cmp(&g.degree(b)).then(a.cmp(&b)));
    for u in order {
        if mate[u].is_some() {
            continue;
        }
        let mut best: Option<usize> = None;
        let mut best_deg = usize::MAX;
        for &v in g.neighbors(u) {
            if mate[v].is_none() && g.degree(v) < best_deg {
                best = Some(v);
                best_deg = g.degree(v);
            }
        }
        if let Some(v) = best {
            mate[u] = Some(v);
            mate[v] = Some(u);
            count += 1;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naive_matches_first_free_neighbor() {
        // Path 0-1-2-3: 0 grabs 1, 2 grabs 3.
        let g = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3)]);
        let mut mate = vec![None; 4];
        assert_eq!(seed_matching(&g, &mut mate, Warmstart::Naive), 2);
        assert_eq!(mate[0], Some(1));
        assert_eq!(mate[2], Some(3));
    }

    #[test]
    fn min_degree_prefers_low_degree_endpoints() {
        // Star center 0 with leaves 1..4 plus edge 1-2: leaves go first.
        let g = Graph::from_edges(5, &[(0, 1), (0, 2), (0, 3), (0, 4), (1, 2)]);
        let mut mate = vec![None; 5];
        let seeded = seed_matching(&g, &mut mate, Warmstart::MinDegree);
        assert_eq!(seeded, 2);
        // 3 (degree 1) is processed first and takes the center.
        assert_eq!(mate[3], Some(0));
        assert_eq!(mate[1], Some(2));
    }

    #[test]
    fn off_leaves_mate_untouched() {
        let g = Graph::from_edges(2, &[(0, 1)]);
        let mut mate = vec![None; 2];
        assert_eq!(seed_matching(&g, &mut mate, Warmstart::Off), 0);
        assert!(mate.iter().all(Option::is_none));
    }
}

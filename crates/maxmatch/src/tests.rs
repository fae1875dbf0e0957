//! Cross-engine properties.
//!
//! The per-engine modules cover their own scenarios; here the engines
//! are held to each other: equal maximum size on the same input, exact
//! determinism across runs, independence from edge-list input order,
//! and warm-start neutrality.

use crate::api::*;

const SCENARIOS: &[(usize, &[(usize, usize)], usize)] = &[
    // Triangle + tail.
    (5, &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4)], 2),
    // Odd cycle C5.
    (5, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)], 2),
    // Two disjoint triangles.
    (6, &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)], 2),
    // Nested-blossom stress.
    (
        7,
        &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 6), (6, 2), (5, 2)],
        3,
    ),
    // Petersen graph.
    (
        10,
        &[
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
        ],
        5,
    ),
    // Boundaries: empty, isolated + single edge.
    (4, &[], 0),
    (3, &[(0, 1)], 1),
];

fn all_general(g: &Graph) -> Vec<(&'static str, Matching)> {
    vec![
        ("blossom-simple", blossom_simple(g)),
        ("blossom-forest", blossom_forest(g)),
        ("gabow", gabow_simple(g)),
        ("gabow-scaling", gabow_scaling(g)),
        ("micali-vazirani", micali_vazirani(g)),
    ]
}

#[test]
fn engines_agree_on_the_scenarios() {
    for &(n, edges, expected) in SCENARIOS {
        let g = Graph::from_edges(n, edges);
        for (name, m) in all_general(&g) {
            assert_eq!(m.len(), expected, "{name} on n={n}");
            assert!(validate(&g, &m).passed(), "{name} invalid on n={n}");
        }
    }
}

#[test]
fn engines_agree_on_seeded_random_graphs() {
    for seed in 0..6 {
        let n = 40 + 4 * (seed as usize);
        let edges = gnp(n, 12, seed);
        let g = Graph::from_edges(n, &edges);
        let results = all_general(&g);
        let size = results[0].1.len();
        for (name, m) in &results {
            assert_eq!(m.len(), size, "{name} disagrees on seed {seed}");
            assert!(validate(&g, m).passed(), "{name} invalid on seed {seed}");
        }
    }
}

#[test]
fn hopcroft_karp_agrees_with_general_engines_on_bipartite_inputs() {
    for seed in 0..4 {
        let (l, r) = (14, 11);
        let pairs = bipartite_gnp(l, r, 25, seed);
        let bg = BipartiteGraph::from_edges(l, r, &pairs);
        let hk = hopcroft_karp(&bg);
        assert!(validate_bipartite(&bg, &hk).passed());

        // Same graph with the right side shifted past the left.
        let shifted: Vec<(usize, usize)> = pairs.iter().map(|&(u, v)| (u, l + v)).collect();
        let g = Graph::from_edges(l + r, &shifted);
        for (name, m) in all_general(&g) {
            assert_eq!(m.len(), hk.len(), "{name} vs hopcroft-karp, seed {seed}");
        }
    }
}

#[test]
fn repeated_runs_are_bit_identical() {
    let edges = gnp(36, 15, 99);
    let g = Graph::from_edges(36, &edges);
    for (name, first) in all_general(&g) {
        let again = match name {
            "blossom-simple" => blossom_simple(&g),
            "blossom-forest" => blossom_forest(&g),
            "gabow" => gabow_simple(&g),
            "gabow-scaling" => gabow_scaling(&g),
            _ => micali_vazirani(&g),
        };
        assert_eq!(first, again, "{name} is not deterministic");
    }
}

#[test]
fn edge_input_order_does_not_matter() {
    let mut edges = gnp(30, 20, 5);
    let g1 = Graph::from_edges(30, &edges);
    edges.reverse();
    edges.rotate_left(7);
    let g2 = Graph::from_edges(30, &edges);
    for ((n1, m1), (n2, m2)) in all_general(&g1).into_iter().zip(all_general(&g2)) {
        assert_eq!(n1, n2);
        assert_eq!(m1, m2, "{n1} depends on edge input order");
    }
}

#[test]
fn warm_starts_preserve_the_final_size() {
    let edges = gnp(34, 14, 21);
    let g = Graph::from_edges(34, &edges);
    let cold = gabow_simple(&g).len();
    for ws in [Warmstart::Naive, Warmstart::MinDegree] {
        assert_eq!(GabowSimple::new(&g).maximum_matching(ws).len(), cold);
        assert_eq!(GabowScaling::new(&g).maximum_matching(ws).len(), cold);
        assert_eq!(MicaliVazirani::new(&g).maximum_matching(ws).len(), cold);
    }

    let pairs = bipartite_gnp(12, 12, 20, 8);
    let bg = BipartiteGraph::from_edges(12, 12, &pairs);
    let cold = hopcroft_karp(&bg).len();
    for ws in [BipartiteWarmstart::Naive, BipartiteWarmstart::MinDegree] {
        assert_eq!(HopcroftKarp::new(&bg).maximum_matching(ws).len(), cold);
    }
}

#[test]
fn output_is_sorted_with_small_endpoint_first() {
    let edges = gnp(26, 22, 4);
    let g = Graph::from_edges(26, &edges);
    for (name, m) in all_general(&g) {
        for &(u, v) in &m {
            assert!(u < v, "{name} emitted ({u}, {v})");
        }
        let mut sorted = m.clone();
        sorted.sort_unstable();
        assert_eq!(m, sorted, "{name} output is not sorted");
    }
}

#[test]
fn self_loops_and_duplicates_never_reach_the_output() {
    let g = Graph::from_edges(4, &[(0, 0), (0, 1), (1, 0), (1, 1), (2, 3), (2, 3)]);
    for (name, m) in all_general(&g) {
        assert_eq!(m, vec![(0, 1), (2, 3)], "{name}");
    }
}

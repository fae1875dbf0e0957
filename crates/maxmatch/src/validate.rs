//! Matching validation.
//!
//! Checks the two properties every engine must deliver: each reported
//! edge exists in the normalized graph, and no vertex appears in more
//! than one edge. Violations are collected as `ERROR:` lines and reported
//! — never panicked on — because a failed validation is a diagnosis aid,
//! not a recovery path.

use crate::graph::{BipartiteGraph, Graph};

/// Outcome of validating a matching against its graph.
#[derive(Clone, Debug)]
pub struct ValidationReport {
    pub size: usize,
    /// Vertices covered by the matching. For bipartite graphs this is
    /// `(left, right)`; for general graphs both fields are totals of one
    /// shared vertex space and `matched_right` is `None`.
    pub matched: usize,
    pub matched_right: Option<usize>,
    pub errors: Vec<String>,
}

impl ValidationReport {
    #[inline]
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a general-graph matching.
pub fn validate(g: &Graph, matching: &[(usize, usize)]) -> ValidationReport {
    let n = g.vertex_count();
    let mut deg = vec![0u32; n];
    let mut errors = Vec::new();

    for &(u, v) in matching {
        if !g.has_edge(u, v) {
            errors.push(format!("ERROR: Edge ({u}, {v}) not in graph!"));
        }
        if u < n {
            deg[u] += 1;
        }
        if v < n {
            deg[v] += 1;
        }
    }
    for (i, &d) in deg.iter().enumerate() {
        if d > 1 {
            errors.push(format!("ERROR: Vertex {i} in {d} edges!"));
        }
    }
    let matched = deg.iter().filter(|&&d| d > 0).count();

    ValidationReport {
        size: matching.len(),
        matched,
        matched_right: None,
        errors,
    }
}

/// Validate a bipartite matching of `(left, right)` pairs.
pub fn validate_bipartite(g: &BipartiteGraph, matching: &[(usize, usize)]) -> ValidationReport {
    let mut left_deg = vec![0u32; g.left_count()];
    let mut right_deg = vec![0u32; g.right_count()];
    let mut errors = Vec::new();

    for &(u, v) in matching {
        if !g.has_edge(u, v) {
            errors.push(format!("ERROR: Edge ({u}, {v}) not in graph!"));
        }
        if u < left_deg.len() {
            left_deg[u] += 1;
        }
        if v < right_deg.len() {
            right_deg[v] += 1;
        }
    }
    for (i, &d) in left_deg.iter().enumerate() {
        if d > 1 {
            errors.push(format!("ERROR: Left vertex {i} in {d} edges!"));
        }
    }
    for (i, &d) in right_deg.iter().enumerate() {
        if d > 1 {
            errors.push(format!("ERROR: Right vertex {i} in {d} edges!"));
        }
    }
    let matched = left_deg.iter().filter(|&&d| d > 0).count();
    let matched_right = right_deg.iter().filter(|&&d| d > 0).count();

    ValidationReport {
        size: matching.len(),
        matched,
        matched_right: Some(matched_right),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_matching_passes() {
        let g = Graph::from_edges(4, &[(0, 1), (2, 3), (1, 2)]);
        let report = validate(&g, &[(0, 1), (2, 3)]);
        assert!(report.passed());
        assert_eq!(report.size, 2);
        assert_eq!(report.matched, 4);
    }

    #[test]
    fn phantom_edge_is_reported() {
        let g = Graph::from_edges(4, &[(0, 1)]);
        let report = validate(&g, &[(2, 3)]);
        assert!(!report.passed());
        assert_eq!(report.errors, vec!["ERROR: Edge (2, 3) not in graph!"]);
    }

    #[test]
    fn shared_vertex_is_reported() {
        let g = Graph::from_edges(3, &[(0, 1), (1, 2)]);
        let report = validate(&g, &[(0, 1), (1, 2)]);
        assert!(!report.passed());
        assert!(report.errors.iter().any(|e| e.contains("Vertex 1 in 2")));
    }

    #[test]
    fn bipartite_counts_both_sides() {
        let g = BipartiteGraph::from_edges(2, 3, &[(0, 0), (1, 2)]);
        let report = validate_bipartite(&g, &[(0, 0), (1, 2)]);
        assert!(report.passed());
        assert_eq!(report.matched, 2);
        assert_eq!(report.matched_right, Some(2));
    }
}

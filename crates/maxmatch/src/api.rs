//! Curated re-export surface.
//!
//! One flat import point for runners and benches; the module tree stays
//! the canonical layout.

// Graph model and normalization.
pub use crate::graph::{collect_matching, BipartiteGraph, Graph, Matching};
// Input and validation.
pub use crate::io::{
    load_bipartite, load_general, parse_bipartite, parse_general, BipartiteInput, GeneralInput,
    ParseError,
};
pub use crate::validate::{validate, validate_bipartite, ValidationReport};
// Warm starts.
pub use crate::greedy::{seed_matching, Warmstart};
pub use crate::hopcroft_karp::BipartiteWarmstart;
// Engines, one constructor struct and one convenience function each.
pub use crate::blossom::forest::{maximum_matching as blossom_forest, BlossomForest};
pub use crate::blossom::simple::{maximum_matching as blossom_simple, BlossomSimple};
pub use crate::gabow::scaling::{maximum_matching as gabow_scaling, GabowScaling};
pub use crate::gabow::simple::{maximum_matching as gabow_simple, GabowSimple};
pub use crate::hopcroft_karp::{maximum_matching as hopcroft_karp, HopcroftKarp};
pub use crate::micali_vazirani::{maximum_matching as micali_vazirani, MicaliVazirani};
// Deterministic samplers for tests and benches.
pub use crate::gen::{bipartite_gnp, gnp};

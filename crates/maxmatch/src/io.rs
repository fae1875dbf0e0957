//! Text input for the matching runners.
//!
//! Both formats are whitespace-separated token streams; line structure is
//! irrelevant. General graphs: `n m` followed by `u v` pairs. Bipartite
//! graphs: `L R m` followed by `u v` pairs. The declared edge count `m`
//! is advisory — every remaining pair is read. Endpoint normalization
//! (range, loops, duplicates) happens later in graph construction, so a
//! structurally valid file never fails here.
//!
//! Input errors are fatal for the caller and carry exactly the two
//! user-visible diagnostics: `Cannot open file: <path>` and `Bad header`.

use std::fs;
use std::path::Path;

use thiserror::Error;

/// Fatal input errors. Display output is the diagnostic printed to
/// stderr, verbatim.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Cannot open file: {path}")]
    CannotOpen { path: String },
    /// Missing or malformed numeric tokens anywhere in the stream.
    #[error("Bad header")]
    BadHeader,
}

/// Parsed general-graph input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneralInput {
    pub n: usize,
    pub declared_edges: usize,
    pub edges: Vec<(usize, usize)>,
}

/// Parsed bipartite input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BipartiteInput {
    pub left: usize,
    pub right: usize,
    pub declared_edges: usize,
    pub edges: Vec<(usize, usize)>,
}

fn numbers(text: &str) -> Result<Vec<usize>, ParseError> {
    text.split_whitespace()
        .map(|tok| tok.parse::<usize>().map_err(|_| ParseError::BadHeader))
        .collect()
}

fn pairs(tokens: &[usize]) -> Vec<(usize, usize)> {
    // A dangling unpaired token is tolerated, like a short trailing line.
    tokens.chunks_exact(2).map(|c| (c[0], c[1])).collect()
}

/// Parse the general format `n m u1 v1 …`.
pub fn parse_general(text: &str) -> Result<GeneralInput, ParseError> {
    let tokens = numbers(text)?;
    if tokens.len() < 2 {
        return Err(ParseError::BadHeader);
    }
    Ok(GeneralInput {
        n: tokens[0],
        declared_edges: tokens[1],
        edges: pairs(&tokens[2..]),
    })
}

/// Parse the bipartite format `L R m u1 v1 …`.
pub fn parse_bipartite(text: &str) -> Result<BipartiteInput, ParseError> {
    let tokens = numbers(text)?;
    if tokens.len() < 3 {
        return Err(ParseError::BadHeader);
    }
    Ok(BipartiteInput {
        left: tokens[0],
        right: tokens[1],
        declared_edges: tokens[2],
        edges: pairs(&tokens[3..]),
    })
}

fn read(path: &Path) -> Result<String, ParseError> {
    fs::read_to_string(path).map_err(|_| ParseError::CannotOpen {
        path: path.display().to_string(),
    })
}

pub fn load_general(path: impl AsRef<Path>) -> Result<GeneralInput, ParseError> {
    parse_general(&read(path.as_ref())?)
}

pub fn load_bipartite(path: impl AsRef<Path>) -> Result<BipartiteInput, ParseError> {
    parse_bipartite(&read(path.as_ref())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_accepts_tokens_across_lines() {
        let input = parse_general("3 2\n0 1\n1 2\n").unwrap();
        assert_eq!(input.n, 3);
        assert_eq!(input.declared_edges, 2);
        assert_eq!(input.edges, vec![(0, 1), (1, 2)]);

        let flat = parse_general("3 2 0 1 1 2").unwrap();
        assert_eq!(flat, input);
    }

    #[test]
    fn declared_edge_count_is_advisory() {
        let input = parse_general("4 1 0 1 2 3").unwrap();
        assert_eq!(input.edges.len(), 2);
    }

    #[test]
    fn short_or_malformed_header_is_rejected() {
        assert_eq!(parse_general(""), Err(ParseError::BadHeader));
        assert_eq!(parse_general("5"), Err(ParseError::BadHeader));
        assert_eq!(parse_general("5 x"), Err(ParseError::BadHeader));
        assert_eq!(parse_general("5 2 0 one"), Err(ParseError::BadHeader));
        assert_eq!(parse_bipartite("2 2"), Err(ParseError::BadHeader));
    }

    #[test]
    fn bipartite_header_has_three_fields() {
        let input = parse_bipartite("2 3 2 0 2 1 0").unwrap();
        assert_eq!((input.left, input.right), (2, 3));
        assert_eq!(input.edges, vec![(0, 2), (1, 0)]);
    }

    #[test]
    fn dangling_token_is_tolerated() {
        let input = parse_general("2 1 0 1 7").unwrap();
        assert_eq!(input.edges, vec![(0, 1)]);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_general("/no/such/file.txt").unwrap_err();
        assert_eq!(err.to_string(), "Cannot open file: /no/such/file.txt");
    }
}

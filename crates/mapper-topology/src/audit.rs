//! Data-quality audit of a snapshot.
//!
//! Nothing here rejects data. The store and the instruction generator use the
//! findings to warn the person mapping the puzzle.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::{EdgeId, Piece};

/// A permissively tolerated inconsistency in the mapped data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataIssue {
    /// More than one piece uses this code.
    DuplicateCode {
        /// The shared code
        code: String,
    },
    /// The same edge id is declared twice on one piece.
    DuplicateEdge {
        /// Piece code
        code: String,
        /// Repeated slot
        edge: EdgeId,
    },
    /// A neighbor entry sits on an edge the piece never declared.
    UndeclaredNeighborEdge {
        /// Piece code
        code: String,
        /// Slot named by the neighbor entry
        edge: EdgeId,
    },
    /// Two neighbor entries occupy the same edge slot.
    DuplicateNeighborEdge {
        /// Piece code
        code: String,
        /// Overloaded slot
        edge: EdgeId,
    },
}

impl DataIssue {
    /// Code of the piece the issue is about.
    pub fn code(&self) -> &str {
        match self {
            Self::DuplicateCode { code }
            | Self::DuplicateEdge { code, .. }
            | Self::UndeclaredNeighborEdge { code, .. }
            | Self::DuplicateNeighborEdge { code, .. } => code,
        }
    }

    fn sort_key(&self) -> (&str, u8) {
        match self {
            Self::DuplicateCode { code } => (code, 0),
            Self::DuplicateEdge { code, edge }
            | Self::UndeclaredNeighborEdge { code, edge }
            | Self::DuplicateNeighborEdge { code, edge } => (code, edge.value()),
        }
    }
}

impl fmt::Display for DataIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateCode { code } => {
                write!(f, "piece code {code} is used by more than one piece")
            }
            Self::DuplicateEdge { code, edge } => {
                write!(f, "piece {code} declares edge {edge} more than once")
            }
            Self::UndeclaredNeighborEdge { code, edge } => {
                write!(f, "piece {code} has a neighbor on edge {edge}, which it does not declare")
            }
            Self::DuplicateNeighborEdge { code, edge } => {
                write!(f, "piece {code} has more than one neighbor on edge {edge}")
            }
        }
    }
}

/// Check a snapshot for data-quality issues.
///
/// Issues come back ordered by piece code, then edge. Each distinct issue is
/// reported once.
pub fn audit(pieces: &[Piece]) -> Vec<DataIssue> {
    let mut issues = HashSet::new();

    let mut code_counts: HashMap<&str, usize> = HashMap::new();
    for piece in pieces {
        *code_counts.entry(piece.code.as_str()).or_default() += 1;
    }
    for (code, count) in code_counts {
        if count > 1 {
            issues.insert(DataIssue::DuplicateCode {
                code: code.to_string(),
            });
        }
    }

    for piece in pieces {
        let mut declared = HashSet::new();
        for edge in &piece.edges {
            if !declared.insert(edge.edge_id) {
                issues.insert(DataIssue::DuplicateEdge {
                    code: piece.code.clone(),
                    edge: edge.edge_id,
                });
            }
        }

        let mut linked = HashSet::new();
        for neighbor in &piece.neighbors {
            if !piece.declares_edge(neighbor.edge_id) {
                issues.insert(DataIssue::UndeclaredNeighborEdge {
                    code: piece.code.clone(),
                    edge: neighbor.edge_id,
                });
            }
            if neighbor.linked_code().is_some() && !linked.insert(neighbor.edge_id) {
                issues.insert(DataIssue::DuplicateNeighborEdge {
                    code: piece.code.clone(),
                    edge: neighbor.edge_id,
                });
            }
        }
    }

    let mut issues: Vec<DataIssue> = issues.into_iter().collect();
    issues.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()).then_with(|| a.cmp(b)));
    issues
}

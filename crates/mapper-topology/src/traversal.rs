//! Deterministic depth-first traversal of the piece graph.
//!
//! # Ordering
//!
//! From each piece, neighbor links are followed in ascending edge id. The
//! walk descends into the first unvisited neighbor before looking at the
//! next edge, exactly like the recursive formulation:
//!
//! ```text
//! visit(c):
//!     for (edge, n) in links(c) sorted by edge:
//!         if n == c or n visited: skip
//!         if n not in snapshot:    record dangling, skip
//!         emit attach(c, n, edge); visit(n)
//! ```
//!
//! The recursion is unrolled onto an explicit stack so long chains of pieces
//! cannot exhaust the call stack.

use std::collections::{BTreeSet, HashSet};

use crate::error::{Result, TopologyError};
use crate::{EdgeId, Piece, PieceIndex};

/// Something that happened while walking the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalEvent<'a> {
    /// A link to an unvisited piece was followed.
    Attach {
        /// Piece already placed
        from: &'a Piece,
        /// Piece being attached
        to: &'a Piece,
        /// Slot on `from` where `to` connects
        edge: EdgeId,
    },
    /// A link names a piece that is not in the snapshot.
    Dangling {
        /// Piece holding the link
        from: &'a Piece,
        /// Slot on `from` the missing piece was expected at
        edge: EdgeId,
        /// Code of the missing piece
        missing: &'a str,
    },
}

/// A neighbor link that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DanglingReference {
    /// Code of the piece holding the link
    pub from: String,
    /// Slot on that piece
    pub edge: EdgeId,
    /// Code that did not resolve
    pub missing: String,
}

/// Outcome of one walk. All state is local to the call that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Traversal {
    /// Codes in the order they were entered, start piece first
    pub order: Vec<String>,
    /// Unresolved links in the order they were met
    pub dangling: Vec<DanglingReference>,
}

impl Traversal {
    /// Distinct missing codes, sorted.
    pub fn missing_codes(&self) -> Vec<String> {
        self.dangling
            .iter()
            .map(|d| d.missing.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Codes in the snapshot the walk never reached, sorted and distinct.
    pub fn unreachable(&self, index: &PieceIndex<'_>) -> Vec<String> {
        let visited: HashSet<&str> = self.order.iter().map(String::as_str).collect();
        index
            .pieces()
            .iter()
            .map(|p| p.code.as_str())
            .filter(|code| !visited.contains(code))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

/// Walk the graph depth-first from `start_code`.
///
/// `on_event` is called once per followed link and once per dangling link,
/// in walk order. Already-visited neighbors and self-links are skipped
/// silently. Pieces unreachable from the start are never touched.
///
/// Fails only when `start_code` is not in the snapshot.
pub fn traverse<'a, F>(
    index: &PieceIndex<'a>,
    start_code: &str,
    mut on_event: F,
) -> Result<Traversal>
where
    F: FnMut(TraversalEvent<'a>),
{
    let start = index
        .get(start_code)
        .ok_or_else(|| TopologyError::StartNotFound {
            code: start_code.to_string(),
        })?;

    let mut visited: HashSet<&'a str> = HashSet::with_capacity(index.len());
    let mut result = Traversal::default();

    visited.insert(start.code.as_str());
    result.order.push(start.code.clone());

    let mut stack = vec![(start, start.links().into_iter())];

    while let Some((current, links)) = stack.last_mut() {
        let current: &'a Piece = *current;
        let Some((edge, code)) = links.next() else {
            stack.pop();
            continue;
        };

        if code == current.code {
            continue;
        }

        match index.get(code) {
            None => {
                on_event(TraversalEvent::Dangling {
                    from: current,
                    edge,
                    missing: code,
                });
                result.dangling.push(DanglingReference {
                    from: current.code.clone(),
                    edge,
                    missing: code.to_string(),
                });
            }
            Some(next) => {
                if !visited.insert(next.code.as_str()) {
                    continue;
                }
                on_event(TraversalEvent::Attach {
                    from: current,
                    to: next,
                    edge,
                });
                result.order.push(next.code.clone());
                stack.push((next, next.links().into_iter()));
            }
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attaches(pieces: &[Piece], start: &str) -> Vec<(String, String, u8)> {
        let index = PieceIndex::new(pieces);
        let mut out = Vec::new();
        traverse(&index, start, |event| {
            if let TraversalEvent::Attach { from, to, edge } = event {
                out.push((from.code.clone(), to.code.clone(), edge.value()));
            }
        })
        .unwrap();
        out
    }

    #[test]
    fn closed_two_cycle_terminates() {
        let pieces = vec![
            Piece::new("1", "P1", "A").with_neighbor(1, "P2"),
            Piece::new("2", "P2", "A").with_neighbor(1, "P1"),
        ];

        let steps = attaches(&pieces, "P1");
        assert_eq!(steps, vec![("P1".into(), "P2".into(), 1)]);
    }

    #[test]
    fn depth_first_in_edge_order() {
        // P1 -1-> P2 -1-> P4, P1 -2-> P3; P2 is declared with edges reversed.
        let pieces = vec![
            Piece::new("1", "P1", "A")
                .with_neighbor(2, "P3")
                .with_neighbor(1, "P2"),
            Piece::new("2", "P2", "A")
                .with_neighbor(3, "P1")
                .with_neighbor(1, "P4"),
            Piece::new("3", "P3", "A").with_neighbor(4, "P1"),
            Piece::new("4", "P4", "A"),
        ];

        let index = PieceIndex::new(&pieces);
        let walk = traverse(&index, "P1", |_| {}).unwrap();
        assert_eq!(walk.order, vec!["P1", "P2", "P4", "P3"]);
    }

    #[test]
    fn self_link_is_skipped() {
        let pieces = vec![Piece::new("1", "P1", "A")
            .with_neighbor(1, "P1")
            .with_neighbor(2, "P1")];

        let index = PieceIndex::new(&pieces);
        let mut events = 0;
        let walk = traverse(&index, "P1", |_| events += 1).unwrap();

        assert_eq!(events, 0);
        assert_eq!(walk.order, vec!["P1"]);
        assert!(walk.dangling.is_empty());
    }

    #[test]
    fn dangling_link_recorded_and_walk_continues() {
        let pieces = vec![
            Piece::new("1", "P1", "A")
                .with_neighbor(2, "P9")
                .with_neighbor(3, "P2"),
            Piece::new("2", "P2", "A"),
        ];

        let index = PieceIndex::new(&pieces);
        let mut dangling = Vec::new();
        let walk = traverse(&index, "P1", |event| {
            if let TraversalEvent::Dangling { from, edge, missing } = event {
                dangling.push((from.code.clone(), edge.value(), missing.to_string()));
            }
        })
        .unwrap();

        assert_eq!(dangling, vec![("P1".into(), 2, "P9".into())]);
        assert_eq!(walk.order, vec!["P1", "P2"]);
        assert_eq!(walk.missing_codes(), vec!["P9"]);
    }

    #[test]
    fn open_edges_ignored() {
        let pieces = vec![Piece::new("1", "P1", "A")
            .with_open_edge(1)
            .with_open_edge(2)];

        let index = PieceIndex::new(&pieces);
        let walk = traverse(&index, "P1", |_| {}).unwrap();
        assert_eq!(walk.order, vec!["P1"]);
        assert!(walk.dangling.is_empty());
    }

    #[test]
    fn blank_neighbor_code_is_open_edge() {
        let pieces = vec![
            Piece::new("1", "P1", "A")
                .with_neighbor(1, "")
                .with_neighbor(2, "P2")
                .with_neighbor(3, " "),
            Piece::new("2", "P2", "A"),
        ];

        let index = PieceIndex::new(&pieces);
        let mut events = 0;
        let walk = traverse(&index, "P1", |_| events += 1).unwrap();
        assert_eq!(walk.order, vec!["P1", "P2"]);
        assert!(walk.dangling.is_empty());
        assert!(walk.missing_codes().is_empty());
        assert_eq!(events, 1);
    }

    #[test]
    fn missing_start_is_error() {
        let pieces = vec![Piece::new("2", "P2", "A"), Piece::new("3", "P3", "A")];
        let index = PieceIndex::new(&pieces);

        let err = traverse(&index, "P1", |_| {}).unwrap_err();
        assert_eq!(
            err,
            TopologyError::StartNotFound {
                code: "P1".to_string()
            }
        );
    }

    #[test]
    fn disconnected_component_untouched() {
        let pieces = vec![
            Piece::new("1", "P1", "A").with_neighbor(1, "P2"),
            Piece::new("2", "P2", "A").with_neighbor(1, "P3"),
            Piece::new("3", "P3", "A"),
            Piece::new("4", "P4", "B").with_neighbor(1, "P5"),
            Piece::new("5", "P5", "B").with_neighbor(3, "P4"),
        ];

        let index = PieceIndex::new(&pieces);
        let walk = traverse(&index, "P1", |_| {}).unwrap();

        assert_eq!(walk.order, vec!["P1", "P2", "P3"]);
        assert_eq!(walk.unreachable(&index), vec!["P4", "P5"]);
    }

    #[test]
    fn shared_dangling_code_reported_per_edge() {
        let pieces = vec![
            Piece::new("1", "P1", "A")
                .with_neighbor(1, "P9")
                .with_neighbor(2, "P2"),
            Piece::new("2", "P2", "A").with_neighbor(3, "P9"),
        ];

        let index = PieceIndex::new(&pieces);
        let walk = traverse(&index, "P1", |_| {}).unwrap();

        assert_eq!(walk.dangling.len(), 2);
        assert_eq!(walk.missing_codes(), vec!["P9"]);
    }

    #[test]
    fn long_chain_does_not_overflow() {
        let n = 50_000;
        let pieces: Vec<Piece> = (0..n)
            .map(|i| {
                let piece = Piece::new(i.to_string(), format!("P{i}"), "A");
                if i + 1 < n {
                    piece.with_neighbor(2, format!("P{}", i + 1))
                } else {
                    piece
                }
            })
            .collect();

        let index = PieceIndex::new(&pieces);
        let walk = traverse(&index, "P0", |_| {}).unwrap();
        assert_eq!(walk.order.len(), n);
    }
}

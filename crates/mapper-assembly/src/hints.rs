//! Back-link hints for a single freshly mapped piece.

use mapper_topology::{missing_back_links, LinkSuggestion, Piece};

use crate::SnapshotProvider;

/// Check whether the neighbors named by one piece link back to it.
///
/// Pieces are fetched one at a time, so this stays cheap right after a piece
/// is saved. An unknown piece yields no hints.
pub fn reverse_link_hints<P: SnapshotProvider>(
    provider: &P,
    puzzle_id: &str,
    code: &str,
) -> Result<Vec<LinkSuggestion>, P::Error> {
    let Some(piece) = provider.fetch_piece(puzzle_id, code)? else {
        return Ok(Vec::new());
    };

    let mut neighbors: Vec<Piece> = Vec::new();
    for (_, linked) in piece.links() {
        if linked == piece.code || neighbors.iter().any(|p| p.code == linked) {
            continue;
        }
        if let Some(neighbor) = provider.fetch_piece(puzzle_id, linked)? {
            neighbors.push(neighbor);
        }
    }

    Ok(missing_back_links(&piece, |c| {
        neighbors.iter().find(|p| p.code == c)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemorySnapshot;
    use mapper_topology::EdgeId;

    #[test]
    fn hints_for_one_way_links() {
        let provider = MemorySnapshot::new().with_puzzle(
            "p",
            vec![
                Piece::new("1", "P1", "A")
                    .with_neighbor(1, "P2")
                    .with_neighbor(2, "P3")
                    .with_neighbor(3, "P9"),
                Piece::new("2", "P2", "A").with_neighbor(3, "P1"),
                Piece::new("3", "P3", "A"),
            ],
        );

        let hints = reverse_link_hints(&provider, "p", "P1").unwrap();
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].piece, "P3");
        assert_eq!(hints[0].link_to, "P1");
        assert_eq!(hints[0].suggested_edge, Some(EdgeId(4)));
    }

    #[test]
    fn unknown_piece_has_no_hints() {
        let provider = MemorySnapshot::new();
        assert!(reverse_link_hints(&provider, "p", "P1").unwrap().is_empty());
    }
}

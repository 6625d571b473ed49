//! Reverse-link suggestions.
//!
//! Mapping is done one piece at a time, so it is easy to record A→B and
//! forget B→A. Traversal does not need the back-link, but a symmetric map
//! lets any piece serve as the start.

use std::fmt;

use crate::{EdgeId, Piece, PieceIndex, MAX_EDGE_ID, PLANAR_EDGES};

/// A back-link that is probably missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSuggestion {
    /// Piece that should gain a neighbor entry
    pub piece: String,
    /// Code it should link back to
    pub link_to: String,
    /// Slot on `link_to` that references `piece`
    pub via_edge: EdgeId,
    /// Conventional opposite slot on `piece`, when one exists
    pub suggested_edge: Option<EdgeId>,
}

impl fmt::Display for LinkSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} links to {} on edge {}, but {} has no link back",
            self.link_to, self.piece, self.via_edge, self.piece
        )?;
        if let Some(edge) = self.suggested_edge {
            write!(f, " (usually edge {edge})")?;
        }
        Ok(())
    }
}

/// The slot facing `edge` on an adjoining piece: 1↔3 and 2↔4 in the plane,
/// 5↔6 across layers.
pub fn opposite_edge(edge: EdgeId) -> Option<EdgeId> {
    let id = edge.value();
    match id {
        1..=PLANAR_EDGES => Some(EdgeId((id + 1) % PLANAR_EDGES + 1)),
        5 => Some(EdgeId(MAX_EDGE_ID)),
        MAX_EDGE_ID => Some(EdgeId(5)),
        _ => None,
    }
}

/// Find every resolved link A→B where B has no entry naming A.
///
/// Self-links and dangling links are not reported. Results are ordered by
/// A's code, then by edge.
pub fn find_missing_reverse_links(pieces: &[Piece]) -> Vec<LinkSuggestion> {
    let index = PieceIndex::new(pieces);
    let mut sources: Vec<&Piece> = pieces.iter().collect();
    sources.sort_by(|a, b| a.code.cmp(&b.code));
    sources.dedup_by(|a, b| a.code == b.code);

    let mut suggestions = Vec::new();
    for source in sources {
        suggestions.extend(missing_back_links(source, |code| index.get(code)));
    }
    suggestions
}

/// Back-links missing for the links held by a single piece.
///
/// `lookup` resolves a neighbor code; callers that cannot hold a whole
/// snapshot can fetch pieces one at a time.
pub fn missing_back_links<'a, F>(source: &Piece, mut lookup: F) -> Vec<LinkSuggestion>
where
    F: FnMut(&str) -> Option<&'a Piece>,
{
    let mut suggestions = Vec::new();
    for (edge, code) in source.links() {
        if code == source.code {
            continue;
        }
        let Some(target) = lookup(code) else {
            continue;
        };
        if !target.links_to(&source.code) {
            suggestions.push(LinkSuggestion {
                piece: target.code.clone(),
                link_to: source.code.clone(),
                via_edge: edge,
                suggested_edge: opposite_edge(edge),
            });
        }
    }
    suggestions
}

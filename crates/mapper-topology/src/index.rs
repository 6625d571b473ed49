//! Read-only lookup view over a puzzle snapshot.

use std::collections::HashMap;

use crate::Piece;

/// Lookup indices built once per snapshot.
///
/// - `code -> Piece` for following neighbor links
/// - `id -> code` for callers that hold a store identity
///
/// When two pieces share a code the first one wins; [`crate::audit`]
/// reports the duplicate.
#[derive(Debug)]
pub struct PieceIndex<'a> {
    pieces: &'a [Piece],
    by_code: HashMap<&'a str, &'a Piece>,
    code_by_id: HashMap<&'a str, &'a str>,
}

impl<'a> PieceIndex<'a> {
    /// Build both indices from a snapshot.
    pub fn new(pieces: &'a [Piece]) -> Self {
        let mut by_code = HashMap::with_capacity(pieces.len());
        let mut code_by_id = HashMap::with_capacity(pieces.len());

        for piece in pieces {
            by_code.entry(piece.code.as_str()).or_insert(piece);
            code_by_id
                .entry(piece.id.as_str())
                .or_insert(piece.code.as_str());
        }

        Self {
            pieces,
            by_code,
            code_by_id,
        }
    }

    /// Find a piece by its code.
    #[inline]
    pub fn get(&self, code: &str) -> Option<&'a Piece> {
        self.by_code.get(code).copied()
    }

    /// Whether a piece with this code exists.
    #[inline]
    pub fn contains(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }

    /// Translate a store identity to a piece code.
    pub fn code_of(&self, id: &str) -> Option<&'a str> {
        self.code_by_id.get(id).copied()
    }

    /// The snapshot this index was built from, in its original order.
    pub fn pieces(&self) -> &'a [Piece] {
        self.pieces
    }

    /// Number of distinct codes.
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    /// Whether the snapshot has no pieces.
    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

//! Snapshot providers.

use std::collections::HashMap;
use std::convert::Infallible;

use mapper_topology::Piece;

/// Supplies the pieces of one puzzle.
///
/// Generation reads the snapshot once and never writes back. Implementations
/// should not drop pieces that existed when the call started, but need not be
/// transactionally isolated.
pub trait SnapshotProvider {
    /// Failure raised by the backing store.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Every piece mapped for a puzzle.
    fn fetch_pieces(&self, puzzle_id: &str) -> Result<Vec<Piece>, Self::Error>;

    /// One piece by code, if mapped.
    fn fetch_piece(&self, puzzle_id: &str, code: &str) -> Result<Option<Piece>, Self::Error>;
}

impl<P: SnapshotProvider + ?Sized> SnapshotProvider for &P {
    type Error = P::Error;

    fn fetch_pieces(&self, puzzle_id: &str) -> Result<Vec<Piece>, Self::Error> {
        (**self).fetch_pieces(puzzle_id)
    }

    fn fetch_piece(&self, puzzle_id: &str, code: &str) -> Result<Option<Piece>, Self::Error> {
        (**self).fetch_piece(puzzle_id, code)
    }
}

/// In-memory provider; unknown puzzles have no pieces.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshot {
    puzzles: HashMap<String, Vec<Piece>>,
}

impl MemorySnapshot {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pieces of a puzzle.
    pub fn insert(&mut self, puzzle_id: impl Into<String>, pieces: Vec<Piece>) {
        self.puzzles.insert(puzzle_id.into(), pieces);
    }

    /// Builder form of [`MemorySnapshot::insert`].
    pub fn with_puzzle(mut self, puzzle_id: impl Into<String>, pieces: Vec<Piece>) -> Self {
        self.insert(puzzle_id, pieces);
        self
    }
}

impl SnapshotProvider for MemorySnapshot {
    type Error = Infallible;

    fn fetch_pieces(&self, puzzle_id: &str) -> Result<Vec<Piece>, Self::Error> {
        Ok(self.puzzles.get(puzzle_id).cloned().unwrap_or_default())
    }

    fn fetch_piece(&self, puzzle_id: &str, code: &str) -> Result<Option<Piece>, Self::Error> {
        Ok(self
            .puzzles
            .get(puzzle_id)
            .and_then(|pieces| pieces.iter().find(|p| p.code == code))
            .cloned())
    }
}

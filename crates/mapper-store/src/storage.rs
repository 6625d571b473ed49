//! Persistent storage using RocksDB.

use crate::error::Result;
use crate::models::{PieceRecord, Puzzle};
use rocksdb::{Options, DB};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Storage backend for puzzles and pieces.
pub struct Storage {
    db: DB,
}

impl Storage {
    /// Open or create storage at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)?;
        Ok(Self { db })
    }

    // --- Puzzles ---

    /// Store a puzzle.
    pub fn put_puzzle(&self, puzzle: &Puzzle) -> Result<()> {
        let key = format!("puzzle:{}", puzzle.id);
        let value = serde_json::to_vec(puzzle)?;
        self.db.put(key.as_bytes(), value)?;
        Ok(())
    }

    /// Get a puzzle by ID.
    pub fn get_puzzle(&self, id: &str) -> Result<Option<Puzzle>> {
        let key = format!("puzzle:{}", id);
        self.get_json(&key)
    }

    /// Delete a puzzle document (its pieces are left alone).
    pub fn delete_puzzle(&self, id: &str) -> Result<()> {
        let key = format!("puzzle:{}", id);
        self.db.delete(key.as_bytes())?;
        Ok(())
    }

    /// List all puzzles.
    pub fn list_puzzles(&self) -> Result<Vec<Puzzle>> {
        self.scan(b"puzzle:")
    }

    // --- Pieces ---

    /// Store a piece.
    pub fn put_piece(&self, record: &PieceRecord) -> Result<()> {
        let key = piece_key(&record.puzzle_id, &record.piece.code);
        let value = serde_json::to_vec(record)?;
        self.db.put(key.as_bytes(), value)?;
        Ok(())
    }

    /// Get a piece by puzzle and code.
    pub fn get_piece(&self, puzzle_id: &str, code: &str) -> Result<Option<PieceRecord>> {
        self.get_json(&piece_key(puzzle_id, code))
    }

    /// Delete a piece.
    pub fn delete_piece(&self, puzzle_id: &str, code: &str) -> Result<()> {
        self.db.delete(piece_key(puzzle_id, code).as_bytes())?;
        Ok(())
    }

    /// List all pieces of a puzzle, ordered by code bytes.
    pub fn list_pieces(&self, puzzle_id: &str) -> Result<Vec<PieceRecord>> {
        let prefix = format!("piece:{}:", puzzle_id);
        self.scan(prefix.as_bytes())
    }

    // --- Helpers ---

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.db.get(key.as_bytes())? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    fn scan<T: DeserializeOwned>(&self, prefix: &[u8]) -> Result<Vec<T>> {
        let mut items = Vec::new();

        let iter = self.db.prefix_iterator(prefix);
        for item in iter {
            let (key, value) = item?;
            if key.starts_with(prefix) {
                items.push(serde_json::from_slice(&value)?);
            } else {
                break;
            }
        }

        Ok(items)
    }
}

fn piece_key(puzzle_id: &str, code: &str) -> String {
    format!("piece:{}:{}", puzzle_id, code)
}

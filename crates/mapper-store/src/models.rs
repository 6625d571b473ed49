//! Stored documents and edit payloads.

use chrono::{DateTime, Utc};
use mapper_topology::{Edge, Neighbor, Piece};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A puzzle being mapped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    /// Unique identifier (UUID v4)
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Declared piece count; may exceed the pieces mapped so far
    pub total_pieces: u32,

    /// Sector labels in the order they were defined
    pub sectors: Vec<String>,

    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Puzzle {
    /// Create a new puzzle with a fresh id.
    pub fn new(name: String, total_pieces: u32, sectors: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            total_pieces,
            sectors,
            created_at: Utc::now(),
        }
    }

    /// Whether `sector` is one of this puzzle's labels.
    pub fn has_sector(&self, sector: &str) -> bool {
        self.sectors.iter().any(|s| s == sector)
    }
}

/// Partial update of a puzzle; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PuzzleUpdate {
    /// New name
    pub name: Option<String>,
    /// New declared piece count
    pub total_pieces: Option<u32>,
    /// New sector labels
    pub sectors: Option<Vec<String>>,
}

/// A piece as stored, tagged with the puzzle it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PieceRecord {
    /// Owning puzzle
    pub puzzle_id: String,

    /// The piece itself
    #[serde(flatten)]
    pub piece: Piece,
}

/// Everything needed to map a new piece.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PieceDraft {
    /// Human-readable code, e.g. "P1"
    pub code: String,
    /// Sector label; must belong to the puzzle
    pub sector: String,
    /// Declared union points
    pub edges: Vec<Edge>,
    /// Neighbor links by code
    pub neighbors: Vec<Neighbor>,
}

/// Changes to an already mapped piece; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PieceUpdate {
    /// New sector label
    pub sector: Option<String>,
    /// Replacement edge list
    pub edges: Option<Vec<Edge>>,
    /// Replacement neighbor list
    pub neighbors: Option<Vec<Neighbor>>,
}

/// Split a comma-separated sector list, trimming labels and dropping blanks
/// and repeats while keeping first-seen order.
pub fn parse_sectors(input: &str) -> Vec<String> {
    normalize_sectors(input.split(','))
}

pub(crate) fn normalize_sectors<I, S>(sectors: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for sector in sectors {
        let sector = sector.as_ref().trim();
        if !sector.is_empty() && !out.iter().any(|s| s == sector) {
            out.push(sector.to_string());
        }
    }
    out
}

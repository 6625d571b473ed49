//! Puzzle Mapper Topology
//!
//! The connectivity graph of one jigsaw puzzle and the deterministic walk
//! over it.
//!
//! # Model
//!
//! A puzzle is a set of [`Piece`]s. Each piece declares its [`Edge`]s (union
//! points, identified by a small [`EdgeId`]) and, per edge, an optional
//! [`Neighbor`] naming the adjoining piece by its human-readable code.
//!
//! - Planar puzzles use edge slots 1..=4
//! - Layered/3D puzzles add slots 5 and 6 (top and bottom)
//!
//! Neighbor links are conceptually undirected but nothing enforces the
//! reverse link. References may also point at pieces that are not mapped yet
//! ("dangling"). Both states are expected and tolerated everywhere.
//!
//! # Traversal
//!
//! [`traverse`] performs a depth-first walk from a start piece, visiting
//! neighbors in ascending edge order. Each piece is entered at most once, so
//! the walk always terminates, whatever cycles or self-links the data holds.
//!
//! # Advisory Tooling
//!
//! - [`audit`] reports data-quality issues without rejecting anything
//! - [`find_missing_reverse_links`] suggests the back-links a mapper forgot

mod audit;
mod error;
mod index;
mod links;
mod piece;
mod traversal;

pub use audit::{audit, DataIssue};
pub use error::{Result, TopologyError};
pub use index::PieceIndex;
pub use links::{find_missing_reverse_links, missing_back_links, opposite_edge, LinkSuggestion};
pub use piece::{Edge, EdgeId, EdgeKind, Neighbor, ParseEdgeKindError, Piece};
pub use traversal::{traverse, DanglingReference, Traversal, TraversalEvent};

/// Edge slots on a planar piece.
pub const PLANAR_EDGES: u8 = 4;

/// Extra slots for layered puzzles (top and bottom).
pub const LAYER_EDGES: u8 = 2;

/// Highest edge id a piece may declare.
pub const MAX_EDGE_ID: u8 = 6;

const _: () = assert!(PLANAR_EDGES + LAYER_EDGES == MAX_EDGE_ID);

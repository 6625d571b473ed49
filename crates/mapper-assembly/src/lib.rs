//! Puzzle Mapper Assembly
//!
//! Turns a puzzle's connectivity graph into numbered, human-readable
//! assembly steps.
//!
//! # Output
//!
//! 1. A fixed preamble placing the base piece and stating how connections
//!    are numbered
//! 2. One "attach" step per link followed by the depth-first walk
//! 3. An inline warning wherever a neighbor is referenced but not mapped
//! 4. A closing summary of every missing piece, when there are any
//!
//! Generation never fails on the data itself. A start piece that does not
//! exist yields a single explanatory step instead of an error.
//!
//! # Example
//!
//! ```
//! use mapper_assembly::instructions_for;
//! use mapper_topology::Piece;
//!
//! let pieces = vec![
//!     Piece::new("1", "P1", "A").with_neighbor(1, "P2"),
//!     Piece::new("2", "P2", "A").with_neighbor(3, "P1"),
//! ];
//!
//! let instructions = instructions_for(&pieces, "P1");
//! assert_eq!(instructions.steps.len(), 2);
//! assert!(instructions.steps[1].starts_with("Attach piece P2 to Connection 1 of P1"));
//! ```

mod hints;
mod instructions;
mod labeling;
mod source;

pub use hints::reverse_link_hints;
pub use instructions::{instructions_for, InstructionGenerator, Instructions};
pub use labeling::{Labeling, ParseLabelingError};
pub use source::{MemorySnapshot, SnapshotProvider};

//! Puzzle Mapper Store
//!
//! Persistence and editing rules for puzzles and their mapped pieces.
//!
//! # Architecture
//!
//! - **Models**: Puzzle documents and piece records
//! - **Storage**: RocksDB-backed key/value persistence (JSON values)
//! - **Service**: Validated create/read/update/delete, and the snapshot
//!   provider the instruction generator reads from
//! - **Config**: Environment-driven settings
//!
//! # Example
//!
//! ```no_run
//! use mapper_store::{MapperConfig, PuzzleService};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MapperConfig::from_env();
//!     let service = PuzzleService::open(&config)?;
//!     let puzzle = service.add_puzzle("Caracol Espiral", 500, &["A".into(), "B".into()])?;
//!     println!("created {}", puzzle.id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod storage;

pub use config::MapperConfig;
pub use error::{Error, Result};
pub use models::{parse_sectors, PieceDraft, PieceRecord, PieceUpdate, Puzzle, PuzzleUpdate};
pub use service::PuzzleService;
pub use storage::Storage;

//! Error types for mapper-topology.

use thiserror::Error;

/// Result type for topology operations.
pub type Result<T> = std::result::Result<T, TopologyError>;

/// Errors that can occur while walking a puzzle graph.
///
/// Dangling references and malformed edge slots are not errors; they are
/// reported through [`crate::Traversal`] and [`crate::audit`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// The requested start piece is not in the snapshot.
    #[error("start piece '{code}' not found")]
    StartNotFound {
        /// Code that was asked for
        code: String,
    },
}

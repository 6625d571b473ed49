//! `--edge id:kind[:neighbor]` arguments.

use std::str::FromStr;

use mapper_topology::{Edge, EdgeKind, Neighbor, ParseEdgeKindError};
use thiserror::Error;

/// One edge as typed on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeSpec {
    /// Declared union point
    pub edge: Edge,
    /// Neighbor entry for the same slot (open when none was given)
    pub neighbor: Neighbor,
}

/// Malformed `--edge` argument.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EdgeSpecError {
    /// Wrong number of `:`-separated fields.
    #[error("expected id:kind[:neighbor], got '{0}'")]
    Shape(String),

    /// Edge id is not a small integer.
    #[error("edge id '{0}' is not a number between 1 and 255")]
    EdgeId(String),

    /// Unknown edge kind.
    #[error(transparent)]
    Kind(#[from] ParseEdgeKindError),
}

impl FromStr for EdgeSpec {
    type Err = EdgeSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        let (id, kind, neighbor) = match parts.as_slice() {
            [id, kind] => (*id, *kind, None),
            [id, kind, neighbor] => (*id, *kind, Some(*neighbor)),
            _ => return Err(EdgeSpecError::Shape(s.to_string())),
        };

        let edge_id: u8 = id
            .parse()
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| EdgeSpecError::EdgeId(id.to_string()))?;
        let kind: EdgeKind = kind.parse()?;

        let neighbor = match neighbor {
            None | Some("") | Some("-") => Neighbor::open(edge_id),
            Some(code) => Neighbor::linked(edge_id, code),
        };

        Ok(Self {
            edge: Edge::new(edge_id, kind),
            neighbor,
        })
    }
}

/// Split parsed specs into the edge and neighbor lists of a piece.
pub fn split(specs: Vec<EdgeSpec>) -> (Vec<Edge>, Vec<Neighbor>) {
    specs.into_iter().map(|s| (s.edge, s.neighbor)).unzip()
}

//! Pieces, edges and neighbor links.

use std::fmt;
use std::str::FromStr;

use crate::MAX_EDGE_ID;

/// A union-point slot on a piece's perimeter.
///
/// Conventionally 1..=4 for planar puzzles and up to 6 for layered ones.
/// The number is a slot identifier, not a compass direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EdgeId(pub u8);

impl EdgeId {
    /// Create from a raw slot number.
    #[inline]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw slot number.
    #[inline]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Whether the slot lies in the supported 1..=6 range.
    pub const fn is_valid(&self) -> bool {
        self.0 >= 1 && self.0 <= MAX_EDGE_ID
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for EdgeId {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

/// Shape of a union point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EdgeKind {
    /// Protrusion ("macho").
    #[cfg_attr(feature = "serde", serde(alias = "macho"))]
    Convex,
    /// Socket ("hembra").
    #[cfg_attr(feature = "serde", serde(alias = "hembra"))]
    Concave,
}

impl EdgeKind {
    /// The shape that mates with this one.
    pub const fn complement(self) -> Self {
        match self {
            Self::Convex => Self::Concave,
            Self::Concave => Self::Convex,
        }
    }

    /// Lowercase name used in documents and on the command line.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Convex => "convex",
            Self::Concave => "concave",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an edge kind name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown edge kind '{0}' (expected convex, concave, macho or hembra)")]
pub struct ParseEdgeKindError(pub String);

impl FromStr for EdgeKind {
    type Err = ParseEdgeKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "convex" | "macho" => Ok(Self::Convex),
            "concave" | "hembra" => Ok(Self::Concave),
            _ => Err(ParseEdgeKindError(s.to_string())),
        }
    }
}

/// A declared union point on a piece.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Edge {
    /// Slot identifier
    pub edge_id: EdgeId,
    /// Protrusion or socket
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: EdgeKind,
}

impl Edge {
    /// Create a new edge.
    pub fn new(edge_id: u8, kind: EdgeKind) -> Self {
        Self {
            edge_id: EdgeId(edge_id),
            kind,
        }
    }
}

/// The piece expected to connect at one edge slot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Neighbor {
    /// Slot this link occupies (should match a declared edge)
    pub edge_id: EdgeId,
    /// Code of the adjoining piece; `None` for an open edge
    #[cfg_attr(feature = "serde", serde(default))]
    pub code: Option<String>,
}

impl Neighbor {
    /// A link to another piece.
    pub fn linked(edge_id: u8, code: impl Into<String>) -> Self {
        Self {
            edge_id: EdgeId(edge_id),
            code: Some(code.into()),
        }
    }

    /// An edge with no known neighbor yet.
    pub fn open(edge_id: u8) -> Self {
        Self {
            edge_id: EdgeId(edge_id),
            code: None,
        }
    }

    /// Code of the linked piece. A blank code is an open edge.
    pub fn linked_code(&self) -> Option<&str> {
        self.code.as_deref().filter(|code| !code.trim().is_empty())
    }
}

/// One puzzle piece.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Piece {
    /// Opaque identity assigned by the store
    pub id: String,
    /// Human-readable code, unique within a puzzle (e.g. "P1")
    pub code: String,
    /// Logical zone label
    pub sector: String,
    /// Declared union points, in declaration order
    #[cfg_attr(feature = "serde", serde(default))]
    pub edges: Vec<Edge>,
    /// Neighbor links keyed by edge id
    #[cfg_attr(feature = "serde", serde(default))]
    pub neighbors: Vec<Neighbor>,
}

impl Piece {
    /// Create a piece with no edges or neighbors.
    pub fn new(id: impl Into<String>, code: impl Into<String>, sector: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            sector: sector.into(),
            edges: Vec::new(),
            neighbors: Vec::new(),
        }
    }

    /// Builder: declare an edge.
    pub fn with_edge(mut self, edge_id: u8, kind: EdgeKind) -> Self {
        self.edges.push(Edge::new(edge_id, kind));
        self
    }

    /// Builder: link a neighbor on an edge.
    pub fn with_neighbor(mut self, edge_id: u8, code: impl Into<String>) -> Self {
        self.neighbors.push(Neighbor::linked(edge_id, code));
        self
    }

    /// Builder: mark an edge as open.
    pub fn with_open_edge(mut self, edge_id: u8) -> Self {
        self.neighbors.push(Neighbor::open(edge_id));
        self
    }

    /// Look up a declared edge.
    pub fn edge(&self, edge_id: EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.edge_id == edge_id)
    }

    /// Whether an edge with this id is declared.
    pub fn declares_edge(&self, edge_id: EdgeId) -> bool {
        self.edge(edge_id).is_some()
    }

    /// Whether any neighbor entry names `code`.
    pub fn links_to(&self, code: &str) -> bool {
        self.neighbors.iter().any(|n| n.linked_code() == Some(code))
    }

    /// Neighbor entries that name a piece, in ascending edge order.
    ///
    /// Blank codes are skipped like open edges. The sort is stable, so
    /// entries sharing an edge id keep their declaration order.
    pub fn links(&self) -> Vec<(EdgeId, &str)> {
        let mut links: Vec<(EdgeId, &str)> = self
            .neighbors
            .iter()
            .filter_map(|n| n.linked_code().map(|code| (n.edge_id, code)))
            .collect();
        links.sort_by_key(|&(edge, _)| edge);
        links
    }
}

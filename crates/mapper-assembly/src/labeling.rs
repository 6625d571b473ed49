//! How connections are named to the person assembling.

use std::fmt;
use std::str::FromStr;

use mapper_topology::EdgeId;

/// Connection naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Labeling {
    /// Connections are numbered clockwise around each piece, starting at 1.
    #[default]
    Clockwise,
    /// Fixed compass sides: 1 north, 2 east, 3 south, 4 west, 5 top, 6 bottom.
    Cardinal,
}

impl Labeling {
    /// Name of a connection on a piece, e.g. "Connection 2" or "the east side".
    pub fn connection(self, edge: EdgeId) -> String {
        match self {
            Self::Clockwise => format!("Connection {edge}"),
            Self::Cardinal => match edge.value() {
                1 => "the north side".to_string(),
                2 => "the east side".to_string(),
                3 => "the south side".to_string(),
                4 => "the west side".to_string(),
                5 => "the top".to_string(),
                6 => "the bottom".to_string(),
                _ => format!("edge {edge}"),
            },
        }
    }

    /// How to orient and number pieces, appended to the first step.
    pub fn numbering_rule(self) -> &'static str {
        match self {
            Self::Clockwise => {
                "Number the connections of every piece clockwise: walk the piece's \
                 perimeter clockwise, and the first union point you meet is Connection 1, \
                 the next is Connection 2, and so on."
            }
            Self::Cardinal => {
                "Keep every piece facing the same way as the base piece: its first \
                 connection faces north, then east, south and west; layered puzzles add \
                 a top and a bottom."
            }
        }
    }
}

impl fmt::Display for Labeling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clockwise => f.write_str("clockwise"),
            Self::Cardinal => f.write_str("cardinal"),
        }
    }
}

/// Error returned when a labeling name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown labeling '{0}' (expected clockwise or cardinal)")]
pub struct ParseLabelingError(pub String);

impl FromStr for Labeling {
    type Err = ParseLabelingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clockwise" => Ok(Self::Clockwise),
            "cardinal" | "compass" => Ok(Self::Cardinal),
            _ => Err(ParseLabelingError(s.to_string())),
        }
    }
}

//! Instruction generation from traversal events.

use std::fmt;

use mapper_topology::{
    audit, traverse, DataIssue, EdgeId, EdgeKind, Piece, PieceIndex, TopologyError,
    TraversalEvent,
};
use tracing::{debug, warn};

use crate::{Labeling, SnapshotProvider};

/// Ordered assembly steps plus what could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instructions {
    /// Code the assembly starts from
    pub start: String,
    /// Whether the start piece exists in the snapshot
    pub start_found: bool,
    /// Steps in the order they must be performed
    pub steps: Vec<String>,
    /// Referenced but unmapped codes, sorted and distinct
    pub missing: Vec<String>,
    /// Mapped codes the walk never reached, sorted
    pub unreachable: Vec<String>,
    /// Data-quality findings for the whole snapshot
    pub issues: Vec<DataIssue>,
}

impl Instructions {
    /// Steps paired with their 1-based display number.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &str)> {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| (i + 1, step.as_str()))
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether there are no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for Instructions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, step) in self.numbered() {
            writeln!(f, "{n}. {step}")?;
        }
        Ok(())
    }
}

/// Fetches a snapshot and generates instructions for it.
#[derive(Debug, Clone)]
pub struct InstructionGenerator<P> {
    provider: P,
    labeling: Labeling,
}

impl<P: SnapshotProvider> InstructionGenerator<P> {
    /// Create a generator with clockwise labeling.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            labeling: Labeling::default(),
        }
    }

    /// Builder: choose the connection labeling.
    pub fn with_labeling(mut self, labeling: Labeling) -> Self {
        self.labeling = labeling;
        self
    }

    /// Generate instructions for a puzzle starting from `start_code`.
    ///
    /// Only failures of the provider are returned as errors.
    pub fn generate(&self, puzzle_id: &str, start_code: &str) -> Result<Instructions, P::Error> {
        let pieces = self.provider.fetch_pieces(puzzle_id)?;
        debug!(puzzle_id, start_code, pieces = pieces.len(), "Loaded snapshot");
        Ok(generate(&pieces, start_code, self.labeling))
    }
}

/// Generate clockwise-labeled instructions for an in-memory snapshot.
pub fn instructions_for(pieces: &[Piece], start_code: &str) -> Instructions {
    generate(pieces, start_code, Labeling::Clockwise)
}

pub(crate) fn generate(pieces: &[Piece], start_code: &str, labeling: Labeling) -> Instructions {
    let index = PieceIndex::new(pieces);
    let issues = audit(pieces);
    let mut steps = Vec::with_capacity(pieces.len() + 1);

    if index.contains(start_code) {
        steps.push(preamble(start_code, labeling));
    }

    let walk = traverse(&index, start_code, |event| match event {
        TraversalEvent::Attach { from, to, edge } => {
            steps.push(attach_step(from, to, edge, labeling));
        }
        TraversalEvent::Dangling {
            from,
            edge,
            missing,
        } => {
            warn!(from = %from.code, %edge, missing, "Neighbor not in puzzle data");
            steps.push(dangling_step(&from.code, edge, missing, labeling));
        }
    });

    let walk = match walk {
        Ok(walk) => walk,
        Err(TopologyError::StartNotFound { code }) => {
            debug!(start_code = %code, "Start piece not found");
            return Instructions {
                start: code.clone(),
                start_found: false,
                steps: vec![format!(
                    "Cannot generate instructions: the start piece {code} was not found in this \
                     puzzle. Choose one of the mapped pieces as the base."
                )],
                missing: Vec::new(),
                unreachable: pieces
                    .iter()
                    .map(|p| p.code.clone())
                    .collect::<std::collections::BTreeSet<_>>()
                    .into_iter()
                    .collect(),
                issues,
            };
        }
    };

    let missing = walk.missing_codes();
    if !missing.is_empty() {
        steps.push(format!(
            "Unresolved pieces: {}. They are referenced as neighbors but absent from the \
             puzzle data; map them to complete the assembly.",
            missing.join(", ")
        ));
    }

    let unreachable = walk.unreachable(&index);
    debug!(
        start_code,
        steps = steps.len(),
        missing = missing.len(),
        unreachable = unreachable.len(),
        "Generated instructions"
    );

    Instructions {
        start: start_code.to_string(),
        start_found: true,
        steps,
        missing,
        unreachable,
        issues,
    }
}

fn preamble(start_code: &str, labeling: Labeling) -> String {
    format!(
        "Place piece {start_code} on your work surface as the base piece; every other piece is \
         positioned relative to it. {}",
        labeling.numbering_rule()
    )
}

fn attach_step(from: &Piece, to: &Piece, edge: EdgeId, labeling: Labeling) -> String {
    let connection = labeling.connection(edge);
    let mut step = format!(
        "Attach piece {} to {connection} of {}: locate the matching union point on {} and mate \
         it with {connection}.",
        to.code, from.code, to.code
    );

    if let Some(kind) = from.edge(edge).map(|e| e.kind) {
        step.push_str(&format!(
            " {} has a {} there, so look for a {} on {}.",
            from.code,
            shape(kind),
            shape(kind.complement()),
            to.code
        ));
    }
    step
}

fn shape(kind: EdgeKind) -> &'static str {
    match kind {
        EdgeKind::Convex => "protrusion",
        EdgeKind::Concave => "socket",
    }
}

fn dangling_step(from: &str, edge: EdgeId, missing: &str, labeling: Labeling) -> String {
    let connection = labeling.connection(edge);
    format!(
        "Warning: piece {missing} should attach to {connection} of {from}, but it is not in \
         the puzzle data. Leave {connection} open and continue."
    )
}

//! Puzzle service: validated edits over [`Storage`].
//!
//! All connection changes for a piece arrive as explicit parameters
//! ([`PieceDraft`], [`PieceUpdate`]); the service keeps no editing session.

use std::collections::HashSet;

use mapper_assembly::SnapshotProvider;
use mapper_topology::{audit, Edge, Neighbor, Piece, PieceIndex, MAX_EDGE_ID};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::MapperConfig;
use crate::error::{Error, Result};
use crate::models::{normalize_sectors, PieceDraft, PieceRecord, PieceUpdate, Puzzle, PuzzleUpdate};
use crate::storage::Storage;

/// Puzzle and piece operations with validation.
pub struct PuzzleService {
    storage: Storage,
}

impl PuzzleService {
    /// Wrap an open storage.
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Open the storage named by the config.
    pub fn open(config: &MapperConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;
        Ok(Self::new(Storage::open(&config.data_dir)?))
    }

    // --- Puzzles ---

    /// Create a puzzle.
    pub fn add_puzzle(&self, name: &str, total_pieces: u32, sectors: &[String]) -> Result<Puzzle> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("puzzle name is required".into()));
        }
        if total_pieces == 0 {
            return Err(Error::InvalidInput("total pieces must be at least 1".into()));
        }
        let sectors = normalize_sectors(sectors);
        if sectors.is_empty() {
            return Err(Error::InvalidInput("at least one sector is required".into()));
        }

        let puzzle = Puzzle::new(name.to_string(), total_pieces, sectors);
        self.storage.put_puzzle(&puzzle)?;
        info!(id = %puzzle.id, name = %puzzle.name, "Created puzzle");
        Ok(puzzle)
    }

    /// Get a puzzle by ID.
    pub fn get_puzzle(&self, id: &str) -> Result<Option<Puzzle>> {
        self.storage.get_puzzle(id)
    }

    /// List all puzzles, oldest first.
    pub fn list_puzzles(&self) -> Result<Vec<Puzzle>> {
        let mut puzzles = self.storage.list_puzzles()?;
        puzzles.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(puzzles)
    }

    /// Apply a partial update to a puzzle.
    pub fn update_puzzle(&self, id: &str, update: PuzzleUpdate) -> Result<Puzzle> {
        let mut puzzle = self.require_puzzle(id)?;

        if let Some(name) = update.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(Error::InvalidInput("puzzle name is required".into()));
            }
            puzzle.name = name.to_string();
        }
        if let Some(total) = update.total_pieces {
            if total == 0 {
                return Err(Error::InvalidInput("total pieces must be at least 1".into()));
            }
            puzzle.total_pieces = total;
        }
        if let Some(sectors) = update.sectors {
            let sectors = normalize_sectors(sectors);
            if sectors.is_empty() {
                return Err(Error::InvalidInput("at least one sector is required".into()));
            }
            puzzle.sectors = sectors;
        }

        self.storage.put_puzzle(&puzzle)?;
        info!(id = %puzzle.id, "Updated puzzle");
        Ok(puzzle)
    }

    /// Delete a puzzle and all of its pieces. Returns false if it did not exist.
    pub fn remove_puzzle(&self, id: &str) -> Result<bool> {
        if self.storage.get_puzzle(id)?.is_none() {
            return Ok(false);
        }
        let pieces = self.storage.list_pieces(id)?;
        for record in &pieces {
            self.storage.delete_piece(id, &record.piece.code)?;
        }
        self.storage.delete_puzzle(id)?;
        info!(id, pieces = pieces.len(), "Removed puzzle");
        Ok(true)
    }

    // --- Pieces ---

    /// Map a new piece into a puzzle.
    pub fn add_piece(&self, puzzle_id: &str, draft: PieceDraft) -> Result<Piece> {
        let puzzle = self.require_puzzle(puzzle_id)?;

        let code = draft.code.trim();
        if code.is_empty() {
            return Err(Error::InvalidInput("piece code is required".into()));
        }
        if self.storage.get_piece(puzzle_id, code)?.is_some() {
            return Err(Error::InvalidInput(format!(
                "piece {code} already exists in puzzle {puzzle_id}"
            )));
        }
        let sector = check_sector(&puzzle, &draft.sector)?;
        check_edges(&draft.edges)?;

        let mut piece = Piece::new(Uuid::new_v4().to_string(), code, sector);
        piece.edges = draft.edges;
        piece.neighbors = clean_neighbors(draft.neighbors);

        warn_issues(&piece);
        let mapped = self.storage.list_pieces(puzzle_id)?.len() + 1;
        if mapped > puzzle.total_pieces as usize {
            warn!(
                puzzle_id,
                mapped,
                declared = puzzle.total_pieces,
                "More pieces mapped than the puzzle declares"
            );
        }

        self.storage.put_piece(&PieceRecord {
            puzzle_id: puzzle_id.to_string(),
            piece: piece.clone(),
        })?;
        info!(puzzle_id, code = %piece.code, "Mapped piece");
        Ok(piece)
    }

    /// Get a piece by its code.
    pub fn get_piece(&self, puzzle_id: &str, code: &str) -> Result<Option<Piece>> {
        Ok(self.storage.get_piece(puzzle_id, code)?.map(|r| r.piece))
    }

    /// List the pieces of an existing puzzle.
    pub fn list_pieces(&self, puzzle_id: &str) -> Result<Vec<Piece>> {
        self.require_puzzle(puzzle_id)?;
        Ok(self
            .storage
            .list_pieces(puzzle_id)?
            .into_iter()
            .map(|r| r.piece)
            .collect())
    }

    /// Edit a mapped piece.
    pub fn update_piece(&self, puzzle_id: &str, code: &str, update: PieceUpdate) -> Result<Piece> {
        let puzzle = self.require_puzzle(puzzle_id)?;
        let mut record = self
            .storage
            .get_piece(puzzle_id, code)?
            .ok_or_else(|| Error::NotFound(format!("piece {code} in puzzle {puzzle_id}")))?;

        if let Some(sector) = update.sector {
            record.piece.sector = check_sector(&puzzle, &sector)?;
        }
        if let Some(edges) = update.edges {
            check_edges(&edges)?;
            record.piece.edges = edges;
        }
        if let Some(neighbors) = update.neighbors {
            record.piece.neighbors = clean_neighbors(neighbors);
        }

        warn_issues(&record.piece);
        self.storage.put_piece(&record)?;
        info!(puzzle_id, code, "Updated piece");
        Ok(record.piece)
    }

    /// Delete a piece by its store identity.
    ///
    /// Returns the codes of pieces whose links to it now dangle, sorted.
    pub fn remove_piece(&self, puzzle_id: &str, piece_id: &str) -> Result<Vec<String>> {
        let pieces = self.list_pieces(puzzle_id)?;
        let index = PieceIndex::new(&pieces);
        let code = index
            .code_of(piece_id)
            .ok_or_else(|| Error::NotFound(format!("piece id {piece_id} in puzzle {puzzle_id}")))?;

        self.storage.delete_piece(puzzle_id, code)?;

        let mut referrers: Vec<String> = pieces
            .iter()
            .filter(|p| p.code != code && p.links_to(code))
            .map(|p| p.code.clone())
            .collect();
        referrers.sort();
        referrers.dedup();

        if !referrers.is_empty() {
            warn!(puzzle_id, code, referrers = ?referrers, "Removed piece is still referenced");
        }
        info!(puzzle_id, code, "Removed piece");
        Ok(referrers)
    }

    fn require_puzzle(&self, id: &str) -> Result<Puzzle> {
        self.storage
            .get_puzzle(id)?
            .ok_or_else(|| Error::NotFound(format!("puzzle {id}")))
    }
}

impl SnapshotProvider for PuzzleService {
    type Error = Error;

    fn fetch_pieces(&self, puzzle_id: &str) -> Result<Vec<Piece>> {
        self.list_pieces(puzzle_id)
    }

    fn fetch_piece(&self, puzzle_id: &str, code: &str) -> Result<Option<Piece>> {
        self.get_piece(puzzle_id, code)
    }
}

fn check_sector(puzzle: &Puzzle, sector: &str) -> Result<String> {
    let sector = sector.trim();
    if !puzzle.has_sector(sector) {
        return Err(Error::InvalidInput(format!(
            "sector '{sector}' is not one of {:?}",
            puzzle.sectors
        )));
    }
    Ok(sector.to_string())
}

fn check_edges(edges: &[Edge]) -> Result<()> {
    let mut seen = HashSet::new();
    for edge in edges {
        if !edge.edge_id.is_valid() {
            return Err(Error::InvalidInput(format!(
                "edge {} is outside 1..={MAX_EDGE_ID}",
                edge.edge_id
            )));
        }
        if !seen.insert(edge.edge_id) {
            return Err(Error::InvalidInput(format!(
                "edge {} is declared twice",
                edge.edge_id
            )));
        }
    }
    Ok(())
}

fn clean_neighbors(neighbors: Vec<Neighbor>) -> Vec<Neighbor> {
    neighbors
        .into_iter()
        .map(|n| Neighbor {
            edge_id: n.edge_id,
            code: n
                .code
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        })
        .collect()
}

fn warn_issues(piece: &Piece) {
    for issue in audit(std::slice::from_ref(piece)) {
        warn!(code = %piece.code, "{}", issue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapper_assembly::InstructionGenerator;
    use mapper_topology::EdgeKind;
    use tempfile::{tempdir, TempDir};

    fn service() -> (TempDir, PuzzleService) {
        let dir = tempdir().unwrap();
        let service = PuzzleService::new(Storage::open(dir.path()).unwrap());
        (dir, service)
    }

    fn sectors() -> Vec<String> {
        vec!["A".into(), "B".into()]
    }

    fn draft(code: &str, links: &[(u8, &str)]) -> PieceDraft {
        PieceDraft {
            code: code.into(),
            sector: "A".into(),
            edges: (1..=4u8)
                .map(|e| {
                    let kind = if e % 2 == 0 {
                        EdgeKind::Concave
                    } else {
                        EdgeKind::Convex
                    };
                    Edge::new(e, kind)
                })
                .collect(),
            neighbors: links
                .iter()
                .map(|&(edge, code)| Neighbor::linked(edge, code))
                .collect(),
        }
    }

    #[test]
    fn add_puzzle_validates() {
        let (_dir, service) = service();

        assert!(matches!(
            service.add_puzzle("  ", 10, &sectors()),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            service.add_puzzle("Caracol", 0, &sectors()),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            service.add_puzzle("Caracol", 10, &[" ".into()]),
            Err(Error::InvalidInput(_))
        ));

        let puzzle = service
            .add_puzzle(" Caracol ", 10, &["B".into(), " A".into(), "B".into()])
            .unwrap();
        assert_eq!(puzzle.name, "Caracol");
        assert_eq!(puzzle.sectors, vec!["B", "A"]);
        assert_eq!(service.get_puzzle(&puzzle.id).unwrap(), Some(puzzle));
    }

    #[test]
    fn update_and_list_puzzles() {
        let (_dir, service) = service();
        let first = service.add_puzzle("One", 4, &sectors()).unwrap();
        service.add_puzzle("Two", 4, &sectors()).unwrap();

        let updated = service
            .update_puzzle(
                &first.id,
                PuzzleUpdate {
                    name: Some("Uno".into()),
                    total_pieces: Some(9),
                    sectors: None,
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Uno");
        assert_eq!(updated.total_pieces, 9);
        assert_eq!(updated.sectors, sectors());

        let names: Vec<String> = service
            .list_puzzles()
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"Uno".to_string()));

        assert!(matches!(
            service.update_puzzle("nope", PuzzleUpdate::default()),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn add_piece_rules() {
        let (_dir, service) = service();
        let puzzle = service.add_puzzle("Caracol", 4, &sectors()).unwrap();

        assert!(matches!(
            service.add_piece("missing", draft("P1", &[])),
            Err(Error::NotFound(_))
        ));

        service.add_piece(&puzzle.id, draft("P1", &[])).unwrap();
        assert!(matches!(
            service.add_piece(&puzzle.id, draft("P1", &[])),
            Err(Error::InvalidInput(_))
        ));

        let mut bad_sector = draft("P2", &[]);
        bad_sector.sector = "Z".into();
        assert!(matches!(
            service.add_piece(&puzzle.id, bad_sector),
            Err(Error::InvalidInput(_))
        ));

        let mut bad_edge = draft("P2", &[]);
        bad_edge.edges.push(Edge::new(7, EdgeKind::Convex));
        assert!(matches!(
            service.add_piece(&puzzle.id, bad_edge),
            Err(Error::InvalidInput(_))
        ));

        let mut repeated = draft("P2", &[]);
        repeated.edges.push(Edge::new(1, EdgeKind::Concave));
        assert!(matches!(
            service.add_piece(&puzzle.id, repeated),
            Err(Error::InvalidInput(_))
        ));

        let mut blank = draft("  ", &[]);
        blank.sector = "B".into();
        assert!(matches!(
            service.add_piece(&puzzle.id, blank),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn undeclared_neighbor_edge_is_accepted() {
        let (_dir, service) = service();
        let puzzle = service.add_puzzle("Caracol", 4, &sectors()).unwrap();

        let piece = service
            .add_piece(&puzzle.id, draft("P1", &[(5, "P2")]))
            .unwrap();
        assert_eq!(piece.neighbors.len(), 1);
    }

    #[test]
    fn blank_neighbor_codes_become_open() {
        let (_dir, service) = service();
        let puzzle = service.add_puzzle("Caracol", 4, &sectors()).unwrap();

        let piece = service
            .add_piece(&puzzle.id, draft("P1", &[(1, " "), (2, " P2 ")]))
            .unwrap();
        assert_eq!(piece.neighbors[0].code, None);
        assert_eq!(piece.neighbors[1].code.as_deref(), Some("P2"));
    }

    #[test]
    fn update_piece_replaces_links() {
        let (_dir, service) = service();
        let puzzle = service.add_puzzle("Caracol", 4, &sectors()).unwrap();
        service.add_piece(&puzzle.id, draft("P1", &[])).unwrap();

        let updated = service
            .update_piece(
                &puzzle.id,
                "P1",
                PieceUpdate {
                    sector: Some("B".into()),
                    edges: None,
                    neighbors: Some(vec![Neighbor::linked(2, "P2")]),
                },
            )
            .unwrap();
        assert_eq!(updated.sector, "B");
        assert!(updated.links_to("P2"));
        assert_eq!(service.get_piece(&puzzle.id, "P1").unwrap(), Some(updated));

        assert!(matches!(
            service.update_piece(&puzzle.id, "P9", PieceUpdate::default()),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn remove_piece_reports_dangling_referrers() {
        let (_dir, service) = service();
        let puzzle = service.add_puzzle("Caracol", 4, &sectors()).unwrap();
        let p1 = service.add_piece(&puzzle.id, draft("P1", &[(2, "P2")])).unwrap();
        service.add_piece(&puzzle.id, draft("P2", &[(4, "P1")])).unwrap();
        service.add_piece(&puzzle.id, draft("P3", &[(1, "P1")])).unwrap();

        let referrers = service.remove_piece(&puzzle.id, &p1.id).unwrap();
        assert_eq!(referrers, vec!["P2", "P3"]);
        assert!(service.get_piece(&puzzle.id, "P1").unwrap().is_none());

        assert!(matches!(
            service.remove_piece(&puzzle.id, &p1.id),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn remove_puzzle_drops_pieces() {
        let (_dir, service) = service();
        let puzzle = service.add_puzzle("Caracol", 4, &sectors()).unwrap();
        service.add_piece(&puzzle.id, draft("P1", &[])).unwrap();

        assert!(service.remove_puzzle(&puzzle.id).unwrap());
        assert!(!service.remove_puzzle(&puzzle.id).unwrap());
        assert!(service.storage.list_pieces(&puzzle.id).unwrap().is_empty());
        assert!(matches!(
            service.list_pieces(&puzzle.id),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn generates_from_stored_snapshot() {
        let (_dir, service) = service();
        let puzzle = service.add_puzzle("Caracol", 3, &sectors()).unwrap();
        service.add_piece(&puzzle.id, draft("P1", &[(2, "P2")])).unwrap();
        service
            .add_piece(&puzzle.id, draft("P2", &[(4, "P1"), (3, "P7")]))
            .unwrap();

        let out = InstructionGenerator::new(&service)
            .generate(&puzzle.id, "P1")
            .unwrap();

        assert_eq!(out.steps.len(), 4);
        assert!(out.steps[1].starts_with("Attach piece P2 to Connection 2 of P1"));
        assert!(out.steps[2].contains("P7"));
        assert_eq!(out.missing, vec!["P7"]);

        assert!(matches!(
            InstructionGenerator::new(&service).generate("nope", "P1"),
            Err(Error::NotFound(_))
        ));
    }
}

//! Subcommand handlers. Output goes to the given writer; logs go to stderr.

use std::io::Write;

use anyhow::{bail, Context, Result};
use mapper_assembly::{reverse_link_hints, InstructionGenerator, Labeling};
use mapper_store::{parse_sectors, PieceDraft, PieceUpdate, PuzzleService};
use mapper_topology::find_missing_reverse_links;
use tracing::{info, warn};

use crate::edge_spec::{split, EdgeSpec};

pub fn create_puzzle<W: Write>(
    service: &PuzzleService,
    out: &mut W,
    name: &str,
    total_pieces: u32,
    sectors: &str,
) -> Result<()> {
    let puzzle = service.add_puzzle(name, total_pieces, &parse_sectors(sectors))?;
    writeln!(out, "Created puzzle {} ({})", puzzle.name, puzzle.id)?;
    Ok(())
}

pub fn list_puzzles<W: Write>(service: &PuzzleService, out: &mut W) -> Result<()> {
    let puzzles = service.list_puzzles()?;
    if puzzles.is_empty() {
        writeln!(out, "(none)")?;
    }
    for p in puzzles {
        writeln!(
            out,
            "{}  {}  pieces: {}  sectors: {}",
            p.id,
            p.name,
            p.total_pieces,
            p.sectors.join(",")
        )?;
    }
    Ok(())
}

pub fn map_piece<W: Write>(
    service: &PuzzleService,
    out: &mut W,
    puzzle_id: &str,
    code: &str,
    sector: &str,
    edges: Vec<EdgeSpec>,
) -> Result<()> {
    let (edges, neighbors) = split(edges);
    let piece = service
        .add_piece(
            puzzle_id,
            PieceDraft {
                code: code.to_string(),
                sector: sector.to_string(),
                edges,
                neighbors,
            },
        )
        .with_context(|| format!("could not map piece {code}"))?;
    writeln!(out, "Mapped piece {} ({})", piece.code, piece.id)?;

    for hint in reverse_link_hints(service, puzzle_id, &piece.code)? {
        writeln!(out, "hint: {hint}")?;
    }
    Ok(())
}

pub fn edit_piece<W: Write>(
    service: &PuzzleService,
    out: &mut W,
    puzzle_id: &str,
    code: &str,
    sector: Option<String>,
    edges: Vec<EdgeSpec>,
) -> Result<()> {
    let update = if edges.is_empty() {
        PieceUpdate {
            sector,
            ..PieceUpdate::default()
        }
    } else {
        let (edges, neighbors) = split(edges);
        PieceUpdate {
            sector,
            edges: Some(edges),
            neighbors: Some(neighbors),
        }
    };
    if update == PieceUpdate::default() {
        bail!("nothing to change: pass --sector or at least one --edge");
    }

    let piece = service.update_piece(puzzle_id, code, update)?;
    writeln!(out, "Updated piece {}", piece.code)?;

    for hint in reverse_link_hints(service, puzzle_id, &piece.code)? {
        writeln!(out, "hint: {hint}")?;
    }
    Ok(())
}

pub fn list_pieces<W: Write>(
    service: &PuzzleService,
    out: &mut W,
    puzzle_id: &str,
) -> Result<()> {
    let pieces = service.list_pieces(puzzle_id)?;
    if pieces.is_empty() {
        writeln!(out, "(none)")?;
    }
    for piece in pieces {
        let links: Vec<String> = piece
            .links()
            .into_iter()
            .map(|(edge, code)| format!("{edge}->{code}"))
            .collect();
        writeln!(
            out,
            "{}  sector: {}  id: {}  links: {}",
            piece.code,
            piece.sector,
            piece.id,
            if links.is_empty() { "-".to_string() } else { links.join(" ") }
        )?;
    }
    Ok(())
}

pub fn remove_piece<W: Write>(
    service: &PuzzleService,
    out: &mut W,
    puzzle_id: &str,
    piece_id: &str,
) -> Result<()> {
    let referrers = service.remove_piece(puzzle_id, piece_id)?;
    writeln!(out, "Removed piece {piece_id}")?;
    if !referrers.is_empty() {
        writeln!(out, "still referenced by: {}", referrers.join(", "))?;
    }
    Ok(())
}

pub fn instructions<W: Write>(
    service: &PuzzleService,
    out: &mut W,
    puzzle_id: &str,
    start: &str,
    labeling: Labeling,
) -> Result<()> {
    let instructions = InstructionGenerator::new(service)
        .with_labeling(labeling)
        .generate(puzzle_id, start)?;

    for issue in &instructions.issues {
        warn!(piece = issue.code(), "{}", issue);
    }
    if !instructions.unreachable.is_empty() {
        info!(
            unreachable = %instructions.unreachable.join(","),
            "Pieces not connected to the start piece"
        );
    }

    write!(out, "{instructions}")?;
    Ok(())
}

pub fn suggest_links<W: Write>(
    service: &PuzzleService,
    out: &mut W,
    puzzle_id: &str,
) -> Result<()> {
    let pieces = service.list_pieces(puzzle_id)?;
    let suggestions = find_missing_reverse_links(&pieces);
    if suggestions.is_empty() {
        writeln!(out, "All links are mapped in both directions.")?;
    }
    for suggestion in suggestions {
        writeln!(out, "{suggestion}")?;
    }
    Ok(())
}

//! Puzzle Mapper command line
//!
//! Map the pieces of a jigsaw puzzle and print step-by-step assembly
//! instructions from any start piece.

mod commands;
mod edge_spec;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mapper_assembly::Labeling;
use mapper_store::{MapperConfig, PuzzleService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::edge_spec::EdgeSpec;

#[derive(Parser)]
#[command(
    name = "puzzle-mapper",
    version,
    about = "Map jigsaw pieces and generate assembly instructions"
)]
struct Cli {
    /// Storage directory (overrides MAPPER_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new puzzle
    CreatePuzzle {
        #[arg(long)]
        name: String,
        /// Number of pieces in the box
        #[arg(long)]
        total_pieces: u32,
        /// Comma-separated sector labels, e.g. "A,B,C"
        #[arg(long)]
        sectors: String,
    },

    /// List puzzles
    ListPuzzles,

    /// Map a new piece: `--edge 1:convex:P2 --edge 2:hembra`
    MapPiece {
        #[arg(long)]
        puzzle: String,
        #[arg(long)]
        code: String,
        #[arg(long)]
        sector: String,
        /// Edge as id:kind[:neighbor]; leave out the neighbor for an open edge
        #[arg(long = "edge")]
        edges: Vec<EdgeSpec>,
    },

    /// Change a piece's sector or replace its edges
    EditPiece {
        #[arg(long)]
        puzzle: String,
        #[arg(long)]
        code: String,
        #[arg(long)]
        sector: Option<String>,
        /// Replaces every edge and neighbor of the piece
        #[arg(long = "edge")]
        edges: Vec<EdgeSpec>,
    },

    /// List the pieces of a puzzle
    ListPieces {
        #[arg(long)]
        puzzle: String,
    },

    /// Delete a piece by its id
    RemovePiece {
        #[arg(long)]
        puzzle: String,
        #[arg(long)]
        piece_id: String,
    },

    /// Print assembly instructions starting from a piece
    Instructions {
        #[arg(long)]
        puzzle: String,
        #[arg(long)]
        start: String,
        /// How connections are named: clockwise or cardinal
        #[arg(long, default_value_t = Labeling::Clockwise)]
        labeling: Labeling,
        /// Shorthand for `--labeling cardinal`
        #[arg(long, conflicts_with = "labeling")]
        cardinal: bool,
    },

    /// Report links that are only recorded on one side
    SuggestLinks {
        #[arg(long)]
        puzzle: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = MapperConfig::from_env();
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    tracing::debug!(data_dir = %config.data_dir.display(), "Opening storage");
    let service = PuzzleService::open(&config)?;
    let mut out = io::stdout().lock();

    match cli.command {
        Command::CreatePuzzle {
            name,
            total_pieces,
            sectors,
        } => commands::create_puzzle(&service, &mut out, &name, total_pieces, &sectors),
        Command::ListPuzzles => commands::list_puzzles(&service, &mut out),
        Command::MapPiece {
            puzzle,
            code,
            sector,
            edges,
        } => commands::map_piece(&service, &mut out, &puzzle, &code, &sector, edges),
        Command::EditPiece {
            puzzle,
            code,
            sector,
            edges,
        } => commands::edit_piece(&service, &mut out, &puzzle, &code, sector, edges),
        Command::ListPieces { puzzle } => commands::list_pieces(&service, &mut out, &puzzle),
        Command::RemovePiece { puzzle, piece_id } => {
            commands::remove_piece(&service, &mut out, &puzzle, &piece_id)
        }
        Command::Instructions {
            puzzle,
            start,
            labeling,
            cardinal,
        } => {
            let labeling = if cardinal { Labeling::Cardinal } else { labeling };
            commands::instructions(&service, &mut out, &puzzle, &start, labeling)
        }
        Command::SuggestLinks { puzzle } => commands::suggest_links(&service, &mut out, &puzzle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_repeated_edges() {
        let cli = Cli::try_parse_from([
            "puzzle-mapper",
            "--data-dir",
            "/tmp/x",
            "map-piece",
            "--puzzle",
            "pz",
            "--code",
            "P1",
            "--sector",
            "A",
            "--edge",
            "1:convex:P2",
            "--edge",
            "2:hembra",
        ])
        .unwrap();

        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        match cli.command {
            Command::MapPiece { code, edges, .. } => {
                assert_eq!(code, "P1");
                assert_eq!(edges.len(), 2);
                assert_eq!(edges[1].neighbor.code, None);
            }
            _ => panic!("expected map-piece"),
        }
    }

    #[test]
    fn rejects_malformed_edge() {
        assert!(Cli::try_parse_from([
            "puzzle-mapper",
            "map-piece",
            "--puzzle",
            "pz",
            "--code",
            "P1",
            "--sector",
            "A",
            "--edge",
            "1:round",
        ])
        .is_err());
    }

    #[test]
    fn cardinal_flag() {
        let cli = Cli::try_parse_from([
            "puzzle-mapper",
            "instructions",
            "--puzzle",
            "pz",
            "--start",
            "P1",
            "--cardinal",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Instructions {
                cardinal: true,
                ..
            }
        ));
    }

    #[test]
    fn labeling_option() {
        let cli = Cli::try_parse_from([
            "puzzle-mapper",
            "instructions",
            "--puzzle",
            "pz",
            "--start",
            "P1",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Instructions {
                labeling: Labeling::Clockwise,
                cardinal: false,
                ..
            }
        ));

        let cli = Cli::try_parse_from([
            "puzzle-mapper",
            "instructions",
            "--puzzle",
            "pz",
            "--start",
            "P1",
            "--labeling",
            "cardinal",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Instructions {
                labeling: Labeling::Cardinal,
                ..
            }
        ));

        assert!(Cli::try_parse_from([
            "puzzle-mapper",
            "instructions",
            "--puzzle",
            "pz",
            "--start",
            "P1",
            "--labeling",
            "spiral",
        ])
        .is_err());
    }
}

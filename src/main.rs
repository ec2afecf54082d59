//! # `sudoku_solver`
//!
//! A command-line Sudoku solver. Puzzles are read as 81-digit lines
//! ('0' = blank, row-major) from a file, a directory of files, or the
//! command line itself, and solved by constraint propagation interleaved
//! with backtracking search over a minimum-remaining-values pivot.
//!
//! ## Usage
//!
//! ```sh
//! # Solve every puzzle in a file (one 81-digit line per puzzle)
//! sudoku_solver puzzles.txt
//!
//! # The same, spelled out
//! sudoku_solver file --path puzzles.txt
//!
//! # Batch-solve every .txt puzzle file under a directory
//! sudoku_solver dir --path collections/
//!
//! # Solve a puzzle given inline
//! sudoku_solver text --input 800000000003600000070090200050007000...
//!
//! # Generate shell completions
//! sudoku_solver completions bash
//! ```
//!
//! ### Common options
//!
//! -   `-d, --debug`: print the parsed puzzle before solving.
//! -   `-v, --verify`: re-check each solution against the rules (default: `true`).
//! -   `-s, --stats`: print per-puzzle search statistics (default: `true`).
//! -   `-c, --compact`: print solutions as 81-digit lines instead of grids.
//!
//! Invalid puzzles (clues that already clash) are reported distinctly and
//! skipped; unsolvable puzzles are reported after the search exhausts every
//! branch. A batch summary with solved/unsolvable/invalid counts and timing
//! follows each file.

use clap::Parser;

use crate::command_line::cli::{self, Cli, Commands};

mod command_line;

/// Global allocator using `tikv-jemallocator`, which also backs the memory
/// figures in the statistics tables.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

/// Dispatches the parsed command line to the matching driver.
fn run(cli: Cli) -> Result<(), String> {
    // A bare path argument solves a file, or a whole directory of them.
    if let Some(path) = &cli.path {
        if cli.command.is_none() {
            return if path.is_dir() {
                cli::solve_dir(path, &cli.common)
            } else {
                cli::solve_puzzle_file(path, &cli.common)
            };
        }
    }

    match cli.command {
        Some(Commands::File { path, common }) => cli::solve_puzzle_file(&path, &common),
        Some(Commands::Text { input, common }) => cli::solve_text(&input, &common),
        Some(Commands::Dir { path, common }) => cli::solve_dir(&path, &common),
        Some(Commands::Completions { shell }) => {
            cli::generate_completions(shell);
            Ok(())
        }
        None => Err("No command provided. Use --help for more information.".into()),
    }
}

#![allow(clippy::cast_precision_loss)]

//! Argument definitions and the drivers behind each subcommand: solving a
//! single inline puzzle, a puzzle file, or a whole directory of them, with
//! per-puzzle statistics and a batch summary.

use clap::{Args, CommandFactory, Parser, Subcommand};
use itertools::Itertools;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use sudoku_solver::sudoku::grid::{CELL_COUNT, Cell, Grid};
use sudoku_solver::sudoku::solver::{SolveStats, Solver};
use sudoku_solver::sudoku::source;
use tikv_jemalloc_ctl::{epoch, stats};
use walkdir::WalkDir;

/// Defines the command-line interface for the Sudoku solver application.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(
    name = "sudoku_solver",
    version,
    about = "A constraint propagation + backtracking Sudoku solver"
)]
pub(crate) struct Cli {
    /// An optional global path argument: a puzzle file to solve, or a
    /// directory whose puzzle files should all be solved.
    #[arg(global = true)]
    pub path: Option<PathBuf>,

    /// Specifies the subcommand to execute (e.g. `file`, `text`, `dir`).
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands for the solver.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve every puzzle in a file, one 81-digit line per puzzle.
    File {
        /// Path to the puzzle file.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a single puzzle given inline as 81 digits ('0' = blank).
    Text {
        /// The puzzle, row-major, e.g. "8000...0400".
        #[arg(short, long)]
        input: String,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve every .txt puzzle file under a directory.
    Dir {
        /// Path to the directory to scan.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct CommonOptions {
    /// Enable debug output: the parsed puzzle and its clue count are printed
    /// before solving.
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Re-check each solution against the Sudoku rules after solving.
    #[arg(short, long, default_value_t = true)]
    pub(crate) verify: bool,

    /// Print per-puzzle search statistics after solving.
    #[arg(short, long, default_value_t = true)]
    pub(crate) stats: bool,

    /// Print solutions as 81-digit lines instead of bordered grids.
    #[arg(short, long, default_value_t = false)]
    pub(crate) compact: bool,
}

/// Aggregate counters for a batch run.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct BatchReport {
    puzzles: usize,
    solved: usize,
    unsolvable: usize,
    invalid: usize,
    solve_time: Duration,
}

/// Solves a single puzzle passed inline on the command line.
pub(crate) fn solve_text(input: &str, common: &CommonOptions) -> Result<(), String> {
    let grid: Grid = input.parse().map_err(|e| format!("Bad puzzle input: {e}"))?;

    let mut report = BatchReport::default();
    solve_one(&grid, None, common, &mut report);
    Ok(())
}

/// Solves every puzzle in `path` and prints a batch summary.
///
/// # Errors
///
/// The path does not name a readable puzzle file, or a puzzle line fails to
/// parse.
pub(crate) fn solve_puzzle_file(path: &Path, common: &CommonOptions) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("Puzzle file does not exist: {}", path.display()));
    }

    if !path.is_file() {
        return Err(format!("Provided path is not a file: {}", path.display()));
    }

    let time = Instant::now();
    let grids =
        source::parse_file(path).map_err(|e| format!("Error reading {}: {e}", path.display()))?;
    let parse_time = time.elapsed();

    if grids.is_empty() {
        return Err(format!(
            "No 81-character puzzle lines in {}",
            path.display()
        ));
    }

    let mut report = BatchReport::default();
    for (index, grid) in grids.iter().enumerate() {
        let label = format!("{}#{}", path.display(), index + 1);
        solve_one(grid, Some(&label), common, &mut report);
    }

    print_batch_summary(parse_time, &report);
    Ok(())
}

/// Solves every `.txt` puzzle file under `path`, in path order.
///
/// # Errors
///
/// The path is not a directory, no puzzle files are found, or any single
/// file fails as in [`solve_puzzle_file`].
pub(crate) fn solve_dir(path: &Path, common: &CommonOptions) -> Result<(), String> {
    if !path.is_dir() {
        return Err(format!(
            "Provided path is not a directory: {}",
            path.display()
        ));
    }

    let files = WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .map(|entry| entry.path().to_path_buf())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "txt"))
        .sorted()
        .collect_vec();

    if files.is_empty() {
        return Err(format!("No .txt puzzle files under {}", path.display()));
    }

    for file in &files {
        solve_puzzle_file(file, common)?;
    }

    Ok(())
}

/// Generates completion scripts for `shell` on stdout.
pub(crate) fn generate_completions(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}

/// Validates, times, and solves one puzzle, printing the solution and the
/// per-puzzle statistics table.
fn solve_one(grid: &Grid, label: Option<&str>, common: &CommonOptions, report: &mut BatchReport) {
    report.puzzles += 1;

    if let Some(name) = label {
        println!("Solving: {name}");
    }

    if common.debug {
        println!("Parsed puzzle ({} clues):\n{grid}", grid.clue_count());
    }

    // Clashing clues are reported as invalid input, not as a failed search;
    // propagation alone cannot be relied on to notice them.
    if let Some(conflict) = grid.find_conflict() {
        println!("Invalid puzzle: {conflict}");
        report.invalid += 1;
        return;
    }

    epoch::advance().unwrap();

    let time = Instant::now();
    let mut solver = Solver::new(grid);
    let solution = solver.solve();
    let elapsed = time.elapsed();

    report.solve_time += elapsed;

    match &solution {
        Some(solved) => {
            report.solved += 1;

            if common.verify {
                verify_solution(grid, solved);
            }

            if common.compact {
                println!("Solution: {}", solved.to_line());
            } else {
                println!("Solution:\n{solved}");
            }
        }
        None => {
            report.unsolvable += 1;
            println!("No solution found");
        }
    }

    if common.stats {
        let (allocated, resident) = read_memory();
        print_stats(
            elapsed,
            grid.clue_count(),
            &solver.stats(),
            allocated,
            resident,
            solution.is_some(),
        );
    }
}

/// Re-checks a solution against the rules and the original clues.
///
/// # Panics
///
/// If the solver produced a grid that breaks a uniqueness constraint or
/// moved a clue; either would be a solver bug.
fn verify_solution(puzzle: &Grid, solution: &Grid) {
    let ok = solution.is_solved()
        && Cell::all().all(|cell| puzzle.is_blank(cell) || puzzle.get(cell) == solution.get(cell));
    println!("Verified: {ok:?}");
    assert!(ok, "Solution failed verification!");
}

/// Reads allocated and resident memory from jemalloc, in MiB.
fn read_memory() -> (f64, f64) {
    epoch::advance().unwrap();

    let allocated_bytes = stats::allocated::mib().unwrap().read().unwrap();
    let resident_bytes = stats::resident::mib().unwrap().read().unwrap();

    (
        allocated_bytes as f64 / (1024.0 * 1024.0),
        resident_bytes as f64 / (1024.0 * 1024.0),
    )
}

/// Helper function to print a single statistic line in a formatted table row.
fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Helper function to print a statistic line that includes a rate
/// (value/second).
fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Prints the per-puzzle statistics tables.
fn print_stats(
    elapsed: Duration,
    clues: usize,
    s: &SolveStats,
    allocated: f64,
    resident: f64,
    solved: bool,
) {
    let elapsed_secs = elapsed.as_secs_f64();

    println!("\n=======================[ Puzzle Statistics ]=========================");
    stat_line("Clues", clues);
    stat_line("Blanks", CELL_COUNT - clues);

    println!("========================[ Search Statistics ]========================");
    stat_line_with_rate("Propagations", s.propagations, elapsed_secs);
    stat_line_with_rate("Decisions", s.decisions, elapsed_secs);
    stat_line_with_rate("Dead ends", s.dead_ends, elapsed_secs);
    stat_line("Max depth", s.max_depth);
    stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    stat_line("Solve time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");

    if solved {
        println!("\nSOLVED");
    } else {
        println!("\nUNSOLVABLE");
    }
}

/// Prints the aggregate table after a file or directory run.
fn print_batch_summary(parse_time: Duration, report: &BatchReport) {
    println!("\n=========================[ Batch Summary ]===========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Puzzles", report.puzzles);
    stat_line("Solved", report.solved);
    stat_line("Unsolvable", report.unsolvable);
    stat_line("Invalid", report.invalid);
    stat_line(
        "Total solve time (s)",
        format!("{:.3}", report.solve_time.as_secs_f64()),
    );

    let attempted = report.puzzles - report.invalid;
    if attempted > 0 {
        let mean_ms = report.solve_time.as_secs_f64() * 1000.0 / attempted as f64;
        stat_line("Mean solve time (ms)", format!("{mean_ms:.3}"));
    }
    println!("=====================================================================");
}

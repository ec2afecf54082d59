//! The propagation + backtracking Sudoku solver.
//!
//! The search alternates between two phases:
//!
//! 1.  **Propagation:** scan the board row-major and place every blank cell
//!     whose candidate set has shrunk to a single digit. Placements made
//!     early in a pass are visible to the cells scanned after them, and any
//!     pass that forces at least one placement triggers another full pass,
//!     since each placement can unlock further forced cells elsewhere.
//! 2.  **Branching:** once a pass forces nothing, take the blank cell with
//!     the fewest candidates seen during that pass (ties broken by scan
//!     order) and try each of its candidate digits in ascending order,
//!     recursing on a clone of the working grid. The first branch to reach a
//!     complete board wins; a branch whose clone runs some cell out of
//!     candidates is discarded wholesale.
//!
//! Cloning the whole grid per branch keeps speculative states independent:
//! there is no undo log, and a failed branch can never leak placements into
//! its parent. Recursion depth is bounded by the 81 cells, each frame owning
//! one 81-byte clone, so the search needs no explicit depth limit.

use crate::sudoku::candidates::{DigitSet, candidates};
use crate::sudoku::grid::{Cell, Grid};

/// Counters describing one [`Solver::solve`] run, including work done inside
/// branches that were later refuted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    /// Forced single-candidate placements made during propagation.
    pub propagations: usize,
    /// Speculative pivot assignments tried.
    pub decisions: usize,
    /// Branches refuted by a cell running out of candidates.
    pub dead_ends: usize,
    /// Deepest branching recursion reached.
    pub max_depth: usize,
}

/// Outcome of one full propagation pass over the board.
enum Scan {
    /// No blank cells remain.
    Complete,
    /// Some blank cell has no candidates left.
    Contradiction,
    /// The most constrained blank seen, ties broken by scan order. A
    /// single-digit set means the cell was just force-placed and another
    /// pass is worthwhile.
    Min {
        /// The pivot coordinate.
        cell: Cell,
        /// Its candidates at the moment it was scanned.
        digits: DigitSet,
    },
}

/// A single-puzzle solver holding the input snapshot and search counters.
#[derive(Debug, Clone)]
pub struct Solver {
    grid: Grid,
    stats: SolveStats,
}

impl Solver {
    /// Creates a solver over a private copy of `grid`. The caller's value is
    /// never touched again.
    #[must_use]
    pub fn new(grid: &Grid) -> Self {
        Self {
            grid: grid.clone(),
            stats: SolveStats::default(),
        }
    }

    /// Runs the search and returns the solved grid, or `None` when no
    /// assignment of the blanks satisfies the constraints.
    ///
    /// The pre-filled cells are validated first: a grid whose clues already
    /// clash is reported unsolvable without searching, even when the clash
    /// never starves a blank cell. Use [`Grid::find_conflict`] beforehand to
    /// distinguish that case from an exhausted search.
    pub fn solve(&mut self) -> Option<Grid> {
        self.stats = SolveStats::default();

        if self.grid.find_conflict().is_some() {
            return None;
        }

        let mut working = self.grid.clone();
        self.search(&mut working, 0).then_some(working)
    }

    /// Statistics for the most recent [`Solver::solve`] call.
    #[must_use]
    pub const fn stats(&self) -> SolveStats {
        self.stats
    }

    /// The recursive state machine: propagate until fixpoint, then branch on
    /// the minimum-remaining-values pivot. `true` leaves `grid` solved;
    /// `false` leaves it in an unspecified partial state, which is fine
    /// because every caller owns a clone.
    fn search(&mut self, grid: &mut Grid, depth: usize) -> bool {
        self.stats.max_depth = self.stats.max_depth.max(depth);

        let (pivot, digits) = loop {
            match self.scan(grid) {
                Scan::Complete => return true,
                Scan::Contradiction => {
                    self.stats.dead_ends += 1;
                    return false;
                }
                // A forced placement happened this pass; scan again.
                Scan::Min { digits, .. } if digits.len() < 2 => {}
                Scan::Min { cell, digits } => break (cell, digits),
            }
        };

        for digit in digits {
            self.stats.decisions += 1;

            let mut trial = grid.clone();
            trial.set(pivot, digit);

            if self.search(&mut trial, depth + 1) {
                *grid = trial;
                return true;
            }
        }

        false
    }

    /// One row-major pass: place every single-candidate blank on sight and
    /// report the most constrained blank encountered.
    fn scan(&mut self, grid: &mut Grid) -> Scan {
        let mut min: Option<(Cell, DigitSet)> = None;

        for cell in Cell::all() {
            if !grid.is_blank(cell) {
                continue;
            }

            let digits = candidates(grid, cell);
            if digits.is_empty() {
                return Scan::Contradiction;
            }
            if let Some(digit) = digits.single() {
                grid.set(cell, digit);
                self.stats.propagations += 1;
            }

            if min.is_none_or(|(_, m)| digits.len() < m.len()) {
                min = Some((cell, digits));
            }
        }

        match min {
            None => Scan::Complete,
            Some((cell, digits)) => Scan::Min { cell, digits },
        }
    }
}

/// Solves `grid`, returning the completed board or `None` when the puzzle is
/// unsolvable or its clues already clash.
///
/// The input is copied on entry and never mutated, so on failure the
/// caller's grid is exactly as it was. When a puzzle admits several
/// completions, the ascending-digit, row-major, depth-first search order
/// makes the returned one deterministic.
#[must_use]
pub fn solve(grid: &Grid) -> Option<Grid> {
    Solver::new(grid).solve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sudoku::grid::{CELL_COUNT, EXAMPLE_EASY, EXAMPLE_HARD};

    const EASY_SOLUTION: &str =
        "534678912672195348198342567859761423426853791713924856961537284287419635345286179";
    const HARD_SOLUTION: &str =
        "812753649943682175675491283154237896369845721287169534521974368438526917796318452";

    fn grid(line: &str) -> Grid {
        line.parse().unwrap()
    }

    #[test]
    fn solves_the_easy_example() {
        let solution = solve(&Grid::new(EXAMPLE_EASY)).unwrap();
        assert_eq!(solution, grid(EASY_SOLUTION));
    }

    #[test]
    fn solves_the_hard_example() {
        let solution = solve(&Grid::new(EXAMPLE_HARD)).unwrap();
        assert_eq!(solution, grid(HARD_SOLUTION));
        assert!(solution.is_solved());
    }

    #[test]
    fn clues_survive_into_the_solution() {
        let puzzle = Grid::new(EXAMPLE_HARD);
        let solution = solve(&puzzle).unwrap();
        for cell in Cell::all() {
            if !puzzle.is_blank(cell) {
                assert_eq!(puzzle.get(cell), solution.get(cell), "clue moved at {cell}");
            }
        }
    }

    #[test]
    fn a_single_clue_is_enough_to_solve() {
        let mut puzzle = Grid::empty();
        puzzle.set(Cell::new(0, 0), 8);

        let solution = solve(&puzzle).unwrap();
        assert!(solution.is_solved());
        assert_eq!(solution.get(Cell::new(0, 0)), 8);
    }

    #[test]
    fn the_empty_grid_solves_deterministically() {
        let empty = Grid::empty();
        let first = solve(&empty).unwrap();
        let second = solve(&empty).unwrap();

        assert!(first.is_solved());
        assert_eq!(first, second);
        // The input value is left untouched by both runs.
        assert_eq!(empty, Grid::empty());
    }

    #[test]
    fn a_solved_grid_round_trips() {
        let solved = grid(EASY_SOLUTION);
        assert_eq!(solve(&solved), Some(solved.clone()));
    }

    #[test]
    fn clashing_clues_are_rejected_before_searching() {
        // Two 4s in row 0; the clash sits entirely among pre-filled cells.
        let mut puzzle = Grid::empty();
        puzzle.set(Cell::new(0, 0), 4);
        puzzle.set(Cell::new(0, 8), 4);
        assert_eq!(solve(&puzzle), None);

        // A published invalid vector: row 0 repeats the digit 2.
        let invalid =
            "234500200000023040000030400000600000300000000000230040040000654300000010203000004";
        assert_eq!(solve(&grid(invalid)), None);
    }

    #[test]
    fn starved_cell_fails_the_solve_and_preserves_the_input() {
        // Row 0 holds 1-8 and the block of (0, 8) already holds a 9, so the
        // remaining blank in row 0 has no candidates at all.
        let mut puzzle = Grid::empty();
        for (col, digit) in (1..=8).enumerate() {
            puzzle.set(Cell::new(0, col), digit);
        }
        puzzle.set(Cell::new(2, 6), 9);

        let before = puzzle.clone();
        assert_eq!(solve(&puzzle), None);
        assert_eq!(puzzle, before);
    }

    #[test]
    fn stats_reflect_the_search() {
        let mut solver = Solver::new(&Grid::new(EXAMPLE_EASY));
        solver.solve().unwrap();
        let easy = solver.stats();
        assert!(easy.propagations > 0);

        let mut solver = Solver::new(&Grid::empty());
        solver.solve().unwrap();
        let empty = solver.stats();
        assert!(empty.decisions > 0);
        assert!(empty.max_depth > 0);
        assert!(empty.propagations + empty.decisions >= CELL_COUNT);
    }

    #[test]
    fn stats_reset_between_runs() {
        let mut solver = Solver::new(&Grid::new(EXAMPLE_HARD));
        solver.solve().unwrap();
        let first = solver.stats();
        solver.solve().unwrap();
        assert_eq!(solver.stats(), first);
    }
}

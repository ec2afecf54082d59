#![deny(missing_docs)]
//! This crate solves standard 9x9 Sudoku puzzles by interleaving constraint
//! propagation with backtracking search over a minimum-remaining-values pivot.

/// The `sudoku` module implements the solver: the board type, candidate
/// computation for blank cells, the search itself, and the puzzle text format.
pub mod sudoku;

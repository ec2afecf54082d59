#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Core Sudoku types and the solving algorithm.

/// The `candidates` module computes the digits a blank cell may still take.
pub mod candidates;

/// The `grid` module defines the board value type and its text forms.
pub mod grid;

/// The `solver` module drives constraint propagation and backtracking search.
pub mod solver;

/// The `source` module reads puzzle collections from line-oriented text.
pub mod source;

//! The Sudoku board value type and its text forms.
//!
//! A [`Grid`] is a plain 9x9 value: the solver takes a working copy on entry
//! and clones it again for every speculative branch, so a failed search never
//! disturbs the caller's grid. Cells hold `0..=9`, with `0` meaning blank.

use crate::sudoku::candidates::DigitSet;
use itertools::Itertools;
use std::fmt;
use std::str::FromStr;

/// Side length of the board.
pub const GRID_DIM: usize = 9;

/// Side length of one 3x3 sub-block.
pub const BLOCK_DIM: usize = 3;

/// Total number of cells on the board.
pub const CELL_COUNT: usize = GRID_DIM * GRID_DIM;

/// Row-major cell values, `0` meaning blank.
pub type Cells = [[u8; GRID_DIM]; GRID_DIM];

/// The 21-clue puzzle shipped with the original task data. It has a unique
/// solution and drives the search deep into branching, which makes it a good
/// worst-ish-case benchmark input.
pub const EXAMPLE_HARD: Cells = [
    [8, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 3, 6, 0, 0, 0, 0, 0],
    [0, 7, 0, 0, 9, 0, 2, 0, 0],
    [0, 5, 0, 0, 0, 7, 0, 0, 0],
    [0, 0, 0, 0, 4, 5, 7, 0, 0],
    [0, 0, 0, 1, 0, 0, 0, 3, 0],
    [0, 0, 1, 0, 0, 0, 0, 6, 8],
    [0, 0, 8, 5, 0, 0, 0, 1, 0],
    [0, 9, 0, 0, 0, 0, 4, 0, 0],
];

/// The classic 30-clue newspaper puzzle. Propagation alone nearly finishes
/// it, so it exercises the forced-placement path rather than the search.
pub const EXAMPLE_EASY: Cells = [
    [5, 3, 0, 0, 7, 0, 0, 0, 0],
    [6, 0, 0, 1, 9, 5, 0, 0, 0],
    [0, 9, 8, 0, 0, 0, 0, 6, 0],
    [8, 0, 0, 0, 6, 0, 0, 0, 3],
    [4, 0, 0, 8, 0, 3, 0, 0, 1],
    [7, 0, 0, 0, 2, 0, 0, 0, 6],
    [0, 6, 0, 0, 0, 0, 2, 8, 0],
    [0, 0, 0, 4, 1, 9, 0, 0, 5],
    [0, 0, 0, 0, 8, 0, 0, 7, 9],
];

/// A cell coordinate, row and column both in `0..9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Row index in `0..9`, top to bottom.
    pub row: usize,
    /// Column index in `0..9`, left to right.
    pub col: usize,
}

impl Cell {
    /// Creates a coordinate. Callers keep both indices in `0..9`.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Top-left cell of the 3x3 block containing this cell.
    #[must_use]
    pub const fn block_origin(self) -> Self {
        Self {
            row: self.row / BLOCK_DIM * BLOCK_DIM,
            col: self.col / BLOCK_DIM * BLOCK_DIM,
        }
    }

    /// Row-major iterator over all 81 coordinates.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..GRID_DIM)
            .cartesian_product(0..GRID_DIM)
            .map(|(row, col)| Self::new(row, col))
    }

    /// Row-major iterator over the nine cells of block `index`, blocks
    /// numbered `0..9` row-major across the board.
    pub fn block(index: usize) -> impl Iterator<Item = Self> {
        let origin = Self::new(
            index / BLOCK_DIM * BLOCK_DIM,
            index % BLOCK_DIM * BLOCK_DIM,
        );
        (0..BLOCK_DIM)
            .cartesian_product(0..BLOCK_DIM)
            .map(move |(dr, dc)| Self::new(origin.row + dr, origin.col + dc))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One constraint group of nine cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// A row, indexed `0..9` top to bottom.
    Row(usize),
    /// A column, indexed `0..9` left to right.
    Col(usize),
    /// A 3x3 block, indexed `0..9` row-major across the board.
    Block(usize),
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row(i) => write!(f, "row {i}"),
            Self::Col(i) => write!(f, "column {i}"),
            Self::Block(i) => write!(f, "block {i}"),
        }
    }
}

/// A uniqueness violation among pre-filled cells: `digit` occurs more than
/// once in `unit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    /// The duplicated digit.
    pub digit: u8,
    /// The unit the digit repeats in.
    pub unit: Unit,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "digit {} appears more than once in {}", self.digit, self.unit)
    }
}

/// Failure to parse an 81-character puzzle line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseGridError {
    /// The line did not contain exactly 81 characters.
    BadLength {
        /// Number of characters actually found.
        found: usize,
    },
    /// A character other than `'0'..='9'` appeared in the line.
    BadDigit {
        /// Zero-based character offset of the offender.
        offset: usize,
        /// The offending character.
        found: char,
    },
}

impl fmt::Display for ParseGridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadLength { found } => {
                write!(f, "expected {CELL_COUNT} characters, found {found}")
            }
            Self::BadDigit { offset, found } => {
                write!(f, "invalid character {found:?} at offset {offset}")
            }
        }
    }
}

impl std::error::Error for ParseGridError {}

/// A 9x9 Sudoku board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    cells: Cells,
}

impl Grid {
    /// Wraps a 9x9 cell array as a grid.
    #[must_use]
    pub const fn new(cells: Cells) -> Self {
        Self { cells }
    }

    /// An all-blank grid.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Value at `cell`, `0` when blank.
    #[must_use]
    pub const fn get(&self, cell: Cell) -> u8 {
        self.cells[cell.row][cell.col]
    }

    /// Writes `digit` at `cell`.
    pub fn set(&mut self, cell: Cell, digit: u8) {
        self.cells[cell.row][cell.col] = digit;
    }

    /// Is `cell` blank?
    #[must_use]
    pub const fn is_blank(&self, cell: Cell) -> bool {
        self.get(cell) == 0
    }

    /// Row-major iterator over the blank coordinates.
    pub fn blank_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        Cell::all().filter(|&cell| self.is_blank(cell))
    }

    /// Number of pre-filled cells.
    #[must_use]
    pub fn clue_count(&self) -> usize {
        CELL_COUNT - self.blank_cells().count()
    }

    /// True when no blank cells remain.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.blank_cells().next().is_none()
    }

    /// Searches the pre-filled cells for a row/column/block uniqueness
    /// violation and reports the first one found, scanning rows, then
    /// columns, then blocks.
    ///
    /// Run this before solving: propagation only notices a clash once it
    /// starves some blank cell of candidates, which a clash confined to
    /// pre-filled cells may never do.
    #[must_use]
    pub fn find_conflict(&self) -> Option<Conflict> {
        for i in 0..GRID_DIM {
            let row = (0..GRID_DIM).map(|col| self.get(Cell::new(i, col)));
            if let Some(digit) = duplicate(row) {
                return Some(Conflict { digit, unit: Unit::Row(i) });
            }

            let col = (0..GRID_DIM).map(|row| self.get(Cell::new(row, i)));
            if let Some(digit) = duplicate(col) {
                return Some(Conflict { digit, unit: Unit::Col(i) });
            }

            let block = Cell::block(i).map(|cell| self.get(cell));
            if let Some(digit) = duplicate(block) {
                return Some(Conflict { digit, unit: Unit::Block(i) });
            }
        }
        None
    }

    /// True when the grid is completely filled and every row, column, and
    /// block holds each digit exactly once.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.is_complete() && self.find_conflict().is_none()
    }

    /// Serialises the grid into its 81-character line form, the inverse of
    /// [`Grid::from_str`].
    #[must_use]
    pub fn to_line(&self) -> String {
        self.cells
            .iter()
            .flatten()
            .map(|&digit| char::from(b'0' + digit))
            .collect()
    }
}

/// First digit that occurs twice among the non-blank values of one unit.
fn duplicate(digits: impl Iterator<Item = u8>) -> Option<u8> {
    let mut seen = DigitSet::EMPTY;
    for digit in digits.filter(|&d| d != 0) {
        if seen.contains(digit) {
            return Some(digit);
        }
        seen.insert(digit);
    }
    None
}

impl From<Cells> for Grid {
    fn from(cells: Cells) -> Self {
        Self::new(cells)
    }
}

impl From<Grid> for Cells {
    fn from(grid: Grid) -> Self {
        grid.cells
    }
}

impl FromStr for Grid {
    type Err = ParseGridError;

    #[allow(clippy::cast_possible_truncation)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let found = s.chars().count();
        if found != CELL_COUNT {
            return Err(ParseGridError::BadLength { found });
        }

        let mut cells = Cells::default();
        for (offset, ch) in s.chars().enumerate() {
            let Some(digit) = ch.to_digit(10) else {
                return Err(ParseGridError::BadDigit { offset, found: ch });
            };
            cells[offset / GRID_DIM][offset % GRID_DIM] = digit as u8;
        }

        Ok(Self::new(cells))
    }
}

impl fmt::Display for Grid {
    /// Renders the grid as a bordered block, 3x3 sub-blocks separated by
    /// divider rows, blanks shown as `.`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const DIVIDER: &str = "+-------+-------+-------+";

        writeln!(f, "{DIVIDER}")?;
        for (i, row) in self.cells.iter().enumerate() {
            let line = row
                .chunks(BLOCK_DIM)
                .map(|chunk| {
                    chunk
                        .iter()
                        .map(|&digit| {
                            if digit == 0 {
                                '.'
                            } else {
                                char::from(b'0' + digit)
                            }
                        })
                        .join(" ")
                })
                .join(" | ");
            writeln!(f, "| {line} |")?;
            if i % BLOCK_DIM == BLOCK_DIM - 1 {
                writeln!(f, "{DIVIDER}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HARD_LINE: &str =
        "800000000003600000070090200050007000000045700000100030001000068008500010090000400";

    #[test]
    fn parse_line() {
        let grid: Grid = HARD_LINE.parse().unwrap();
        assert_eq!(grid, Grid::new(EXAMPLE_HARD));
        assert_eq!(grid.to_line(), HARD_LINE);
    }

    #[test]
    fn parse_rejects_wrong_length() {
        let err = "123".parse::<Grid>().unwrap_err();
        assert_eq!(err, ParseGridError::BadLength { found: 3 });
    }

    #[test]
    fn parse_rejects_non_digits() {
        let line = format!("x{}", &HARD_LINE[1..]);
        let err = line.parse::<Grid>().unwrap_err();
        assert_eq!(err, ParseGridError::BadDigit { offset: 0, found: 'x' });
    }

    #[test]
    fn display_borders_the_blocks() {
        let expected = "\
+-------+-------+-------+
| 5 3 . | . 7 . | . . . |
| 6 . . | 1 9 5 | . . . |
| . 9 8 | . . . | . 6 . |
+-------+-------+-------+
| 8 . . | . 6 . | . . 3 |
| 4 . . | 8 . 3 | . . 1 |
| 7 . . | . 2 . | . . 6 |
+-------+-------+-------+
| . 6 . | . . . | 2 8 . |
| . . . | 4 1 9 | . . 5 |
| . . . | . 8 . | . 7 9 |
+-------+-------+-------+
";
        assert_eq!(Grid::new(EXAMPLE_EASY).to_string(), expected);
    }

    #[test]
    fn clue_and_blank_counts() {
        let grid = Grid::new(EXAMPLE_HARD);
        assert_eq!(grid.clue_count(), 21);
        assert_eq!(grid.blank_cells().count(), 60);
        assert!(!grid.is_complete());
        assert_eq!(Grid::empty().blank_cells().count(), CELL_COUNT);
    }

    #[test]
    fn block_cells_cover_the_sub_grid() {
        let cells: Vec<Cell> = Cell::block(4).collect();
        assert_eq!(cells.first(), Some(&Cell::new(3, 3)));
        assert_eq!(cells.last(), Some(&Cell::new(5, 5)));
        assert_eq!(cells.len(), 9);
    }

    #[test]
    fn conflict_in_a_row() {
        let mut grid = Grid::empty();
        grid.set(Cell::new(2, 0), 4);
        grid.set(Cell::new(2, 7), 4);
        assert_eq!(
            grid.find_conflict(),
            Some(Conflict { digit: 4, unit: Unit::Row(2) })
        );
    }

    #[test]
    fn conflict_in_a_column() {
        let mut grid = Grid::empty();
        grid.set(Cell::new(0, 5), 9);
        grid.set(Cell::new(8, 5), 9);
        assert_eq!(
            grid.find_conflict(),
            Some(Conflict { digit: 9, unit: Unit::Col(5) })
        );
    }

    #[test]
    fn conflict_in_a_block() {
        let mut grid = Grid::empty();
        grid.set(Cell::new(3, 3), 7);
        grid.set(Cell::new(5, 5), 7);
        let conflict = grid.find_conflict().unwrap();
        assert_eq!(conflict.digit, 7);
        assert_eq!(conflict.unit, Unit::Block(4));
        assert_eq!(conflict.to_string(), "digit 7 appears more than once in block 4");
    }

    #[test]
    fn valid_clues_have_no_conflict() {
        assert_eq!(Grid::new(EXAMPLE_HARD).find_conflict(), None);
        assert_eq!(Grid::new(EXAMPLE_EASY).find_conflict(), None);
        assert_eq!(Grid::empty().find_conflict(), None);
    }

    #[test]
    fn incomplete_grid_is_not_solved() {
        assert!(!Grid::new(EXAMPLE_EASY).is_solved());
        assert!(!Grid::empty().is_solved());
    }
}

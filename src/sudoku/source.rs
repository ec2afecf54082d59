//! A reader for line-oriented puzzle collections.
//!
//! The format is the common one puzzle archives are distributed in: one
//! puzzle per line as 81 ASCII digits in row-major order, `'0'` standing for
//! a blank cell. Anything else on a line of its own - headers, blank lines,
//! commentary - is shorter or longer than 81 characters and is skipped
//! without complaint, so the files can be used as-is.

use crate::sudoku::grid::{CELL_COUNT, Grid, ParseGridError};
use std::fmt;
use std::io::{self, BufRead};
use std::path::Path;

/// Failure while reading a puzzle collection.
#[derive(Debug)]
pub enum SourceError {
    /// The underlying reader failed.
    Io(io::Error),
    /// A line of the right length held something other than digits.
    Parse {
        /// 1-based line number in the input.
        line: usize,
        /// The underlying grid parse failure.
        source: ParseGridError,
    },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read puzzle source: {e}"),
            Self::Parse { line, source } => write!(f, "bad puzzle on line {line}: {source}"),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

impl From<io::Error> for SourceError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Reads every puzzle from `reader`, one per line, preserving input order.
///
/// Lines whose trimmed length is not exactly 81 characters are skipped.
///
/// # Errors
///
/// An I/O failure from `reader`, or an 81-character line containing a
/// non-digit character (reported with its 1-based line number).
pub fn parse_puzzles<R: BufRead>(reader: R) -> Result<Vec<Grid>, SourceError> {
    let mut grids = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.chars().count() != CELL_COUNT {
            continue;
        }

        let grid = line
            .parse()
            .map_err(|source| SourceError::Parse { line: index + 1, source })?;
        grids.push(grid);
    }

    Ok(grids)
}

/// Reads every puzzle from the file at `path`.
///
/// # Errors
///
/// The file cannot be opened or read, or a puzzle line fails to parse; see
/// [`parse_puzzles`].
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<Grid>, SourceError> {
    let file = std::fs::File::open(path)?;
    parse_puzzles(io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sudoku::grid::{Cell, EXAMPLE_HARD};
    use std::io::Cursor;

    const HARD_LINE: &str =
        "800000000003600000070090200050007000000045700000100030001000068008500010090000400";

    #[test]
    fn parses_puzzle_lines_and_skips_the_rest() {
        let content = format!(
            "collection of test puzzles\n\
             \n\
             {HARD_LINE}\n\
             123\n\
             {HARD_LINE}0\n\
             {}\n",
            "0".repeat(CELL_COUNT)
        );

        let grids = parse_puzzles(Cursor::new(content)).unwrap();
        assert_eq!(grids.len(), 2);
        assert_eq!(grids[0], Grid::new(EXAMPLE_HARD));
        assert_eq!(grids[1], Grid::empty());
    }

    #[test]
    fn reports_the_offending_line() {
        let bad_line = format!("a{}", &HARD_LINE[1..]);
        let err = parse_puzzles(Cursor::new(format!("header\n{bad_line}\n"))).unwrap_err();
        match err {
            SourceError::Parse { line, source } => {
                assert_eq!(line, 2);
                assert_eq!(source, ParseGridError::BadDigit { offset: 0, found: 'a' });
            }
            SourceError::Io(e) => panic!("unexpected io error: {e}"),
        }
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let content = format!("  {HARD_LINE}\t\n");
        let grids = parse_puzzles(Cursor::new(content)).unwrap();
        assert_eq!(grids.len(), 1);
        assert_eq!(grids[0].get(Cell::new(0, 0)), 8);
    }

    #[test]
    fn empty_input_yields_no_puzzles() {
        assert!(parse_puzzles(Cursor::new("")).unwrap().is_empty());
    }

    #[test]
    fn reads_the_bundled_collection() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/puzzles.txt");
        let grids = parse_file(path).unwrap();
        assert_eq!(grids.len(), 4);
        // The third entry is deliberately invalid (a repeated clue), kept to
        // exercise the validation path of the batch driver.
        assert!(grids[2].find_conflict().is_some());
    }
}

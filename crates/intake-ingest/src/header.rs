//! Header row detection for raw worksheet grids.

use intake_model::{CellValue, RawGrid};
use serde::Serialize;
use tracing::debug;

use crate::patterns::is_header_token;

/// Maximum number of leading rows scanned for a header.
pub const HEADER_SCAN_LIMIT: usize = 50;

/// Number of leading rows offered as manual header candidates.
pub const HEADER_CANDIDATE_LIMIT: usize = 20;

/// Why a row was chosen as the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HeaderBasis {
    /// A cell matched the style, brand or MSRP pattern.
    PatternMatch,
    /// No pattern matched; the row with the most non-blank cells won.
    MostPopulated,
    /// No row had at least two non-blank cells.
    Fallback,
}

impl HeaderBasis {
    /// True when the guess came from a heuristic and should be confirmed.
    pub fn is_heuristic(self) -> bool {
        !matches!(self, HeaderBasis::PatternMatch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeaderGuess {
    pub row: usize,
    pub basis: HeaderBasis,
}

#[derive(Debug, Clone, Copy, Default)]
struct RowStats {
    non_blank: usize,
    has_token: bool,
}

fn row_stats(row: &[CellValue]) -> RowStats {
    let values: Vec<String> = row
        .iter()
        .map(|cell| cell.display().trim().to_string())
        .filter(|value| !value.is_empty())
        .collect();
    RowStats {
        non_blank: values.len(),
        has_token: values.iter().any(|value| is_header_token(value)),
    }
}

/// Guesses the header row and reports how the guess was made.
///
/// Rows with fewer than two non-blank cells are never chosen. The first row
/// containing a style, brand or MSRP token wins outright; otherwise the first
/// row with the greatest non-blank count is used.
pub fn detect_header(grid: &RawGrid) -> HeaderGuess {
    let mut best = HeaderGuess {
        row: 0,
        basis: HeaderBasis::Fallback,
    };
    let mut best_count = 0usize;

    for (idx, row) in grid.iter().take(HEADER_SCAN_LIMIT).enumerate() {
        let stats = row_stats(row);
        if stats.non_blank < 2 {
            continue;
        }
        if stats.has_token {
            best = HeaderGuess {
                row: idx,
                basis: HeaderBasis::PatternMatch,
            };
            break;
        }
        if stats.non_blank > best_count {
            best_count = stats.non_blank;
            best = HeaderGuess {
                row: idx,
                basis: HeaderBasis::MostPopulated,
            };
        }
    }

    debug!(row = best.row, basis = ?best.basis, "header row detected");
    best
}

/// Index of the row most likely to hold column headers.
pub fn detect_header_row(grid: &RawGrid) -> usize {
    detect_header(grid).row
}

/// Rows the user may pick from when overriding the detected header.
pub fn header_candidates(grid: &RawGrid) -> &[Vec<CellValue>] {
    &grid[..grid.len().min(HEADER_CANDIDATE_LIMIT)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_grid(rows: &[&[&str]]) -> RawGrid {
        rows.iter()
            .map(|row| row.iter().map(|value| CellValue::from(*value)).collect())
            .collect()
    }

    #[test]
    fn pattern_row_beats_wider_row() {
        let grid = text_grid(&[
            &["foo", "bar", "baz", "qux"],
            &["Style #", "Brand", "MSRP"],
            &["110", "Acme", "19.99"],
        ]);
        assert_eq!(
            detect_header(&grid),
            HeaderGuess {
                row: 1,
                basis: HeaderBasis::PatternMatch
            }
        );
    }

    #[test]
    fn most_populated_row_wins_without_pattern() {
        let grid = text_grid(&[
            &["Report", ""],
            &["a", "b"],
            &["c", "d", "e"],
            &["f", "g", "h"],
        ]);
        let guess = detect_header(&grid);
        assert_eq!(guess.row, 2);
        assert_eq!(guess.basis, HeaderBasis::MostPopulated);
        assert!(guess.basis.is_heuristic());
    }

    #[test]
    fn sparse_grid_falls_back_to_zero() {
        let grid = text_grid(&[&["only"], &["", "  "], &["x"]]);
        assert_eq!(detect_header(&grid).basis, HeaderBasis::Fallback);
        assert_eq!(detect_header_row(&grid), 0);
        assert_eq!(detect_header_row(&RawGrid::new()), 0);
    }

    #[test]
    fn single_cell_pattern_row_is_skipped() {
        let grid = text_grid(&[&["SKU"], &["Name", "Brand"]]);
        assert_eq!(detect_header_row(&grid), 1);
    }

    #[test]
    fn rows_past_scan_limit_are_ignored() {
        let mut rows: Vec<Vec<CellValue>> = vec![vec![CellValue::from("x"), CellValue::from("y")]];
        rows.extend((0..60).map(|_| vec![CellValue::Empty]));
        rows.push(vec![CellValue::from("Style"), CellValue::from("Brand")]);
        assert_eq!(detect_header(&rows).row, 0);
        assert_eq!(header_candidates(&rows).len(), HEADER_CANDIDATE_LIMIT);
    }
}

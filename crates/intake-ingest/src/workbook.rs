//! Workbook parsing into raw per-sheet grids.

use std::io::Cursor;

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use intake_model::{CellValue, RawGrid};
use tracing::{debug, info, info_span};

use crate::error::{IngestError, Result};
use crate::upload::{IngestOptions, UploadedFile, check_upload};

/// One non-empty worksheet.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSheet {
    pub name: String,
    /// Position in the workbook, counting skipped empty sheets.
    pub original_index: usize,
    pub grid: RawGrid,
}

/// A parsed upload. Keeps the original bytes for later worksheet isolation.
#[derive(Debug, Clone)]
pub struct Workbook {
    pub file: UploadedFile,
    /// Every worksheet name in workbook order, including empty ones.
    pub sheet_names: Vec<String>,
    pub sheets: Vec<RawSheet>,
}

impl Workbook {
    /// Number of worksheets with data. Empty worksheets are not counted.
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Whether the file holds more than one worksheet, empty ones included.
    pub fn is_multi_sheet(&self) -> bool {
        self.sheet_names.len() > 1
    }
}

/// Checks and parses an upload.
///
/// Sheets without any cells are skipped. Fails when no sheet remains.
pub fn read_workbook(file: UploadedFile, options: &IngestOptions) -> Result<Workbook> {
    let span = info_span!("read_workbook", file = %file.name);
    let _guard = span.enter();

    check_upload(&file, options)?;
    let parsed = read_sheet_grids(&file.name, &file.bytes)?;

    let mut sheet_names = Vec::with_capacity(parsed.len());
    let mut sheets = Vec::new();
    for (original_index, (name, grid)) in parsed.into_iter().enumerate() {
        sheet_names.push(name.clone());
        if grid.is_empty() {
            debug!(sheet = %name, original_index, "skipping empty sheet");
            continue;
        }
        sheets.push(RawSheet {
            name,
            original_index,
            grid,
        });
    }

    if sheets.is_empty() {
        return Err(IngestError::EmptyWorkbook { name: file.name });
    }

    info!(
        bytes = file.size(),
        sheet_count = sheet_names.len(),
        non_empty = sheets.len(),
        "workbook parsed"
    );
    Ok(Workbook {
        file,
        sheet_names,
        sheets,
    })
}

/// Parses every worksheet in `bytes`, empty ones included, in workbook order.
pub fn read_sheet_grids(name: &str, bytes: &[u8]) -> Result<Vec<(String, RawGrid)>> {
    let parse_error = |message: String| IngestError::Parse {
        name: name.to_string(),
        message,
    };
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| parse_error(e.to_string()))?;
    let sheet_names = workbook.sheet_names().to_vec();

    let mut grids = Vec::with_capacity(sheet_names.len());
    for sheet_name in sheet_names {
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| parse_error(format!("sheet '{sheet_name}': {e}")))?;
        grids.push((sheet_name, range_to_grid(&range)));
    }
    Ok(grids)
}

/// Converts a used range into a grid anchored at `A1`.
///
/// Ranges that start below or right of `A1` are padded with empty cells so
/// grid coordinates match worksheet coordinates.
pub fn range_to_grid(range: &Range<Data>) -> RawGrid {
    let Some((start_row, start_col)) = range.start() else {
        return RawGrid::new();
    };
    if range.is_empty() {
        return RawGrid::new();
    }
    let start_row = start_row as usize;
    let start_col = start_col as usize;
    let width = start_col + range.width();

    let mut grid: RawGrid = (0..start_row)
        .map(|_| vec![CellValue::Empty; width])
        .collect();
    for row in range.rows() {
        let mut cells = Vec::with_capacity(width);
        cells.resize(start_col, CellValue::Empty);
        cells.extend(row.iter().map(convert_cell));
        grid.push(cells);
    }
    grid
}

/// Maps a calamine cell onto the model's cell value.
pub fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_range_is_padded_to_a1() {
        let mut range = Range::new((1, 2), (2, 3));
        range.set_value((1, 2), Data::String("Style".to_string()));
        range.set_value((1, 3), Data::String("Brand".to_string()));
        range.set_value((2, 2), Data::Int(7));

        let grid = range_to_grid(&range);

        assert_eq!(grid.len(), 3);
        assert!(grid[0].iter().all(CellValue::is_blank));
        assert_eq!(grid[1][2], CellValue::from("Style"));
        assert_eq!(grid[1][3], CellValue::from("Brand"));
        assert_eq!(grid[2][2], CellValue::Number(7.0));
        assert!(grid.iter().all(|row| row.len() == 4));
    }

    #[test]
    fn empty_range_is_empty_grid() {
        let range: Range<Data> = Range::empty();
        assert!(range_to_grid(&range).is_empty());
    }

    #[test]
    fn garbage_bytes_fail_to_parse() {
        let err = read_sheet_grids("junk.xlsx", b"not a workbook").unwrap_err();
        assert!(matches!(err, IngestError::Parse { .. }));
    }
}

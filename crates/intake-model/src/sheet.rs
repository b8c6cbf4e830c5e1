use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{CellValue, ColumnMapping, ColumnRole, RawGrid};

/// Stable identity of a sheet inside a mapping session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SheetId(u32);

impl SheetId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Header strings plus the data rows below the header row.
///
/// Rows are not guaranteed to be as wide as `headers`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabularData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl TabularData {
    /// Splits `grid` at `header_row`. Out-of-range rows yield empty data.
    pub fn slice(grid: &RawGrid, header_row: usize) -> Self {
        let Some(header) = grid.get(header_row) else {
            return Self::default();
        };
        Self {
            headers: header.iter().map(CellValue::display).collect(),
            rows: grid[header_row + 1..].to_vec(),
        }
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|cells| cells.get(column))
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn has_nonblank_header(&self) -> bool {
        self.headers.iter().any(|header| !header.trim().is_empty())
    }
}

/// Header text given to a synthesized constant-value column.
pub fn manual_header(role: ColumnRole) -> String {
    format!("{} (Manual)", role.label().to_uppercase())
}

/// A synthesized column that repeats one constant value on every row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualColumn {
    pub role: ColumnRole,
    pub index: usize,
    pub value: String,
    /// Length of each data row before the column was added. Short rows are
    /// padded with empty cells up to `index` and cut back on removal.
    #[serde(default)]
    pub row_lengths: Vec<usize>,
}

/// Per-worksheet mapping state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetConfig {
    pub id: SheetId,
    pub name: String,
    /// Position of the worksheet in the uploaded workbook.
    pub original_index: usize,
    pub raw: RawGrid,
    pub header_row: usize,
    pub data: TabularData,
    pub mapping: ColumnMapping,
    pub manual: Vec<ManualColumn>,
    pub selected: bool,
}

impl SheetConfig {
    pub fn new(
        id: SheetId,
        name: impl Into<String>,
        original_index: usize,
        raw: RawGrid,
        header_row: usize,
        mapping: ColumnMapping,
    ) -> Self {
        let data = TabularData::slice(&raw, header_row);
        Self {
            id,
            name: name.into(),
            original_index,
            raw,
            header_row,
            data,
            mapping,
            manual: Vec::new(),
            selected: false,
        }
    }

    /// Sheet name, or `Sheet N` when the workbook left it blank.
    pub fn display_name(&self) -> String {
        if self.name.trim().is_empty() {
            format!("Sheet {}", self.original_index + 1)
        } else {
            self.name.clone()
        }
    }

    pub fn manual_column(&self, role: ColumnRole) -> Option<&ManualColumn> {
        self.manual.iter().find(|column| column.role == role)
    }

    /// Constant value of the manual column for `role`, when one is active.
    pub fn manual_value(&self, role: ColumnRole) -> Option<&str> {
        self.manual_column(role).map(|column| column.value.as_str())
    }

    /// Manual column occupying `index`, if any.
    pub fn manual_at(&self, index: usize) -> Option<&ManualColumn> {
        self.manual.iter().find(|column| column.index == index)
    }

    /// Raw rows above the header row.
    pub fn prefix_rows(&self) -> &[Vec<CellValue>] {
        let end = self.header_row.min(self.raw.len());
        &self.raw[..end]
    }
}

//! Error types for mapping edits and submission readiness.

use intake_model::{ColumnRole, SheetId};
use thiserror::Error;

/// A rejected mapping edit. The sheet is left unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("sheet {0} does not exist in this session")]
    UnknownSheet(SheetId),

    #[error("column {column} is out of range: sheet has {width} columns")]
    ColumnOutOfRange { column: usize, width: usize },

    /// The column is a synthesized constant column belonging to another role.
    #[error("column {column} holds the manual {owner} value; remove it before remapping")]
    ManualColumnOwned { column: usize, owner: ColumnRole },

    #[error("{} cannot be entered manually", .0.label())]
    NotManualRole(ColumnRole),

    #[error("please enter a {} value", .0.label())]
    BlankManualValue(ColumnRole),
}

/// Result type for mapping edits.
pub type Result<T> = std::result::Result<T, MappingError>;

/// Why the session cannot be submitted yet.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReadinessError {
    #[error("no sheets to submit")]
    NoSheets,

    #[error("select at least one sheet to submit")]
    NoSheetsSelected,

    #[error("sheet \"{sheet}\" is missing required columns: {}", .missing.join(", "))]
    MissingColumns { sheet: String, missing: Vec<String> },

    #[error("sheet \"{sheet}\" has no data rows below the header")]
    NoDataRows { sheet: String },

    #[error("sheet \"{sheet}\" has no non-blank headers")]
    BlankHeaders { sheet: String },
}

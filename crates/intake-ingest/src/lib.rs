//! Sheet intake ingestion.
//!
//! Turns an uploaded spreadsheet into raw per-sheet grids and guesses the
//! header row of each grid.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use intake_ingest::{IngestOptions, UploadedFile, detect_header, read_workbook};
//!
//! let file = UploadedFile::from_path(Path::new("catalog.xlsx"))?;
//! let workbook = read_workbook(file, &IngestOptions::default())?;
//! for sheet in &workbook.sheets {
//!     let guess = detect_header(&sheet.grid);
//!     println!("{}: header row {}", sheet.name, guess.row);
//! }
//! ```

mod error;
pub mod header;
pub mod patterns;
mod upload;
mod workbook;

// === Error Types ===
pub use error::{IngestError, Result};

// === Upload ===
pub use upload::{
    ACCEPTED_MIME_TYPES, DEFAULT_MAX_FILE_SIZE_MB, IngestOptions, UploadedFile, XLS_MIME,
    XLSX_MIME, check_upload, mime_type_for,
};

// === Workbook Parsing ===
pub use workbook::{RawSheet, Workbook, convert_cell, range_to_grid, read_sheet_grids, read_workbook};

// === Header Detection ===
pub use header::{
    HEADER_CANDIDATE_LIMIT, HEADER_SCAN_LIMIT, HeaderBasis, HeaderGuess, detect_header,
    detect_header_row, header_candidates,
};

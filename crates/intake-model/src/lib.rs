//! Data model for the sheet intake pipeline.
//!
//! Everything here is plain data: parsed cell values, the closed vocabulary of
//! column roles, per-sheet mapping state, and the per-wizard configuration
//! tables that decide which roles are required.

pub mod cell;
pub mod error;
pub mod mapping;
pub mod role;
pub mod sheet;
pub mod wizard;

pub use cell::{CellValue, RawGrid};
pub use error::{ModelError, Result};
pub use mapping::ColumnMapping;
pub use role::ColumnRole;
pub use sheet::{ManualColumn, SheetConfig, SheetId, TabularData, manual_header};
pub use wizard::{DataWarehouseMode, FileSource, WizardKind};

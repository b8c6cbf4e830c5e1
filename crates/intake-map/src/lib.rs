//! Column mapping for uploaded sheets.
//!
//! - [`auto_map_columns`] guesses a mapping from header text.
//! - [`MappingSession`] holds per-sheet mapping state and applies user edits
//!   while keeping one non-image role per column.
//! - [`validate_sheet`] and [`MappingSession::check_ready`] gate submission.

mod auto;
mod error;
pub mod preview;
mod session;
mod validation;

pub use auto::{auto_map_columns, auto_map_for};
pub use error::{MappingError, ReadinessError, Result};
pub use preview::{
    ColumnSummary, column_preview, column_summaries, fallback_image_column, highlighted_columns,
    mapped_data_columns,
};
pub use session::MappingSession;
pub use validation::{SheetValidation, validate_sheet};

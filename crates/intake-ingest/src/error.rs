//! Error types for workbook ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that reject an upload before any sheet state is created.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Upload Checks ===
    /// MIME type outside the accepted spreadsheet types.
    #[error("unsupported file type '{mime_type}': upload an Excel file (.xlsx or .xls)")]
    UnsupportedMimeType { mime_type: String },

    /// File exceeds the configured size limit.
    #[error("file is {size} bytes, larger than the {limit_mb} MB limit")]
    FileTooLarge { size: usize, limit_mb: usize },

    /// Failed to read the file from disk.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Parsing ===
    /// The spreadsheet parser rejected the bytes.
    #[error("failed to parse workbook {name}: {message}")]
    Parse { name: String, message: String },

    /// Every worksheet was empty.
    #[error("workbook {name} has no non-empty sheets")]
    EmptyWorkbook { name: String },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileTooLarge {
            size: 60 * 1024 * 1024,
            limit_mb: 50,
        };
        assert_eq!(
            err.to_string(),
            "file is 62914560 bytes, larger than the 50 MB limit"
        );
    }
}

//! Uploaded file handling and pre-parse checks.

use std::path::Path;

use serde::Serialize;

use crate::error::{IngestError, Result};

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const XLS_MIME: &str = "application/vnd.ms-excel";

/// MIME types accepted for upload.
pub const ACCEPTED_MIME_TYPES: [&str; 2] = [XLSX_MIME, XLS_MIME];

/// Default upload size limit in megabytes.
pub const DEFAULT_MAX_FILE_SIZE_MB: usize = 50;

const BYTES_PER_MB: usize = 1024 * 1024;

/// A spreadsheet file as handed over by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct UploadedFile {
    pub name: String,
    pub mime_type: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Reads `path` and infers the MIME type from its extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, mime_type_for(path), bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// MIME type for a spreadsheet path, by extension.
pub fn mime_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("xlsx") => XLSX_MIME,
        Some("xls") => XLS_MIME,
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    pub max_file_size_mb: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
        }
    }
}

impl IngestOptions {
    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb.saturating_mul(BYTES_PER_MB)
    }
}

/// Rejects files with the wrong MIME type or over the size limit.
pub fn check_upload(file: &UploadedFile, options: &IngestOptions) -> Result<()> {
    if !ACCEPTED_MIME_TYPES.contains(&file.mime_type.as_str()) {
        return Err(IngestError::UnsupportedMimeType {
            mime_type: file.mime_type.clone(),
        });
    }
    if file.size() > options.max_file_size_bytes() {
        return Err(IngestError::FileTooLarge {
            size: file.size(),
            limit_mb: options.max_file_size_mb,
        });
    }
    Ok(())
}

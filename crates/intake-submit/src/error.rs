//! Error types for sheet submission.

use intake_map::ReadinessError;
use thiserror::Error;

use crate::export::ExportError;
use crate::recipient::EmailError;
use crate::transport::TransportError;

/// Errors that stop a submission. Sheets already posted stay posted.
#[derive(Debug, Error)]
pub enum SubmitError {
    // === Before Any Request ===
    #[error(transparent)]
    Readiness(#[from] ReadinessError),

    #[error(transparent)]
    Email(#[from] EmailError),

    // === Per Sheet ===
    #[error("sheet \"{sheet}\" is missing a mapped style column")]
    MissingStyleColumn { sheet: String },

    #[error("sheet \"{sheet}\" is missing a mapped image column")]
    MissingImageColumn { sheet: String },

    #[error("failed to prepare the file for sheet \"{sheet}\": {source}")]
    Export {
        sheet: String,
        #[source]
        source: ExportError,
    },

    #[error("request for sheet \"{sheet}\" failed: {source}")]
    Transport {
        sheet: String,
        #[source]
        source: TransportError,
    },

    #[error("server error for sheet \"{sheet}\" ({status}): {message}")]
    Server {
        sheet: String,
        status: u16,
        message: String,
    },
}

impl SubmitError {
    /// Name of the sheet the failure belongs to, when it is sheet-specific.
    pub fn sheet(&self) -> Option<&str> {
        match self {
            Self::MissingStyleColumn { sheet }
            | Self::MissingImageColumn { sheet }
            | Self::Export { sheet, .. }
            | Self::Transport { sheet, .. }
            | Self::Server { sheet, .. } => Some(sheet),
            Self::Readiness(_) | Self::Email(_) => None,
        }
    }
}

/// Result type for submission operations.
pub type Result<T> = std::result::Result<T, SubmitError>;

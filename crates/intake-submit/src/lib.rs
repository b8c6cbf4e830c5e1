//! Submission of mapped sheets to the intake backend.
//!
//! Each selected sheet becomes one `multipart/form-data` request: the
//! worksheet file (isolated or rebuilt as needed) plus the column letters
//! and flags the backend expects. Requests are sent one at a time and the
//! first failure stops the run.
//!
//! # Example
//!
//! ```ignore
//! use intake_submit::{HttpTransport, SubmitConfig, Submitter};
//!
//! let submitter = Submitter::new(HttpTransport::new()?, SubmitConfig::default());
//! let report = submitter.submit(&session, &workbook)?;
//! println!("{} sheets sent", report.submitted.len());
//! ```

pub mod config;
mod error;
pub mod export;
mod form;
mod letters;
mod recipient;
mod submit;
pub mod transport;

pub use config::{ConfigError, Currency, DEFAULT_SERVER_URL, SubmitConfig, SubmitOptions};
pub use error::{Result, SubmitError};
pub use export::{ExportError, prepare_file, sheet_file_name};
pub use form::{
    FilePart, FormContext, MANUAL_BRAND_SENTINEL, SubmissionForm, build_form,
    image_column,
};
pub use letters::{column_index, column_letter};
pub use recipient::{EMAIL_QUERY_KEYS, EmailError, RecipientEmail};
pub use submit::{PreparedSubmission, SubmissionReport, SubmittedSheet, Submitter};
pub use transport::{HttpTransport, Transport, TransportError, TransportResponse};

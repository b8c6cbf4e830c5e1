//! HTTP transport for submission forms.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::blocking::multipart::{Form, Part};
use thiserror::Error;
use tracing::debug;

use crate::form::SubmissionForm;

/// Upload request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("invalid file part {file_name}: {message}")]
    FilePart { file_name: String, message: String },

    #[error("POST {url} failed: {message}")]
    Request { url: String, message: String },
}

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    /// Canonical reason phrase for `status`, if known.
    pub reason: String,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Message to surface for a failed request: the JSON `detail` or
    /// `message` field, else the body text, else the reason phrase.
    pub fn error_message(&self) -> String {
        if let Ok(serde_json::Value::Object(map)) =
            serde_json::from_str::<serde_json::Value>(&self.body)
        {
            for key in ["detail", "message"] {
                match map.get(key) {
                    Some(serde_json::Value::String(text)) if !text.trim().is_empty() => {
                        return text.clone();
                    }
                    Some(serde_json::Value::Null) | None => {}
                    Some(serde_json::Value::String(_)) => {}
                    Some(other) => return other.to_string(),
                }
            }
        }
        let body = self.body.trim();
        if !body.is_empty() {
            return body.to_string();
        }
        self.reason.clone()
    }
}

/// Sends one multipart form. Implementations must not retry.
pub trait Transport {
    fn post(&self, url: &str, form: &SubmissionForm) -> Result<TransportResponse, TransportError>;
}

/// Blocking `reqwest` transport.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post(&self, url: &str, form: &SubmissionForm) -> Result<TransportResponse, TransportError> {
        let file = &form.file;
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| TransportError::FilePart {
                file_name: file.file_name.clone(),
                message: e.to_string(),
            })?;

        let mut multipart = Form::new().part(form.file_field, part);
        for (name, value) in &form.fields {
            multipart = multipart.text(name.clone(), value.clone());
        }

        debug!(url, fields = form.fields.len(), bytes = file.bytes.len(), "posting form");
        let request_error = |e: reqwest::Error| TransportError::Request {
            url: url.to_string(),
            message: e.to_string(),
        };
        let response = self
            .client
            .post(url)
            .multipart(multipart)
            .send()
            .map_err(request_error)?;

        let status = response.status();
        let body = response.text().map_err(request_error)?;
        Ok(TransportResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

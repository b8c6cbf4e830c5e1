//! Sequential per-sheet submission.

use intake_ingest::Workbook;
use intake_map::MappingSession;
use intake_model::{SheetConfig, SheetId};
use serde::Serialize;
use tracing::{info, info_span, warn};

use crate::config::SubmitConfig;
use crate::error::{Result, SubmitError};
use crate::export::prepare_file;
use crate::form::{FormContext, SubmissionForm, build_form};
use crate::recipient::{EmailError, RecipientEmail};
use crate::transport::Transport;

/// A sheet accepted by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmittedSheet {
    pub sheet: SheetId,
    pub name: String,
    pub status: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReport {
    pub endpoint: String,
    pub submitted: Vec<SubmittedSheet>,
}

/// A form built but not sent.
#[derive(Debug, Clone)]
pub struct PreparedSubmission {
    pub sheet: SheetId,
    pub name: String,
    pub url: String,
    pub form: SubmissionForm,
}

pub struct Submitter<T> {
    transport: T,
    config: SubmitConfig,
}

impl<T: Transport> Submitter<T> {
    pub fn new(transport: T, config: SubmitConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &SubmitConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Builds every form without sending anything.
    pub fn prepare(
        &self,
        session: &MappingSession,
        workbook: &Workbook,
    ) -> Result<Vec<PreparedSubmission>> {
        let (sheets, recipient) = self.preflight(session)?;
        let url = self.config.endpoint_url(session.wizard().endpoint());
        let ctx = self.context(session, &recipient);

        sheets
            .iter()
            .map(|sheet| {
                let form = assemble(&ctx, workbook, sheet)?;
                Ok(PreparedSubmission {
                    sheet: sheet.id,
                    name: sheet.display_name(),
                    url: url.clone(),
                    form,
                })
            })
            .collect()
    }

    /// Posts each selected sheet in order, one request at a time.
    ///
    /// The first failure stops the run; sheets already sent are not rolled back.
    pub fn submit(
        &self,
        session: &MappingSession,
        workbook: &Workbook,
    ) -> Result<SubmissionReport> {
        let (sheets, recipient) = self.preflight(session)?;
        let url = self.config.endpoint_url(session.wizard().endpoint());
        let ctx = self.context(session, &recipient);

        let span = info_span!("submit", wizard = %session.wizard(), sheets = sheets.len());
        let _guard = span.enter();

        let mut submitted = Vec::with_capacity(sheets.len());
        for sheet in &sheets {
            let name = sheet.display_name();
            let form = assemble(&ctx, workbook, sheet)?;

            let response = match self.transport.post(&url, &form) {
                Ok(response) => response,
                Err(source) => {
                    warn!(sheet = %name, error = %source, "request failed");
                    return Err(SubmitError::Transport {
                        sheet: name,
                        source,
                    });
                }
            };

            if !response.is_success() {
                let message = response.error_message();
                warn!(sheet = %name, status = response.status, %message, "sheet rejected");
                return Err(SubmitError::Server {
                    sheet: name,
                    status: response.status,
                    message,
                });
            }

            info!(
                sheet = %name,
                status = response.status,
                sheet_index = sheet.original_index + 1,
                "sheet submitted"
            );
            submitted.push(SubmittedSheet {
                sheet: sheet.id,
                name,
                status: response.status,
            });
        }

        info!(count = submitted.len(), endpoint = %url, "submission complete");
        Ok(SubmissionReport {
            endpoint: url,
            submitted,
        })
    }

    fn preflight<'s>(
        &self,
        session: &'s MappingSession,
    ) -> Result<(Vec<&'s SheetConfig>, RecipientEmail)> {
        let ids = session.check_ready()?;
        let recipient = self.config.recipient.clone().ok_or(EmailError::Missing)?;
        let sheets = ids.iter().filter_map(|id| session.sheet(*id)).collect();
        Ok((sheets, recipient))
    }

    fn context<'a>(
        &'a self,
        session: &MappingSession,
        recipient: &'a RecipientEmail,
    ) -> FormContext<'a> {
        FormContext {
            wizard: session.wizard(),
            recipient,
            options: &self.config.options,
        }
    }
}

fn assemble(
    ctx: &FormContext<'_>,
    workbook: &Workbook,
    sheet: &SheetConfig,
) -> Result<SubmissionForm> {
    let file = prepare_file(workbook, sheet, ctx.wizard).map_err(|source| SubmitError::Export {
        sheet: sheet.display_name(),
        source,
    })?;
    build_form(ctx, sheet, file)
}

//! Derived per-sheet validation.

use intake_model::{ColumnRole, SheetConfig, SheetId, WizardKind};
use serde::Serialize;

use crate::error::ReadinessError;

/// Validation result for one sheet. Recomputed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetValidation {
    pub sheet: SheetId,
    pub name: String,
    pub selected: bool,
    /// Required roles that are still unmapped.
    pub missing: Vec<ColumnRole>,
    pub has_rows: bool,
    pub has_headers: bool,
    pub valid: bool,
}

impl SheetValidation {
    pub fn missing_labels(&self) -> Vec<String> {
        self.missing.iter().map(|role| role.label().to_string()).collect()
    }

    /// The readiness error this result stands for, if invalid.
    pub fn to_error(&self) -> Option<ReadinessError> {
        if self.valid {
            return None;
        }
        let sheet = self.name.clone();
        if !self.missing.is_empty() {
            return Some(ReadinessError::MissingColumns {
                sheet,
                missing: self.missing_labels(),
            });
        }
        if !self.has_headers {
            return Some(ReadinessError::BlankHeaders { sheet });
        }
        Some(ReadinessError::NoDataRows { sheet })
    }
}

/// Validates `sheet` against the required roles of `wizard`.
///
/// Excluded sheets always report valid with nothing missing.
pub fn validate_sheet(sheet: &SheetConfig, wizard: WizardKind) -> SheetValidation {
    let has_rows = !sheet.data.rows.is_empty();
    let has_headers = sheet.data.has_nonblank_header();

    if !sheet.selected {
        return SheetValidation {
            sheet: sheet.id,
            name: sheet.display_name(),
            selected: false,
            missing: Vec::new(),
            has_rows,
            has_headers,
            valid: true,
        };
    }

    let missing: Vec<ColumnRole> = wizard
        .required_roles()
        .iter()
        .copied()
        .filter(|role| !sheet.mapping.is_mapped(*role))
        .collect();
    let valid = missing.is_empty() && has_rows && has_headers;

    SheetValidation {
        sheet: sheet.id,
        name: sheet.display_name(),
        selected: true,
        missing,
        has_rows,
        has_headers,
        valid,
    }
}

//! Produces the workbook file attached to each sheet's submission.

use intake_ingest::{Workbook, XLSX_MIME, read_sheet_grids};
use intake_model::{CellValue, FileSource, SheetConfig, WizardKind};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, XlsxError};
use thiserror::Error;
use tracing::{debug, warn};

use crate::form::FilePart;

const DEFAULT_BASE_NAME: &str = "google-images";
const LINK_BASE_NAME: &str = "image-links";
const MAX_SHEET_NAME_CHARS: usize = 31;
const DATE_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write workbook: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("{what} index {index} exceeds the worksheet limit")]
    OutOfBounds { what: &'static str, index: usize },

    #[error("worksheet '{0}' not found in the uploaded workbook")]
    SheetNotFound(String),

    #[error(transparent)]
    Ingest(#[from] intake_ingest::IngestError),
}

/// Upload name without its `.xls`/`.xlsx` extension.
pub fn upload_base_name(upload_name: &str) -> String {
    base_name_or(upload_name, DEFAULT_BASE_NAME)
}

fn base_name_or(upload_name: &str, fallback: &str) -> String {
    let lower = upload_name.to_ascii_lowercase();
    let stem = if lower.ends_with(".xlsx") {
        &upload_name[..upload_name.len() - 5]
    } else if lower.ends_with(".xls") {
        &upload_name[..upload_name.len() - 4]
    } else {
        upload_name
    };
    if stem.is_empty() {
        fallback.to_string()
    } else {
        stem.to_string()
    }
}

/// Sheet name with whitespace runs collapsed to `-`, lowercased.
///
/// Unnamed sheets are labelled by their position in the workbook.
pub fn sheet_label(sheet: &SheetConfig) -> String {
    let name = if sheet.name.trim().is_empty() {
        format!("sheet-{}", sheet.original_index + 1)
    } else {
        sheet.name.clone()
    };
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// Name of the file attached for `sheet`.
///
/// Crop uploads are `{upload stem}_crop.xlsx`; every other wizard uses
/// `{upload stem}-{sheet label}.xlsx`.
pub fn sheet_file_name(upload_name: &str, sheet: &SheetConfig, wizard: WizardKind) -> String {
    match wizard {
        WizardKind::Crop => {
            let stem = upload_name
                .rsplit_once('.')
                .map_or(upload_name, |(stem, _)| stem);
            format!("{stem}_crop.xlsx")
        }
        WizardKind::ImageLink => {
            format!("{}-{}.xlsx", base_name_or(upload_name, LINK_BASE_NAME), sheet_label(sheet))
        }
        WizardKind::GoogleImages | WizardKind::Reformat | WizardKind::DataWarehouse(_) => {
            format!("{}-{}.xlsx", upload_base_name(upload_name), sheet_label(sheet))
        }
    }
}

/// Builds the file part for `sheet` according to the wizard's file source.
///
/// Multi-sheet uploads are reduced to the one worksheet. When isolation
/// fails, the worksheet is rebuilt from the parsed grid instead.
pub fn prepare_file(
    workbook: &Workbook,
    sheet: &SheetConfig,
    wizard: WizardKind,
) -> Result<FilePart, ExportError> {
    let file_name = sheet_file_name(&workbook.file.name, sheet, wizard);
    let sheet_name = sheet.display_name();
    let upload_mime = || {
        if workbook.file.mime_type.is_empty() {
            XLSX_MIME.to_string()
        } else {
            workbook.file.mime_type.clone()
        }
    };

    let bytes = match wizard.file_source() {
        FileSource::RebuildFromTabular => {
            let rows = sheet
                .prefix_rows()
                .iter()
                .cloned()
                .chain(std::iter::once(header_row(&sheet.data.headers)))
                .chain(sheet.data.rows.iter().cloned());
            write_single_sheet(&sheet_name, rows)?
        }
        FileSource::OriginalUpload => {
            debug!(sheet = %sheet_name, "whole workbook sent as uploaded");
            return Ok(FilePart {
                file_name,
                mime_type: upload_mime(),
                bytes: workbook.file.bytes.clone(),
            });
        }
        FileSource::IsolateWhenMultiSheet if !workbook.is_multi_sheet() => {
            debug!(sheet = %sheet_name, "single-sheet workbook sent as uploaded");
            return Ok(FilePart {
                file_name,
                mime_type: upload_mime(),
                bytes: workbook.file.bytes.clone(),
            });
        }
        FileSource::IsolateWhenMultiSheet => match isolate_worksheet(workbook, sheet) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(sheet = %sheet_name, error = %err, "worksheet isolation failed; rebuilding from parsed rows");
                rebuild_from_parsed(sheet)?
            }
        },
    };

    Ok(FilePart {
        file_name,
        mime_type: XLSX_MIME.to_string(),
        bytes,
    })
}

/// Re-parses the retained upload and writes the matching worksheet alone.
fn isolate_worksheet(workbook: &Workbook, sheet: &SheetConfig) -> Result<Vec<u8>, ExportError> {
    let grids = read_sheet_grids(&workbook.file.name, &workbook.file.bytes)?;

    let mut candidates: Vec<String> = Vec::new();
    if !sheet.name.is_empty() {
        candidates.push(sheet.name.clone());
    }
    candidates.extend(workbook.sheet_names.get(sheet.original_index).cloned());
    candidates.push(format!("Sheet {}", sheet.original_index + 1));

    let (name, grid) = candidates
        .iter()
        .find_map(|candidate| grids.iter().find(|(name, _)| name == candidate))
        .ok_or_else(|| ExportError::SheetNotFound(sheet.name.clone()))?;

    debug!(sheet = %name, rows = grid.len(), "worksheet isolated");
    write_single_sheet(name, grid.iter().cloned())
}

fn rebuild_from_parsed(sheet: &SheetConfig) -> Result<Vec<u8>, ExportError> {
    let name = sheet.display_name();
    if sheet.raw.is_empty() {
        let rows = std::iter::once(header_row(&sheet.data.headers))
            .chain(sheet.data.rows.iter().cloned());
        write_single_sheet(&name, rows)
    } else {
        write_single_sheet(&name, sheet.raw.iter().cloned())
    }
}

fn header_row(headers: &[String]) -> Vec<CellValue> {
    headers.iter().map(|h| CellValue::Text(h.clone())).collect()
}

/// Writes `rows` into a new single-worksheet workbook.
pub fn write_single_sheet(
    sheet_name: &str,
    rows: impl IntoIterator<Item = Vec<CellValue>>,
) -> Result<Vec<u8>, ExportError> {
    let mut workbook = XlsxWorkbook::new();
    let date_format = Format::new().set_num_format(DATE_FORMAT);
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sanitize_sheet_name(sheet_name))?;

    for (row_idx, row) in rows.into_iter().enumerate() {
        let row_num = u32::try_from(row_idx).map_err(|_| ExportError::OutOfBounds {
            what: "row",
            index: row_idx,
        })?;
        for (col_idx, cell) in row.iter().enumerate() {
            let col_num = u16::try_from(col_idx).map_err(|_| ExportError::OutOfBounds {
                what: "column",
                index: col_idx,
            })?;
            match cell {
                CellValue::Empty => {}
                CellValue::Text(text) => {
                    worksheet.write_string(row_num, col_num, text)?;
                }
                CellValue::Number(value) => {
                    worksheet.write_number(row_num, col_num, *value)?;
                }
                CellValue::Bool(value) => {
                    worksheet.write_boolean(row_num, col_num, *value)?;
                }
                CellValue::DateTime(serial) => {
                    worksheet.write_number_with_format(row_num, col_num, *serial, &date_format)?;
                }
                CellValue::Error(text) => {
                    worksheet.write_string(row_num, col_num, text)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Makes `name` acceptable as a worksheet name.
fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '_',
            other => other,
        })
        .collect();
    let cleaned = cleaned.trim_matches('\'');
    let truncated: String = cleaned.chars().take(MAX_SHEET_NAME_CHARS).collect();
    if truncated.trim().is_empty() {
        "Sheet1".to_string()
    } else {
        truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_model::{ColumnMapping, SheetId};

    fn sheet(name: &str, original_index: usize) -> SheetConfig {
        SheetConfig::new(
            SheetId::new(0),
            name,
            original_index,
            Vec::new(),
            0,
            ColumnMapping::new(),
        )
    }

    #[test]
    fn base_name_strips_excel_extension() {
        assert_eq!(upload_base_name("Spring Catalog.XLSX"), "Spring Catalog");
        assert_eq!(upload_base_name("legacy.xls"), "legacy");
        assert_eq!(upload_base_name("data.csv"), "data.csv");
        assert_eq!(upload_base_name(".xlsx"), "google-images");
    }

    #[test]
    fn file_name_uses_sheet_label() {
        let images = WizardKind::GoogleImages;
        assert_eq!(
            sheet_file_name("catalog.xlsx", &sheet("Women  Shoes", 0), images),
            "catalog-women-shoes.xlsx"
        );
        assert_eq!(sheet_file_name("catalog.xlsx", &sheet("", 2), images), "catalog-sheet-3.xlsx");
    }

    #[test]
    fn link_and_crop_file_names() {
        assert_eq!(
            sheet_file_name(".xlsx", &sheet("Fall", 1), WizardKind::ImageLink),
            "image-links-fall.xlsx"
        );
        assert_eq!(
            sheet_file_name("spring.v2.xls", &sheet("Fall", 1), WizardKind::Crop),
            "spring.v2_crop.xlsx"
        );
    }

    #[test]
    fn sheet_names_are_sanitized() {
        assert_eq!(sanitize_sheet_name("Q1/Q2 [draft]"), "Q1_Q2 _draft_");
        assert_eq!(sanitize_sheet_name("'quoted'"), "quoted");
        assert_eq!(sanitize_sheet_name(""), "Sheet1");
        assert_eq!(sanitize_sheet_name(&"x".repeat(40)).len(), 31);
    }
}

//! Multipart form assembly for one sheet.

use intake_map::fallback_image_column;
use intake_model::{ColumnRole, DataWarehouseMode, SheetConfig, WizardKind};

use crate::config::SubmitOptions;
use crate::error::{Result, SubmitError};
use crate::letters::column_letter;
use crate::recipient::RecipientEmail;

/// Sent in place of a brand column letter when the brand is a typed constant.
pub const MANUAL_BRAND_SENTINEL: &str = "MANUAL";

/// The binary part of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Ordered text fields plus the workbook file for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionForm {
    pub file_field: &'static str,
    pub file: FilePart,
    pub fields: Vec<(String, String)>,
}

impl SubmissionForm {
    pub fn new(file_field: &'static str, file: FilePart) -> Self {
        Self {
            file_field,
            file,
            fields: Vec::new(),
        }
    }

    pub fn push(&mut self, name: &str, value: impl Into<String>) {
        self.fields.push((name.to_string(), value.into()));
    }

    fn push_flag(&mut self, name: &str, value: bool) {
        self.push(name, if value { "true" } else { "false" });
    }

    /// Value of the first field called `name`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    /// One `name=value` line per field, file part first.
    pub fn describe(&self) -> String {
        let mut lines = vec![format!(
            "{}=@{} ({}, {} bytes)",
            self.file_field,
            self.file.file_name,
            self.file.mime_type,
            self.file.bytes.len()
        )];
        lines.extend(
            self.fields
                .iter()
                .map(|(name, value)| format!("{name}={value}")),
        );
        lines.join("\n")
    }

    /// Equivalent `curl` invocation, for dry runs.
    pub fn to_curl(&self, url: &str) -> String {
        let mut parts = vec![format!("curl -X POST {}", shell_quote(url))];
        parts.push(format!(
            "  -F {}",
            shell_quote(&format!(
                "{}=@{};type={}",
                self.file_field, self.file.file_name, self.file.mime_type
            ))
        ));
        for (name, value) in &self.fields {
            parts.push(format!("  -F {}", shell_quote(&format!("{name}={value}"))));
        }
        parts.join(" \\\n")
    }
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Settings shared by every form of one submission.
#[derive(Debug, Clone, Copy)]
pub struct FormContext<'a> {
    pub wizard: WizardKind,
    pub recipient: &'a RecipientEmail,
    pub options: &'a SubmitOptions,
}

/// Column sent as `imageColumnImage`, if any.
pub fn image_column(sheet: &SheetConfig, wizard: WizardKind) -> Option<usize> {
    if wizard.separate_image_target() {
        return sheet.mapping.get(ColumnRole::ImageAdd);
    }
    if !wizard.allows_image_mapping() {
        return None;
    }
    sheet
        .mapping
        .get(ColumnRole::ReadImage)
        .or_else(|| sheet.mapping.get(ColumnRole::ImageAdd))
        .or_else(|| fallback_image_column(&sheet.data.headers, &sheet.data.rows))
}

/// Assembles the form for `sheet`.
pub fn build_form(
    ctx: &FormContext<'_>,
    sheet: &SheetConfig,
    file: FilePart,
) -> Result<SubmissionForm> {
    let style = sheet
        .mapping
        .get(ColumnRole::Style)
        .ok_or_else(|| SubmitError::MissingStyleColumn {
            sheet: sheet.display_name(),
        })?;

    let wizard = ctx.wizard;
    let mut form = SubmissionForm::new(wizard.file_field(), file);
    match wizard {
        WizardKind::ImageLink => {
            let link = required_image_column(sheet)?;
            form.push("searchColLink", column_letter(style));
            form.push("linkColumn", column_letter(link));
            form.push("header_index", (sheet.header_row + 1).to_string());
            form.push("sendToEmail", ctx.recipient.as_str());
            push_sheet_identity(&mut form, sheet);
            return Ok(form);
        }
        WizardKind::Crop => {
            let crop = required_image_column(sheet)?;
            form.push("header_index", (sheet.header_row + 1).to_string());
            form.push("searchColCrop", column_letter(style));
            form.push("cropColumn", column_letter(crop));
            form.push("sendToEmail", ctx.recipient.as_str());
            return Ok(form);
        }
        WizardKind::GoogleImages | WizardKind::Reformat | WizardKind::DataWarehouse(_) => {}
    }

    let letter_of = |role: ColumnRole| sheet.mapping.get(role).map(column_letter);
    form.push("searchColImage", column_letter(style));

    if wizard.mode().is_some() {
        form.push("msrpColImage", letter_of(ColumnRole::Msrp).unwrap_or_default());
    }

    match sheet.manual_value(ColumnRole::Brand) {
        Some(brand) => {
            form.push("brandColImage", MANUAL_BRAND_SENTINEL);
            form.push("manualBrand", brand);
        }
        None => {
            if let Some(letter) = letter_of(ColumnRole::Brand) {
                form.push("brandColImage", letter);
            }
        }
    }

    form.push(
        "imageColumnImage",
        image_column(sheet, wizard)
            .map(column_letter)
            .unwrap_or_default(),
    );
    if let Some(letter) = letter_of(ColumnRole::Color) {
        form.push("ColorColImage", letter);
    }
    if let Some(letter) = letter_of(ColumnRole::Category) {
        form.push("CategoryColImage", letter);
    }

    form.push("header_index", (sheet.header_row + 1).to_string());
    form.push("sendToEmail", ctx.recipient.as_str());

    let options = ctx.options;
    match wizard {
        WizardKind::GoogleImages => {
            push_sheet_identity(&mut form, sheet);
            form.push_flag("isIconDistro", options.is_icon_distro);
            form.push_flag("isAiMode", options.is_ai_mode);
            form.push_flag("skipDataWarehouse", options.skip_data_warehouse);
        }
        WizardKind::DataWarehouse(mode) => {
            push_sheet_identity(&mut form, sheet);
            form.push_flag("isIconDistro", options.is_icon_distro);
            form.push_flag("isAiMode", options.is_ai_mode);
            form.push_flag("skipDataWarehouse", options.skip_data_warehouse);
            form.push_flag("isNewDistro", options.is_new_distro);
            if mode != DataWarehouseMode::ImagesOnly {
                form.push("currency", options.currency.as_str());
            }
            form.push("dataWarehouseMode", mode.as_str());
            form.push_flag("isImagesOnly", wizard.separate_image_target());
            form.push_flag("isMsrpOnly", !wizard.allows_image_mapping());
            form.push("mode", mode.as_str());
        }
        WizardKind::Reformat => {
            form.push("currency", options.currency.as_str());
        }
        WizardKind::ImageLink | WizardKind::Crop => {}
    }

    Ok(form)
}

/// Image source column, which the link and crop wizards require.
fn required_image_column(sheet: &SheetConfig) -> Result<usize> {
    sheet
        .mapping
        .get(ColumnRole::ReadImage)
        .or_else(|| sheet.mapping.get(ColumnRole::ImageAdd))
        .ok_or_else(|| SubmitError::MissingImageColumn {
            sheet: sheet.display_name(),
        })
}

/// Name and 1-based workbook position of the worksheet to process.
fn push_sheet_identity(form: &mut SubmissionForm, sheet: &SheetConfig) {
    form.push("sheetName", sheet.display_name());
    form.push("sheetIndex", (sheet.original_index + 1).to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_model::{CellValue, ColumnMapping, SheetId};

    fn file() -> FilePart {
        FilePart {
            file_name: "catalog-sheet1.xlsx".to_string(),
            mime_type: "application/vnd.ms-excel".to_string(),
            bytes: vec![1, 2, 3],
        }
    }

    fn sheet(headers: &[&str], rows: &[&[&str]]) -> SheetConfig {
        let mut grid = vec![headers.iter().map(|h| CellValue::from(*h)).collect::<Vec<_>>()];
        grid.extend(
            rows.iter()
                .map(|row| row.iter().map(|v| CellValue::from(*v)).collect()),
        );
        SheetConfig::new(SheetId::new(0), "Sheet1", 0, grid, 0, ColumnMapping::new())
    }

    #[test]
    fn missing_style_is_rejected() {
        let email = RecipientEmail::parse("a@b.io").unwrap();
        let options = SubmitOptions::default();
        let ctx = FormContext {
            wizard: WizardKind::GoogleImages,
            recipient: &email,
            options: &options,
        };
        let err = build_form(&ctx, &sheet(&["SKU"], &[&["1"]]), file()).unwrap_err();
        assert!(matches!(err, SubmitError::MissingStyleColumn { .. }));
    }

    #[test]
    fn image_column_prefers_read_image() {
        let mut s = sheet(&["SKU", "Photo", "Target"], &[&["1", "x", ""]]);
        s.mapping.set(ColumnRole::ImageAdd, 2);
        let images = WizardKind::DataWarehouse(DataWarehouseMode::ImagesAndMsrp);
        assert_eq!(image_column(&s, images), Some(2));
        s.mapping.set(ColumnRole::ReadImage, 1);
        assert_eq!(image_column(&s, images), Some(1));

        let only = WizardKind::DataWarehouse(DataWarehouseMode::ImagesOnly);
        assert_eq!(image_column(&s, only), Some(2));
        let msrp = WizardKind::DataWarehouse(DataWarehouseMode::MsrpOnly);
        assert_eq!(image_column(&s, msrp), None);
    }

    #[test]
    fn image_column_falls_back_to_url_column() {
        let s = sheet(&["Link", "SKU"], &[&["", "1"], &["https://cdn.example.com/a.jpg", "2"]]);
        assert_eq!(image_column(&s, WizardKind::GoogleImages), Some(0));
        let s = sheet(&["SKU", "Link"], &[&["1", "https://cdn.example.com/a.jpg"]]);
        assert_eq!(image_column(&s, WizardKind::GoogleImages), None);
    }

    #[test]
    fn sheet_index_is_workbook_position() {
        let email = RecipientEmail::parse("a@b.io").unwrap();
        let options = SubmitOptions::default();
        let ctx = FormContext {
            wizard: WizardKind::GoogleImages,
            recipient: &email,
            options: &options,
        };
        let mut s = sheet(&["Style"], &[&["1"]]);
        s.original_index = 3;
        s.mapping.set(ColumnRole::Style, 0);
        let form = build_form(&ctx, &s, file()).unwrap();
        assert_eq!(form.field("sheetIndex"), Some("4"));
    }

    #[test]
    fn link_and_crop_need_an_image_column() {
        let email = RecipientEmail::parse("a@b.io").unwrap();
        let options = SubmitOptions::default();
        let mut s = sheet(&["Style", "Link"], &[&["1", "https://cdn.example.com/a.jpg"]]);
        s.mapping.set(ColumnRole::Style, 0);
        for wizard in [WizardKind::ImageLink, WizardKind::Crop] {
            let ctx = FormContext {
                wizard,
                recipient: &email,
                options: &options,
            };
            let err = build_form(&ctx, &s, file()).unwrap_err();
            assert!(matches!(err, SubmitError::MissingImageColumn { .. }));
        }
    }

    #[test]
    fn curl_quotes_values() {
        let mut form = SubmissionForm::new("fileUploadImage", file());
        form.push("manualBrand", "O'Neill");
        let curl = form.to_curl("http://localhost/submitImage");
        assert!(curl.starts_with("curl -X POST 'http://localhost/submitImage'"));
        assert!(curl.contains(r"-F 'manualBrand=O'\''Neill'"));
        assert!(curl.contains("-F 'fileUploadImage=@catalog-sheet1.xlsx;type=application/vnd.ms-excel'"));
    }

    #[test]
    fn field_lookup() {
        let mut form = SubmissionForm::new("fileUploadImage", file());
        form.push("header_index", "1");
        assert_eq!(form.field("header_index"), Some("1"));
        assert_eq!(form.field("sendToEmail"), None);
        assert!(form.describe().starts_with("fileUploadImage=@catalog-sheet1.xlsx"));
    }
}

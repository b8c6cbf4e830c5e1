//! Read-only views used to render mapping screens.

use intake_ingest::patterns::{is_http_url, mentions_image};
use intake_model::{CellValue, ColumnMapping, ColumnRole, SheetConfig, WizardKind};
use serde::Serialize;

const PREVIEW_VALUES: usize = 3;
const NO_VALUES: &str = "No values";

/// First few non-blank values of `column`, joined for display.
pub fn column_preview(rows: &[Vec<CellValue>], column: usize) -> String {
    let values: Vec<String> = rows
        .iter()
        .filter_map(|row| row.get(column))
        .map(CellValue::display)
        .filter(|value| !value.trim().is_empty())
        .take(PREVIEW_VALUES)
        .collect();
    if values.is_empty() {
        NO_VALUES.to_string()
    } else {
        values.join(", ")
    }
}

/// Columns mapped to any non-image role the wizard accepts, ascending.
pub fn mapped_data_columns(mapping: &ColumnMapping, wizard: WizardKind) -> Vec<usize> {
    let mut columns: Vec<usize> = wizard
        .all_roles()
        .into_iter()
        .filter_map(|role| mapping.get(role))
        .collect();
    columns.sort_unstable();
    columns.dedup();
    columns
}

/// Mapped data columns plus the image pair, for highlighting.
pub fn highlighted_columns(mapping: &ColumnMapping, wizard: WizardKind) -> Vec<usize> {
    let mut columns = mapped_data_columns(mapping, wizard);
    if wizard.allows_image_mapping() {
        columns.extend(
            [ColumnRole::ReadImage, ColumnRole::ImageAdd]
                .into_iter()
                .filter_map(|role| mapping.get(role)),
        );
    }
    columns.sort_unstable();
    columns.dedup();
    columns
}

/// Guesses an image column when none is mapped.
///
/// Only the first column is considered: it qualifies when its header mentions
/// an image or its first non-blank value is an http(s) URL.
pub fn fallback_image_column(headers: &[String], rows: &[Vec<CellValue>]) -> Option<usize> {
    let header = headers.first()?;
    if mentions_image(header) {
        return Some(0);
    }
    let first_value = rows
        .iter()
        .filter_map(|row| row.first())
        .map(CellValue::display)
        .find(|value| !value.trim().is_empty())?;
    is_http_url(&first_value).then_some(0)
}

/// One header with its mapped roles and sample values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSummary {
    pub index: usize,
    pub header: String,
    pub roles: Vec<ColumnRole>,
    pub manual: bool,
    pub preview: String,
}

pub fn column_summaries(sheet: &SheetConfig) -> Vec<ColumnSummary> {
    sheet
        .data
        .headers
        .iter()
        .enumerate()
        .map(|(index, header)| ColumnSummary {
            index,
            header: header.clone(),
            roles: sheet.mapping.roles_at(index),
            manual: sheet.manual_at(index).is_some(),
            preview: column_preview(&sheet.data.rows, index),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_model::DataWarehouseMode;

    fn rows(values: &[&[&str]]) -> Vec<Vec<CellValue>> {
        values
            .iter()
            .map(|row| row.iter().map(|v| CellValue::from(*v)).collect())
            .collect()
    }

    #[test]
    fn preview_takes_three_non_blank_values() {
        let data = rows(&[&["a"], &[""], &["b"], &["c"], &["d"]]);
        assert_eq!(column_preview(&data, 0), "a, b, c");
        assert_eq!(column_preview(&data, 4), "No values");
        assert_eq!(column_preview(&[], 0), "No values");
    }

    #[test]
    fn preview_skips_short_rows() {
        let data = vec![
            vec![CellValue::from("x")],
            vec![CellValue::from("y"), CellValue::Number(12.5)],
        ];
        assert_eq!(column_preview(&data, 1), "12.5");
    }

    #[test]
    fn highlighted_adds_image_pair() {
        let mut mapping = ColumnMapping::new();
        mapping.set(ColumnRole::Style, 2);
        mapping.set(ColumnRole::Brand, 0);
        mapping.set(ColumnRole::Price, 5);
        mapping.set(ColumnRole::ReadImage, 3);
        mapping.set(ColumnRole::ImageAdd, 3);

        let wizard = WizardKind::GoogleImages;
        assert_eq!(mapped_data_columns(&mapping, wizard), vec![0, 2]);
        assert_eq!(highlighted_columns(&mapping, wizard), vec![0, 2, 3]);

        let msrp_only = WizardKind::DataWarehouse(DataWarehouseMode::MsrpOnly);
        assert_eq!(highlighted_columns(&mapping, msrp_only), vec![0, 2]);
    }

    #[test]
    fn fallback_image_by_header_or_url() {
        let headers = vec!["Main Image".to_string(), "Style".to_string()];
        assert_eq!(fallback_image_column(&headers, &[]), Some(0));

        let headers = vec!["Link".to_string()];
        let data = rows(&[&[""], &["https://cdn.example.com/1.jpg"]]);
        assert_eq!(fallback_image_column(&headers, &data), Some(0));

        let data = rows(&[&["A-1"], &["https://cdn.example.com/1.jpg"]]);
        assert_eq!(fallback_image_column(&headers, &data), None);
        assert_eq!(fallback_image_column(&[], &data), None);
    }
}

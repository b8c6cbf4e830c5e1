use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use intake_map::{MappingSession, column_summaries};
use intake_model::{CellValue, ColumnRole, SheetConfig};
use intake_submit::{PreparedSubmission, SubmissionReport, column_letter};

const PREVIEW_WIDTH: usize = 40;

pub fn print_sheets(session: &MappingSession) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Sheet"),
        header_cell("Header row"),
        header_cell("Detected by"),
        header_cell("Rows"),
        header_cell("Selected"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Center);

    for (position, (sheet, validation)) in session
        .sheets()
        .zip(session.validations())
        .enumerate()
    {
        let detected = match session.detected_header(sheet.id) {
            Some(guess) if guess.basis.is_heuristic() => {
                Cell::new(format!("{:?}", guess.basis)).fg(Color::Yellow)
            }
            Some(guess) => Cell::new(format!("{:?}", guess.basis)),
            None => dim_cell("-"),
        };
        let status = if !validation.selected {
            dim_cell("excluded")
        } else if validation.valid {
            Cell::new("ready").fg(Color::Green)
        } else {
            let mut problems = Vec::new();
            if !validation.missing.is_empty() {
                problems.push(format!("missing {}", validation.missing_labels().join(", ")));
            }
            if !validation.has_headers {
                problems.push("blank headers".to_string());
            }
            if !validation.has_rows {
                problems.push("no data rows".to_string());
            }
            Cell::new(problems.join("; ")).fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(position + 1),
            Cell::new(sheet.display_name()),
            Cell::new(sheet.header_row + 1),
            detected,
            Cell::new(sheet.data.rows.len()),
            Cell::new(if sheet.selected { "yes" } else { "no" }),
            status,
        ]);
    }
    println!("{table}");
}

pub fn print_columns(sheet: &SheetConfig) {
    println!("Sheet: {}", sheet.display_name());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Col"),
        header_cell("Header"),
        header_cell("Mapped as"),
        header_cell("Preview"),
    ]);
    apply_table_style(&mut table);
    for column in column_summaries(sheet) {
        let roles = role_cell(&column.roles, column.manual);
        table.add_row(vec![
            Cell::new(column_letter(column.index)).add_attribute(Attribute::Bold),
            Cell::new(&column.header),
            roles,
            dim_cell(truncate(&column.preview, PREVIEW_WIDTH)),
        ]);
    }
    println!("{table}");
}

/// First `limit` raw rows, with the header row marked.
pub fn print_raw_rows(sheet: &SheetConfig, limit: usize) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Row"), header_cell("Values")]);
    apply_table_style(&mut table);
    for (index, row) in sheet.raw.iter().take(limit).enumerate() {
        let values: Vec<String> = row.iter().map(CellValue::display).collect();
        let label = Cell::new(index + 1);
        let label = if index == sheet.header_row {
            label.fg(Color::Cyan).add_attribute(Attribute::Bold)
        } else {
            label
        };
        table.add_row(vec![label, Cell::new(truncate(&values.join(" | "), 100))]);
    }
    println!("{table}");
}

pub fn print_prepared(prepared: &[PreparedSubmission]) {
    for (position, item) in prepared.iter().enumerate() {
        println!("# {}. {}", position + 1, item.name);
        println!("{}", item.form.to_curl(&item.url));
        println!();
    }
}

pub fn print_report(report: &SubmissionReport) {
    println!("Endpoint: {}", report.endpoint);
    let mut table = Table::new();
    table.set_header(vec![header_cell("Sheet"), header_cell("Status")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for sheet in &report.submitted {
        table.add_row(vec![
            Cell::new(&sheet.name),
            Cell::new(sheet.status).fg(Color::Green),
        ]);
    }
    println!("{table}");
    println!("Submitted {} sheet(s)", report.submitted.len());
}

fn role_cell(roles: &[ColumnRole], manual: bool) -> Cell {
    if roles.is_empty() {
        return dim_cell("-");
    }
    let mut text = roles
        .iter()
        .map(|role| role.label())
        .collect::<Vec<_>>()
        .join(", ");
    if manual {
        text.push_str(" (manual)");
    }
    Cell::new(text).fg(Color::Cyan)
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

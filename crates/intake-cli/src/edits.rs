//! Mapping edits given on the command line.
//!
//! Sheets are named by worksheet name (case-insensitive) or by 1-based
//! position. Columns use spreadsheet letters and header rows are 1-based.

use std::str::FromStr;

use anyhow::{Context, Result, bail};
use clap::Args;
use intake_map::MappingSession;
use intake_model::{ColumnRole, SheetId};
use intake_submit::column_index;
use tracing::{debug, info};

/// `SHEET=ROW`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEdit {
    pub sheet: String,
    /// Zero-based.
    pub row: usize,
}

/// `SHEET:COL=ROLE`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEdit {
    pub sheet: String,
    pub column: usize,
    pub role: ColumnRole,
}

/// `SHEET:COL`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearEdit {
    pub sheet: String,
    pub column: usize,
}

/// `SHEET:ROLE=VALUE`; an empty value removes the manual column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualEdit {
    pub sheet: String,
    pub role: ColumnRole,
    pub value: String,
}

fn parse_column(value: &str) -> Result<usize, String> {
    column_index(value.trim())
        .ok_or_else(|| format!("invalid column '{value}': expected letters like A or AB"))
}

fn parse_role(value: &str) -> Result<ColumnRole, String> {
    value.parse::<ColumnRole>().map_err(|e| format!("{e}"))
}

fn non_empty_sheet(sheet: &str, input: &str) -> Result<String, String> {
    let sheet = sheet.trim();
    if sheet.is_empty() {
        return Err(format!("missing sheet in '{input}'"));
    }
    Ok(sheet.to_string())
}

impl FromStr for HeaderEdit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sheet, row) = s
            .rsplit_once('=')
            .ok_or_else(|| format!("expected SHEET=ROW, got '{s}'"))?;
        let row: usize = row
            .trim()
            .parse()
            .map_err(|_| format!("invalid header row '{row}': expected a number from 1"))?;
        if row == 0 {
            return Err("header rows start at 1".to_string());
        }
        Ok(Self {
            sheet: non_empty_sheet(sheet, s)?,
            row: row - 1,
        })
    }
}

impl FromStr for MapEdit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (target, role) = s
            .rsplit_once('=')
            .ok_or_else(|| format!("expected SHEET:COL=ROLE, got '{s}'"))?;
        let (sheet, column) = target
            .rsplit_once(':')
            .ok_or_else(|| format!("expected SHEET:COL=ROLE, got '{s}'"))?;
        Ok(Self {
            sheet: non_empty_sheet(sheet, s)?,
            column: parse_column(column)?,
            role: parse_role(role)?,
        })
    }
}

impl FromStr for ClearEdit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sheet, column) = s
            .rsplit_once(':')
            .ok_or_else(|| format!("expected SHEET:COL, got '{s}'"))?;
        Ok(Self {
            sheet: non_empty_sheet(sheet, s)?,
            column: parse_column(column)?,
        })
    }
}

impl FromStr for ManualEdit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sheet, rest) = s
            .split_once(':')
            .ok_or_else(|| format!("expected SHEET:ROLE=VALUE, got '{s}'"))?;
        let (role, value) = rest
            .split_once('=')
            .ok_or_else(|| format!("expected SHEET:ROLE=VALUE, got '{s}'"))?;
        Ok(Self {
            sheet: non_empty_sheet(sheet, s)?,
            role: parse_role(role)?,
            value: value.to_string(),
        })
    }
}

/// Edits applied on top of the automatic mapping.
///
/// Applied by kind: header rows, clears, column mappings, manual values,
/// exclusions, inclusions.
#[derive(Debug, Clone, Default, Args)]
pub struct EditSet {
    /// Use ROW (1-based) as the header row of SHEET. Re-runs auto-mapping.
    #[arg(long = "header", value_name = "SHEET=ROW")]
    pub headers: Vec<HeaderEdit>,

    /// Unmap every role on a column.
    #[arg(long = "clear", value_name = "SHEET:COL")]
    pub clears: Vec<ClearEdit>,

    /// Map a column to a role (style, brand, msrp, category, color, ...).
    #[arg(long = "map", value_name = "SHEET:COL=ROLE")]
    pub maps: Vec<MapEdit>,

    /// Fill a role with a constant value. An empty VALUE removes it.
    #[arg(long = "manual", value_name = "SHEET:ROLE=VALUE")]
    pub manuals: Vec<ManualEdit>,

    /// Leave a sheet out of the submission.
    #[arg(long = "exclude", value_name = "SHEET")]
    pub excludes: Vec<String>,

    /// Include a sheet in the submission.
    #[arg(long = "include", value_name = "SHEET")]
    pub includes: Vec<String>,
}

impl EditSet {
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
            && self.clears.is_empty()
            && self.maps.is_empty()
            && self.manuals.is_empty()
            && self.excludes.is_empty()
            && self.includes.is_empty()
    }
}

/// Resolves a sheet by name, then by 1-based position.
pub fn resolve_sheet(session: &MappingSession, sheet: &str) -> Result<SheetId> {
    if let Some(id) = session.find_by_name(sheet) {
        return Ok(id);
    }
    let ids = session.sheet_ids();
    if let Ok(position) = sheet.trim().parse::<usize>()
        && position >= 1
        && let Some(id) = ids.get(position - 1)
    {
        return Ok(*id);
    }
    bail!("no sheet named '{sheet}'")
}

pub fn apply_edits(session: &mut MappingSession, edits: &EditSet) -> Result<()> {
    let wizard = session.wizard();

    for edit in &edits.headers {
        let id = resolve_sheet(session, &edit.sheet)?;
        if !session.set_header_row(id, edit.row)? {
            bail!(
                "header row {} is past the end of sheet '{}'",
                edit.row + 1,
                edit.sheet
            );
        }
    }

    for edit in &edits.clears {
        let id = resolve_sheet(session, &edit.sheet)?;
        session.clear_mapping(id, edit.column)?;
    }

    for edit in &edits.maps {
        let id = resolve_sheet(session, &edit.sheet)?;
        if !wizard.accepts(edit.role) {
            bail!("the {wizard} wizard does not use a {} column", edit.role.label());
        }
        if edit.role.is_image() && !wizard.separate_image_target() {
            session.map_image_column(id, Some(edit.column))?;
        } else {
            session
                .map_column(id, edit.column, edit.role)
                .with_context(|| format!("map {} on sheet '{}'", edit.role, edit.sheet))?;
        }
    }

    for edit in &edits.manuals {
        let id = resolve_sheet(session, &edit.sheet)?;
        if edit.value.trim().is_empty() {
            if !session.remove_manual_value(id, edit.role)? {
                debug!(sheet = %edit.sheet, role = %edit.role, "no manual value to remove");
            }
        } else {
            session
                .apply_manual_value(id, edit.role, &edit.value)
                .with_context(|| format!("set manual {} on sheet '{}'", edit.role, edit.sheet))?;
        }
    }

    for sheet in &edits.excludes {
        let id = resolve_sheet(session, sheet)?;
        session.set_selected(id, false)?;
    }
    for sheet in &edits.includes {
        let id = resolve_sheet(session, sheet)?;
        session.set_selected(id, true)?;
    }

    if !edits.is_empty() {
        info!(wizard = %wizard, "mapping edits applied");
    }
    Ok(())
}

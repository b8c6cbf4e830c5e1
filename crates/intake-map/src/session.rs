//! Mapping session: the per-upload arena of sheet configurations.
//!
//! Every edit addresses a sheet by its stable [`SheetId`] and either applies
//! fully or leaves the sheet untouched.

use std::collections::BTreeMap;

use intake_ingest::{HeaderGuess, Workbook, detect_header};
use intake_model::{
    CellValue, ColumnRole, ManualColumn, RawGrid, SheetConfig, SheetId, TabularData, WizardKind,
    manual_header,
};
use tracing::{debug, info, warn};

use crate::auto::auto_map_for;
use crate::error::{MappingError, ReadinessError, Result};
use crate::validation::{SheetValidation, validate_sheet};

#[derive(Debug, Clone)]
pub struct MappingSession {
    wizard: WizardKind,
    sheets: BTreeMap<SheetId, SheetConfig>,
    detected: BTreeMap<SheetId, HeaderGuess>,
    next_id: u32,
}

impl MappingSession {
    pub fn new(wizard: WizardKind) -> Self {
        Self {
            wizard,
            sheets: BTreeMap::new(),
            detected: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Builds one sheet configuration per non-empty worksheet.
    ///
    /// Only the first sheet starts selected.
    pub fn from_workbook(workbook: &Workbook, wizard: WizardKind) -> Self {
        let mut session = Self::new(wizard);
        for sheet in &workbook.sheets {
            session.add_sheet(sheet.name.clone(), sheet.original_index, sheet.grid.clone());
        }
        info!(
            file = %workbook.file.name,
            wizard = %wizard,
            sheets = session.sheets.len(),
            "mapping session created"
        );
        session
    }

    /// Detects the header, auto-maps, and stores a new sheet.
    pub fn add_sheet(&mut self, name: String, original_index: usize, grid: RawGrid) -> SheetId {
        let id = SheetId::new(self.next_id);
        self.next_id += 1;

        let guess = detect_header(&grid);
        if guess.basis.is_heuristic() {
            warn!(
                sheet = %name,
                row = guess.row,
                "no clear header row detected; verify the header selection"
            );
        }
        let headers = TabularData::slice(&grid, guess.row).headers;
        let mapping = auto_map_for(self.wizard, &headers);
        let mut config = SheetConfig::new(id, name, original_index, grid, guess.row, mapping);
        config.selected = self.sheets.is_empty();

        self.detected.insert(id, guess);
        self.sheets.insert(id, config);
        id
    }

    pub fn wizard(&self) -> WizardKind {
        self.wizard
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn sheet(&self, id: SheetId) -> Option<&SheetConfig> {
        self.sheets.get(&id)
    }

    /// Sheets in workbook order.
    pub fn sheets(&self) -> impl Iterator<Item = &SheetConfig> {
        self.sheets.values()
    }

    pub fn sheet_ids(&self) -> Vec<SheetId> {
        self.sheets.keys().copied().collect()
    }

    pub fn selected_sheets(&self) -> impl Iterator<Item = &SheetConfig> {
        self.sheets.values().filter(|sheet| sheet.selected)
    }

    /// Looks a sheet up by exact name, then case-insensitively.
    pub fn find_by_name(&self, name: &str) -> Option<SheetId> {
        self.sheets
            .values()
            .find(|sheet| sheet.name == name)
            .or_else(|| {
                self.sheets
                    .values()
                    .find(|sheet| sheet.name.eq_ignore_ascii_case(name))
            })
            .map(|sheet| sheet.id)
    }

    /// Header guess made when the sheet was added.
    pub fn detected_header(&self, id: SheetId) -> Option<HeaderGuess> {
        self.detected.get(&id).copied()
    }

    fn sheet_mut(&mut self, id: SheetId) -> Result<&mut SheetConfig> {
        self.sheets.get_mut(&id).ok_or(MappingError::UnknownSheet(id))
    }

    /// Re-slices the sheet at `row`, re-runs auto-mapping and drops manual
    /// columns. Returns `false` without changes when `row` is out of bounds.
    pub fn set_header_row(&mut self, id: SheetId, row: usize) -> Result<bool> {
        let wizard = self.wizard;
        let sheet = self.sheet_mut(id)?;
        if row >= sheet.raw.len() {
            debug!(sheet = %sheet.name, row, rows = sheet.raw.len(), "header row out of bounds");
            return Ok(false);
        }
        sheet.header_row = row;
        sheet.data = TabularData::slice(&sheet.raw, row);
        sheet.mapping = auto_map_for(wizard, &sheet.data.headers);
        sheet.manual.clear();
        debug!(sheet = %sheet.name, row, "header row changed");
        Ok(true)
    }

    /// Points `role` at `column`, evicting any other non-image role there.
    ///
    /// Roles the wizard does not accept are ignored.
    pub fn map_column(&mut self, id: SheetId, column: usize, role: ColumnRole) -> Result<()> {
        let wizard = self.wizard;
        let sheet = self.sheet_mut(id)?;
        if !wizard.accepts(role) {
            warn!(sheet = %sheet.name, role = %role, wizard = %wizard, "role not used by this wizard");
            return Ok(());
        }
        let width = sheet.data.column_count();
        if column >= width {
            warn!(sheet = %sheet.name, column, width, "column out of range");
            return Err(MappingError::ColumnOutOfRange { column, width });
        }
        if let Some(owner) = sheet.manual_at(column).map(|manual| manual.role)
            && owner != role
        {
            warn!(sheet = %sheet.name, column, owner = %owner, "column holds a manual value");
            return Err(MappingError::ManualColumnOwned { column, owner });
        }

        let mut column = column;
        if let Some(existing) = sheet.manual_column(role).map(|manual| manual.index)
            && existing != column
        {
            remove_manual_column(sheet, role);
            if column > existing {
                column -= 1;
            }
        }

        if !role.is_image() {
            for other in sheet.mapping.roles_at(column) {
                if !other.is_image() {
                    sheet.mapping.unmap(other);
                }
            }
        }
        sheet.mapping.set(role, column);
        debug!(sheet = %sheet.name, column, role = %role, "column mapped");
        Ok(())
    }

    /// Sets the image target column, mirrored to the image source column
    /// unless the wizard maps the two separately. `None` clears it.
    pub fn map_image_column(&mut self, id: SheetId, column: Option<usize>) -> Result<()> {
        let wizard = self.wizard;
        let sheet = self.sheet_mut(id)?;
        if !wizard.allows_image_mapping() {
            warn!(sheet = %sheet.name, wizard = %wizard, "image columns not used by this wizard");
            return Ok(());
        }
        let mut roles = vec![ColumnRole::ImageAdd];
        if !wizard.separate_image_target() {
            roles.push(ColumnRole::ReadImage);
        }
        match column {
            Some(column) => {
                let width = sheet.data.column_count();
                if column >= width {
                    return Err(MappingError::ColumnOutOfRange { column, width });
                }
                for role in roles {
                    sheet.mapping.set(role, column);
                }
                debug!(sheet = %sheet.name, column, "image column mapped");
            }
            None => {
                for role in roles {
                    sheet.mapping.unmap(role);
                }
                debug!(sheet = %sheet.name, "image column cleared");
            }
        }
        Ok(())
    }

    /// Unmaps every non-image role at `column`. A manual column there is
    /// removed along with its role.
    pub fn clear_mapping(&mut self, id: SheetId, column: usize) -> Result<()> {
        let sheet = self.sheet_mut(id)?;
        for role in sheet.mapping.roles_at(column) {
            if role.is_image() {
                continue;
            }
            if sheet.manual_at(column).is_some_and(|manual| manual.role == role) {
                remove_manual_column(sheet, role);
            } else {
                sheet.mapping.unmap(role);
            }
            debug!(sheet = %sheet.name, column, role = %role, "mapping cleared");
        }
        Ok(())
    }

    /// Fills a synthesized column with `value` and maps `role` onto it.
    ///
    /// An existing manual column for `role` is overwritten in place.
    pub fn apply_manual_value(&mut self, id: SheetId, role: ColumnRole, value: &str) -> Result<()> {
        let wizard = self.wizard;
        let sheet = self.sheet_mut(id)?;
        if !wizard.allows_manual(role) {
            warn!(sheet = %sheet.name, role = %role, "role cannot take a manual value");
            return Err(MappingError::NotManualRole(role));
        }
        let value = value.trim();
        if value.is_empty() {
            warn!(sheet = %sheet.name, role = %role, "blank manual value rejected");
            return Err(MappingError::BlankManualValue(role));
        }

        if let Some(index) = sheet.manual_column(role).map(|manual| manual.index) {
            for row in &mut sheet.data.rows {
                if let Some(cell) = row.get_mut(index) {
                    *cell = CellValue::from(value);
                }
            }
            if let Some(manual) = sheet.manual.iter_mut().find(|manual| manual.role == role) {
                manual.value = value.to_string();
            }
            sheet.mapping.set(role, index);
            debug!(sheet = %sheet.name, role = %role, index, "manual value updated");
            return Ok(());
        }

        let index = sheet.data.column_count();
        sheet.data.headers.push(manual_header(role));
        let mut row_lengths = Vec::with_capacity(sheet.data.rows.len());
        for row in &mut sheet.data.rows {
            row_lengths.push(row.len());
            if row.len() < index {
                row.resize(index, CellValue::Empty);
            }
            row.insert(index, CellValue::from(value));
        }
        sheet.manual.push(ManualColumn {
            role,
            index,
            value: value.to_string(),
            row_lengths,
        });
        sheet.mapping.set(role, index);
        debug!(sheet = %sheet.name, role = %role, index, "manual column added");
        Ok(())
    }

    /// Removes the manual column for `role`. Returns `false` when there is none.
    pub fn remove_manual_value(&mut self, id: SheetId, role: ColumnRole) -> Result<bool> {
        let sheet = self.sheet_mut(id)?;
        let removed = remove_manual_column(sheet, role);
        if removed {
            debug!(sheet = %sheet.name, role = %role, "manual column removed");
        }
        Ok(removed)
    }

    /// Flips inclusion in the submission. Returns the new state.
    pub fn toggle_selection(&mut self, id: SheetId) -> Result<bool> {
        let sheet = self.sheet_mut(id)?;
        sheet.selected = !sheet.selected;
        debug!(sheet = %sheet.name, selected = sheet.selected, "selection toggled");
        Ok(sheet.selected)
    }

    pub fn set_selected(&mut self, id: SheetId, selected: bool) -> Result<()> {
        let sheet = self.sheet_mut(id)?;
        sheet.selected = selected;
        Ok(())
    }

    pub fn validate(&self, id: SheetId) -> Result<SheetValidation> {
        self.sheet(id)
            .map(|sheet| validate_sheet(sheet, self.wizard))
            .ok_or(MappingError::UnknownSheet(id))
    }

    pub fn validations(&self) -> Vec<SheetValidation> {
        self.sheets
            .values()
            .map(|sheet| validate_sheet(sheet, self.wizard))
            .collect()
    }

    /// Ids of the selected sheets, in order, when all of them are valid.
    pub fn check_ready(&self) -> std::result::Result<Vec<SheetId>, ReadinessError> {
        if self.sheets.is_empty() {
            return Err(ReadinessError::NoSheets);
        }
        let selected: Vec<&SheetConfig> = self.selected_sheets().collect();
        if selected.is_empty() {
            return Err(ReadinessError::NoSheetsSelected);
        }
        for sheet in &selected {
            if let Some(err) = validate_sheet(sheet, self.wizard).to_error() {
                return Err(err);
            }
        }
        Ok(selected.iter().map(|sheet| sheet.id).collect())
    }
}

/// Physically deletes the manual column of `role` and shifts later columns.
///
/// Empty cells padded onto short rows are trimmed back to the row's length
/// before the column was added. Trimming stops at any remaining value, so
/// padding under a later manual column stays until that column goes too.
fn remove_manual_column(sheet: &mut SheetConfig, role: ColumnRole) -> bool {
    let Some(position) = sheet.manual.iter().position(|manual| manual.role == role) else {
        return false;
    };
    let removed = sheet.manual.remove(position);
    let index = removed.index;

    if index < sheet.data.headers.len() {
        sheet.data.headers.remove(index);
    }
    for (row_idx, row) in sheet.data.rows.iter_mut().enumerate() {
        if index < row.len() {
            row.remove(index);
        }
        if let Some(&original) = removed.row_lengths.get(row_idx) {
            while row.len() > original && row.last() == Some(&CellValue::Empty) {
                row.pop();
            }
        }
    }
    sheet.mapping.shift_after_removal(index);
    for manual in &mut sheet.manual {
        if manual.index > index {
            manual.index -= 1;
            // Later columns inherit the padding the removed column added.
            for (length, &original) in manual.row_lengths.iter_mut().zip(&removed.row_lengths) {
                *length = length.saturating_sub(1).min(original);
            }
        }
    }
    true
}

use intake_ingest::{IngestOptions, UploadedFile, XLSX_MIME, read_workbook};
use intake_map::{MappingSession, auto_map_columns};
use intake_model::{
    CellValue, ColumnRole, DataWarehouseMode, RawGrid, SheetConfig, SheetId, WizardKind,
    manual_header,
};
use proptest::prelude::*;
use rust_xlsxwriter::Workbook as XlsxWorkbook;

fn two_sheet_upload() -> UploadedFile {
    let mut workbook = XlsxWorkbook::new();
    let products = workbook.add_worksheet();
    products.set_name("Products").unwrap();
    for (col, header) in ["SKU", "Manufacturer", "Price"].iter().enumerate() {
        products.write_string(0, col as u16, *header).unwrap();
    }
    products.write_string(1, 0, "A-100").unwrap();
    products.write_string(1, 1, "Acme").unwrap();
    products.write_number(1, 2, 49.5).unwrap();

    let other = workbook.add_worksheet();
    other.set_name("Other").unwrap();
    other.write_string(0, 0, "foo").unwrap();
    other.write_string(0, 1, "bar").unwrap();
    other.write_string(1, 0, "1").unwrap();
    other.write_string(1, 1, "2").unwrap();

    UploadedFile::new("upload.xlsx", XLSX_MIME, workbook.save_to_buffer().unwrap())
}

#[test]
fn two_sheet_upload_maps_first_sheet_and_reports_missing() {
    let workbook = read_workbook(two_sheet_upload(), &IngestOptions::default()).unwrap();
    let wizard = WizardKind::DataWarehouse(DataWarehouseMode::ImagesAndMsrp);
    let mut session = MappingSession::from_workbook(&workbook, wizard);

    let ids = session.sheet_ids();
    assert_eq!(ids.len(), 2);

    let products = session.sheet(ids[0]).unwrap();
    assert_eq!(products.mapping.get(ColumnRole::Style), Some(0));
    assert_eq!(products.mapping.get(ColumnRole::Brand), Some(1));
    assert_eq!(products.mapping.get(ColumnRole::Msrp), None);

    let first = session.validate(ids[0]).unwrap();
    assert!(!first.valid);
    assert_eq!(first.missing, vec![ColumnRole::Msrp]);

    session.toggle_selection(ids[1]).unwrap();
    let second = session.validate(ids[1]).unwrap();
    assert!(session.sheet(ids[1]).unwrap().mapping.mapped_indices().is_empty());
    assert_eq!(second.missing, vec![ColumnRole::Style, ColumnRole::Msrp]);
    assert!(session.check_ready().is_err());

    session.map_column(ids[0], 2, ColumnRole::Msrp).unwrap();
    session.toggle_selection(ids[1]).unwrap();
    assert_eq!(session.check_ready().unwrap(), vec![ids[0]]);
}

#[test]
fn excluded_sheet_always_validates() {
    let workbook = read_workbook(two_sheet_upload(), &IngestOptions::default()).unwrap();
    let session = MappingSession::from_workbook(&workbook, WizardKind::GoogleImages);
    let other = session.sheet_ids()[1];

    let result = session.validate(other).unwrap();
    assert!(!result.selected);
    assert!(result.valid);
    assert!(result.missing.is_empty());
}

fn rectangular_sheet() -> RawGrid {
    vec![
        vec![CellValue::from("Style"), CellValue::from("Brand"), CellValue::from("Category")],
        vec![CellValue::from("A"), CellValue::from("B"), CellValue::from("C")],
        vec![CellValue::from("D"), CellValue::Empty, CellValue::Number(2.0)],
    ]
}

#[test]
fn manual_value_round_trip_restores_shape() {
    let mut session = MappingSession::new(WizardKind::Reformat);
    let id = session.add_sheet("Sheet1".to_string(), 0, rectangular_sheet());
    let before = session.sheet(id).unwrap().data.clone();

    session.apply_manual_value(id, ColumnRole::Gender, "Women").unwrap();
    session.apply_manual_value(id, ColumnRole::Brand, "Acme").unwrap();
    assert_eq!(session.sheet(id).unwrap().data.headers.len(), 5);

    assert!(session.remove_manual_value(id, ColumnRole::Gender).unwrap());
    let sheet = session.sheet(id).unwrap();
    assert_eq!(sheet.mapping.get(ColumnRole::Gender), None);
    assert_eq!(sheet.manual_column(ColumnRole::Brand).unwrap().index, 3);
    assert_eq!(sheet.mapping.get(ColumnRole::Brand), Some(3));

    assert!(session.remove_manual_value(id, ColumnRole::Brand).unwrap());
    assert!(!session.remove_manual_value(id, ColumnRole::Brand).unwrap());
    let sheet = session.sheet(id).unwrap();
    assert_eq!(sheet.data, before);
    assert_eq!(sheet.mapping.get(ColumnRole::Brand), None);
}

fn ragged_sheet() -> RawGrid {
    vec![
        vec![CellValue::from("Style"), CellValue::from("Brand"), CellValue::from("Color")],
        vec![CellValue::from("A-1")],
        vec![CellValue::from("A-2"), CellValue::from("Acme"), CellValue::from("Red")],
        vec![CellValue::from("A-3"), CellValue::Empty],
    ]
}

fn row_lengths(session: &MappingSession, id: SheetId) -> Vec<usize> {
    session.sheet(id).unwrap().data.rows.iter().map(Vec::len).collect()
}

#[test]
fn manual_value_round_trip_restores_ragged_rows() {
    let mut session = MappingSession::new(WizardKind::GoogleImages);
    let id = session.add_sheet("Sheet1".to_string(), 0, ragged_sheet());
    let before = session.sheet(id).unwrap().data.clone();
    assert_eq!(row_lengths(&session, id), vec![1, 3, 2]);

    session.apply_manual_value(id, ColumnRole::Brand, "Gucci").unwrap();
    assert_eq!(row_lengths(&session, id), vec![4, 4, 4]);
    assert_eq!(session.sheet(id).unwrap().data.rows[0][3], CellValue::from("Gucci"));

    assert!(session.remove_manual_value(id, ColumnRole::Brand).unwrap());
    assert_eq!(session.sheet(id).unwrap().data, before);
}

#[test]
fn removing_earlier_manual_column_first_still_restores_ragged_rows() {
    let mut session = MappingSession::new(WizardKind::Reformat);
    let id = session.add_sheet("Sheet1".to_string(), 0, ragged_sheet());
    let before = session.sheet(id).unwrap().data.clone();

    session.apply_manual_value(id, ColumnRole::Gender, "Women").unwrap();
    session.apply_manual_value(id, ColumnRole::Category, "Shoes").unwrap();
    assert_eq!(row_lengths(&session, id), vec![5, 5, 5]);

    assert!(session.remove_manual_value(id, ColumnRole::Gender).unwrap());
    let sheet = session.sheet(id).unwrap();
    assert_eq!(sheet.manual_column(ColumnRole::Category).unwrap().index, 3);
    assert!(sheet.data.rows.iter().all(|row| row[3] == CellValue::from("Shoes")));

    assert!(session.remove_manual_value(id, ColumnRole::Category).unwrap());
    assert_eq!(session.sheet(id).unwrap().data, before);
}

#[test]
fn images_only_maps_target_without_source() {
    let wizard = WizardKind::DataWarehouse(DataWarehouseMode::ImagesOnly);
    let mut session = MappingSession::new(wizard);
    let id = session.add_sheet("Sheet1".to_string(), 0, rectangular_sheet());

    session.map_image_column(id, Some(2)).unwrap();
    let sheet = session.sheet(id).unwrap();
    assert_eq!(sheet.mapping.get(ColumnRole::ImageAdd), Some(2));
    assert_eq!(sheet.mapping.get(ColumnRole::ReadImage), None);
}

fn role_strategy() -> impl Strategy<Value = ColumnRole> {
    prop::sample::select(ColumnRole::ALL.to_vec())
}

#[derive(Debug, Clone)]
enum Edit {
    Map(usize, ColumnRole),
    Image(Option<usize>),
    Clear(usize),
    Manual(ColumnRole, String),
    RemoveManual(ColumnRole),
    HeaderRow(usize),
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    let manual_role = prop::sample::select(WizardKind::Reformat.manual_roles().to_vec());
    prop_oneof![
        4 => (0usize..6, role_strategy()).prop_map(|(column, role)| Edit::Map(column, role)),
        1 => prop::option::of(0usize..6).prop_map(Edit::Image),
        2 => (0usize..6).prop_map(Edit::Clear),
        2 => (manual_role.clone(), "[A-Za-z]{0,6}")
            .prop_map(|(role, value)| Edit::Manual(role, value)),
        1 => manual_role.prop_map(Edit::RemoveManual),
        1 => (0usize..5).prop_map(Edit::HeaderRow),
    ]
}

fn apply(session: &mut MappingSession, id: SheetId, edit: Edit) {
    let _ = match edit {
        Edit::Map(column, role) => session.map_column(id, column, role),
        Edit::Image(column) => session.map_image_column(id, column),
        Edit::Clear(column) => session.clear_mapping(id, column),
        Edit::Manual(role, value) => session.apply_manual_value(id, role, &value),
        Edit::RemoveManual(role) => session.remove_manual_value(id, role).map(|_| ()),
        Edit::HeaderRow(row) => session.set_header_row(id, row).map(|_| ()),
    };
}

/// Every manual column is mapped by its own role and by no other data role.
fn manual_columns_are_owned(sheet: &SheetConfig) -> bool {
    sheet.manual.iter().all(|manual| {
        sheet.mapping.get(manual.role) == Some(manual.index)
            && sheet.data.headers.get(manual.index) == Some(&manual_header(manual.role))
            && sheet
                .mapping
                .roles_at(manual.index)
                .iter()
                .all(|role| role.is_image() || *role == manual.role)
    })
}

proptest! {
    #[test]
    fn every_edit_keeps_columns_exclusive(edits in prop::collection::vec(edit_strategy(), 0..40)) {
        let mut session = MappingSession::new(WizardKind::Reformat);
        let id = session.add_sheet("Sheet1".to_string(), 0, ragged_sheet());
        for edit in edits {
            apply(&mut session, id, edit.clone());
            let sheet = session.sheet(id).unwrap();
            prop_assert!(sheet.mapping.is_exclusive(), "after {:?}", edit);
            prop_assert!(manual_columns_are_owned(sheet), "after {:?}", edit);
        }
    }

    #[test]
    fn auto_map_is_idempotent(headers in prop::collection::vec("[A-Za-z #]{0,12}", 0..12)) {
        prop_assert_eq!(auto_map_columns(&headers), auto_map_columns(&headers));
        prop_assert!(auto_map_columns(&headers).is_exclusive());
    }
}

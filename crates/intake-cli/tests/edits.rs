//! Command-line edits applied to a mapping session.

use intake_cli::edits::{EditSet, apply_edits, resolve_sheet};
use intake_ingest::{IngestOptions, UploadedFile, read_workbook};
use intake_map::MappingSession;
use intake_model::{CellValue, ColumnRole, RawGrid, WizardKind};
use rust_xlsxwriter::Workbook as XlsxWorkbook;

fn grid(rows: &[&[&str]]) -> RawGrid {
    rows.iter()
        .map(|row| row.iter().map(|v| CellValue::from(*v)).collect())
        .collect()
}

fn session(wizard: WizardKind) -> MappingSession {
    let mut session = MappingSession::new(wizard);
    session.add_sheet(
        "Spring".to_string(),
        0,
        grid(&[
            &["Buyer notes", "", ""],
            &["Item", "Vendor name", "Pic"],
            &["A-1", "Acme", "https://cdn.example.com/a.jpg"],
        ]),
    );
    session.add_sheet(
        "Fall".to_string(),
        1,
        grid(&[&["Style", "Brand"], &["B-1", "Zeta"]]),
    );
    session
}

fn edits(args: &[&str]) -> EditSet {
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        edits: EditSet,
    }

    let argv = std::iter::once("harness").chain(args.iter().copied());
    Harness::parse_from(argv).edits
}

#[test]
fn sheets_resolve_by_name_or_position() {
    let session = session(WizardKind::GoogleImages);
    let ids = session.sheet_ids();
    assert_eq!(resolve_sheet(&session, "fall").unwrap(), ids[1]);
    assert_eq!(resolve_sheet(&session, "1").unwrap(), ids[0]);
    assert!(resolve_sheet(&session, "3").is_err());
    assert!(resolve_sheet(&session, "Winter").is_err());
}

#[test]
fn edits_fix_an_unrecognized_layout() {
    let mut session = session(WizardKind::GoogleImages);
    let spring = session.sheet_ids()[0];
    assert!(session.validate(spring).unwrap().missing.contains(&ColumnRole::Style));

    let set = edits(&[
        "--header", "Spring=2",
        "--map", "Spring:A=style",
        "--map", "Spring:B=brand",
        "--map", "Spring:C=image",
        "--include", "Fall",
    ]);
    apply_edits(&mut session, &set).unwrap();

    let sheet = session.sheet(spring).unwrap();
    assert_eq!(sheet.header_row, 1);
    assert_eq!(sheet.mapping.get(ColumnRole::Style), Some(0));
    assert_eq!(sheet.mapping.get(ColumnRole::Brand), Some(1));
    assert_eq!(sheet.mapping.get(ColumnRole::ReadImage), Some(2));
    assert_eq!(sheet.mapping.get(ColumnRole::ImageAdd), Some(2));
    assert_eq!(session.check_ready().unwrap().len(), 2);
}

#[test]
fn manual_brand_round_trip() {
    let mut session = session(WizardKind::GoogleImages);
    let fall = session.sheet_ids()[1];

    apply_edits(&mut session, &edits(&["--manual", "Fall:brand=House Label"])).unwrap();
    let sheet = session.sheet(fall).unwrap();
    assert_eq!(sheet.manual_value(ColumnRole::Brand), Some("House Label"));
    assert_eq!(sheet.data.headers.len(), 3);

    apply_edits(&mut session, &edits(&["--manual", "Fall:brand="])).unwrap();
    let sheet = session.sheet(fall).unwrap();
    assert_eq!(sheet.manual_value(ColumnRole::Brand), None);
    assert_eq!(sheet.data.headers, ["Style", "Brand"]);
}

#[test]
fn rejected_edits_surface_as_errors() {
    let mut session = session(WizardKind::GoogleImages);
    assert!(apply_edits(&mut session, &edits(&["--header", "Fall=9"])).is_err());
    assert!(apply_edits(&mut session, &edits(&["--map", "Fall:Z=style"])).is_err());
    assert!(apply_edits(&mut session, &edits(&["--map", "Fall:A=size"])).is_err());
    assert!(apply_edits(&mut session, &edits(&["--manual", "Fall:gender=Women"])).is_err());
}

#[test]
fn excluded_sheets_drop_out_of_readiness() {
    let mut xlsx = XlsxWorkbook::new();
    let sheet = xlsx.add_worksheet();
    sheet.write_string(0, 0, "Style").unwrap();
    sheet.write_string(0, 1, "Brand").unwrap();
    sheet.write_string(1, 0, "C-3").unwrap();
    sheet.write_string(1, 1, "Acme").unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("upload.xlsx");
    xlsx.save(&path).unwrap();

    let file = UploadedFile::from_path(&path).unwrap();
    let workbook = read_workbook(file, &IngestOptions::default()).unwrap();
    let mut session = MappingSession::from_workbook(&workbook, WizardKind::GoogleImages);
    assert_eq!(session.check_ready().unwrap().len(), 1);

    apply_edits(&mut session, &edits(&["--exclude", "Sheet1"])).unwrap();
    assert!(session.check_ready().is_err());
}

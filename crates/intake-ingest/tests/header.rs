use intake_ingest::{HeaderBasis, detect_header, detect_header_row};
use intake_model::{CellValue, RawGrid};
use proptest::prelude::*;

fn text_grid(rows: &[&[&str]]) -> RawGrid {
    rows.iter()
        .map(|row| row.iter().map(|value| CellValue::from(*value)).collect())
        .collect()
}

#[test]
fn style_brand_msrp_row_is_chosen() {
    let grid = text_grid(&[
        &["foo", "bar"],
        &["Style #", "Brand", "MSRP"],
        &["110", "Acme", "19.99"],
    ]);
    assert_eq!(detect_header_row(&grid), 1);
}

#[test]
fn title_rows_above_header_are_skipped() {
    let grid = vec![
        vec![CellValue::from("Vendor export"), CellValue::Empty, CellValue::Empty],
        vec![CellValue::Empty, CellValue::Empty, CellValue::Empty],
        vec![CellValue::from("Item No"), CellValue::from("Colour"), CellValue::from("Size")],
        vec![CellValue::Number(1.0), CellValue::from("Red"), CellValue::from("M")],
    ];
    let guess = detect_header(&grid);
    assert_eq!(guess.row, 2);
    assert_eq!(guess.basis, HeaderBasis::PatternMatch);
}

#[test]
fn ties_keep_first_row() {
    let grid = text_grid(&[&["a", "b"], &["c", "d"]]);
    let guess = detect_header(&grid);
    assert_eq!(guess.row, 0);
    assert_eq!(guess.basis, HeaderBasis::MostPopulated);
}

fn cell_strategy() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        Just(CellValue::Empty),
        "[a-z ]{0,6}".prop_map(CellValue::from),
        (0.0f64..1000.0).prop_map(CellValue::Number),
    ]
}

proptest! {
    #[test]
    fn chosen_row_is_in_bounds_and_populated(
        grid in prop::collection::vec(prop::collection::vec(cell_strategy(), 0..6), 0..30)
    ) {
        let guess = detect_header(&grid);
        if guess.basis == HeaderBasis::Fallback {
            prop_assert_eq!(guess.row, 0);
        } else {
            prop_assert!(guess.row < grid.len());
            let non_blank = grid[guess.row]
                .iter()
                .filter(|cell| !cell.display().trim().is_empty())
                .count();
            prop_assert!(non_blank >= 2);
        }
    }
}

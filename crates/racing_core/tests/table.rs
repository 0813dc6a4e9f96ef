use pretty_assertions::assert_eq;
use racing_core::{
    fit_row, ScrapeResult, Table, TableError, PLACEHOLDER_HEADER, PLACEHOLDER_MESSAGE,
};

fn strings(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

#[test]
fn new_rejects_rows_of_wrong_width() {
    let err = Table::new(
        strings(&["Pla.", "Horse"]),
        vec![strings(&["1", "GOLDEN SIXTY"]), strings(&["2"])],
    )
    .unwrap_err();
    assert_eq!(
        err,
        TableError::RaggedRow {
            row: 1,
            expected: 2,
            actual: 1
        }
    );
}

#[test]
fn from_ragged_pads_and_truncates() {
    let table = Table::from_ragged(
        strings(&["A", "B", "C"]),
        vec![strings(&["1"]), strings(&["1", "2", "3", "4"])],
    );
    assert_eq!(table.rows()[0], strings(&["1", "", ""]));
    assert_eq!(table.rows()[1], strings(&["1", "2", "3"]));
    assert_eq!(table.width(), 3);
}

#[test]
fn fit_row_is_identity_for_exact_width() {
    assert_eq!(fit_row(strings(&["x", "y"]), 2), strings(&["x", "y"]));
}

#[test]
fn all_empty_tables_become_single_placeholder() {
    let result = ScrapeResult::new(vec![
        Table::new(strings(&["A"]), vec![]).unwrap(),
        Table::new(strings(&["B"]), vec![]).unwrap(),
    ]);
    assert!(!result.is_empty());
    assert!(result.has_no_rows());

    let tables = result.into_writable();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].headers(), strings(&[PLACEHOLDER_HEADER]).as_slice());
    assert_eq!(tables[0].rows(), &[strings(&[PLACEHOLDER_MESSAGE])]);
}

#[test]
fn non_empty_result_is_written_unchanged() {
    let table = Table::new(strings(&["A"]), vec![strings(&["1"])]).unwrap();
    let result = ScrapeResult::new(vec![Table::new(strings(&["B"]), vec![]).unwrap(), table.clone()]);
    let tables = result.into_writable();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[1], table);
}

#[test]
fn missing_result_normalizes_to_empty() {
    let result: ScrapeResult = None.into();
    assert!(result.is_empty());
}

//! Write-then-read tests for campus-sheets-xlsx.

use std::io::Cursor;

use campus_sheets_core::style::{Color, FillStyle, Style};
use campus_sheets_core::{CellValue, Hyperlink, Workbook, Worksheet};
use campus_sheets_xlsx::{XlsxReader, XlsxWriter};
use pretty_assertions::assert_eq;

fn round_trip(workbook: &Workbook) -> Workbook {
    let mut buf = Cursor::new(Vec::new());
    XlsxWriter::write(workbook, &mut buf).unwrap();
    buf.set_position(0);
    XlsxReader::read(buf).unwrap()
}

fn college_sheet() -> Worksheet {
    let mut ws = Worksheet::new("Sheet");
    ws.set_cell_value("A1", "Report").unwrap();
    ws.set_cell_value("A3", "College").unwrap();
    ws.set_cell_value("B3", "Founded").unwrap();
    ws.set_cell_value("A4", "  Yale  ").unwrap();
    ws.set_cell_value("B4", 1701).unwrap();
    ws.set_cell_value("A5", "Brown & <Co>").unwrap();
    ws.set_cell_value("B5", 1764.5).unwrap();
    ws.set_cell_value("C5", true).unwrap();
    ws.set_cell_value("D5", CellValue::Error("#DIV/0!".into()))
        .unwrap();
    ws
}

#[test]
fn values_survive_round_trip() {
    let mut wb = Workbook::empty();
    wb.add_existing_worksheet(college_sheet()).unwrap();

    let read = round_trip(&wb);
    let ws = read.worksheet(read.sheet_index("Sheet").unwrap()).unwrap();

    assert_eq!(ws.get_value("A1").unwrap(), CellValue::string("Report"));
    assert_eq!(ws.get_value("A4").unwrap(), CellValue::string("  Yale  "));
    assert_eq!(ws.get_value("B4").unwrap(), CellValue::Number(1701.0));
    assert_eq!(ws.get_value("A5").unwrap(), CellValue::string("Brown & <Co>"));
    assert_eq!(ws.get_value("B5").unwrap(), CellValue::Number(1764.5));
    assert_eq!(ws.get_value("C5").unwrap(), CellValue::Boolean(true));
    assert_eq!(
        ws.get_value("D5").unwrap(),
        CellValue::Error("#DIV/0!".into())
    );
    assert_eq!(ws.max_row(), 5);
    assert_eq!(ws.max_column(), 4);
}

#[test]
fn formulas_keep_cached_values() {
    let mut wb = Workbook::empty();
    let mut ws = Worksheet::new("Sheet");
    ws.set_cell_value(
        "A1",
        CellValue::Formula {
            text: "UPPER(\"yale\")".into(),
            cached: Some(Box::new(CellValue::string("YALE"))),
        },
    )
    .unwrap();
    ws.set_cell_value("A2", CellValue::formula("=1+1")).unwrap();
    wb.add_existing_worksheet(ws).unwrap();

    let read = round_trip(&wb);
    let ws = read.worksheet(0).unwrap();

    assert_eq!(ws.get_value("A1").unwrap().as_string(), Some("YALE"));
    assert_eq!(ws.get_value("A1").unwrap().formula_text(), Some("UPPER(\"yale\")"));
    assert_eq!(ws.get_value("A2").unwrap(), CellValue::formula("1+1"));
}

#[test]
fn styles_survive_round_trip() {
    let mut wb = Workbook::empty();
    let mut ws = college_sheet();
    let bold = Style::new().bold(true);
    let teal = Style::new().with_fill(FillStyle::solid(Color::TEAL));
    ws.set_cell_style("A4", &bold).unwrap();
    for col in 0..6 {
        ws.set_cell_style_at(4, col, &teal).unwrap();
    }
    wb.add_existing_worksheet(ws).unwrap();

    let read = round_trip(&wb);
    let ws = read.worksheet(0).unwrap();

    assert_eq!(ws.cell_style("A4").unwrap(), Some(&bold));
    assert_eq!(ws.cell_style("B4").unwrap(), Some(&Style::default()));
    assert_eq!(ws.cell_style("F5").unwrap(), Some(&teal));
    // Style-only cells still count toward the sheet width
    assert_eq!(ws.max_column(), 6);
    assert_eq!(ws.get_value("F5").unwrap(), CellValue::Empty);
}

#[test]
fn hyperlinks_survive_round_trip() {
    let mut wb = Workbook::empty();
    let mut ws = college_sheet();
    ws.set_hyperlink(
        "A4",
        Hyperlink::external("https://www.yale.edu/?q=1&r=2").with_tooltip("Yale"),
    )
    .unwrap();
    ws.set_hyperlink("A5", Hyperlink::internal("Sheet!A1")).unwrap();
    ws.set_hyperlink("A1", Hyperlink::external("https://example.edu"))
        .unwrap();
    wb.add_existing_worksheet(ws).unwrap();

    let read = round_trip(&wb);
    let ws = read.worksheet(0).unwrap();

    assert_eq!(
        ws.hyperlink_at(3, 0),
        Some(&Hyperlink::external("https://www.yale.edu/?q=1&r=2").with_tooltip("Yale"))
    );
    assert_eq!(ws.hyperlink_at(4, 0), Some(&Hyperlink::internal("Sheet!A1")));
    assert_eq!(
        ws.hyperlink_at(0, 0).and_then(|l| l.uri()),
        Some("https://example.edu")
    );
    assert_eq!(ws.hyperlinks().count(), 3);
}

#[test]
fn sheet_order_and_active_sheet_survive() {
    let mut wb = Workbook::empty();
    wb.add_worksheet_with_name("Notes & Links").unwrap();
    wb.add_existing_worksheet(college_sheet()).unwrap();
    wb.set_active_sheet(1).unwrap();

    let read = round_trip(&wb);

    let names: Vec<&str> = read.worksheets().map(|ws| ws.name()).collect();
    assert_eq!(names, vec!["Notes & Links", "Sheet"]);
    assert_eq!(read.active_sheet(), 1);
}

#[test]
fn write_file_and_read_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("colleges.xlsx");

    let mut wb = Workbook::empty();
    wb.add_existing_worksheet(college_sheet()).unwrap();
    XlsxWriter::write_file(&wb, &path).unwrap();

    let read = XlsxReader::read_file(&path).unwrap();
    assert_eq!(
        read.worksheet(0).unwrap().get_value("A4").unwrap(),
        CellValue::string("  Yale  ")
    );
}

#[test]
fn reading_a_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    assert!(XlsxReader::read_file(dir.path().join("nope.xlsx")).is_err());
}

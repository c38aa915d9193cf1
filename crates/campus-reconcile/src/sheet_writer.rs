//! Rendering headers and merged rows into the output workbook

use std::path::Path;

use campus_sheets_core::{FillStyle, Workbook, Worksheet};
use campus_sheets_xlsx::XlsxWriter;

use crate::error::{ReconcileError, ReconcileResult};
use crate::snapshot::{CellSnapshot, HeaderBlock, RowRecord};

/// Write headers and rows into the sheet called `sheet_name`
///
/// The sheet is created, or emptied if it already exists, and becomes the
/// active sheet. Header cells are copied as captured. Data rows start right
/// below the headers, `column_count` cells each (short rows are padded with
/// empty cells). The name cell of a matched row gets `match_fill`; every
/// other cell keeps its captured style. Hyperlinks are written wherever a
/// snapshot has one.
///
/// Returns the index of the written sheet.
pub fn write_merged_sheet(
    workbook: &mut Workbook,
    sheet_name: &str,
    headers: &HeaderBlock,
    rows: &[RowRecord],
    column_count: u16,
    name_column: u16,
    match_fill: &FillStyle,
) -> ReconcileResult<usize> {
    let index = match workbook.sheet_index(sheet_name) {
        Some(index) => {
            log::debug!("clearing existing sheet '{}'", sheet_name);
            index
        }
        None => workbook.add_worksheet_with_name(sheet_name)?,
    };
    workbook.set_active_sheet(index)?;

    let sheet = workbook
        .worksheet_mut(index)
        .ok_or_else(|| campus_sheets_core::Error::SheetNotFound(sheet_name.to_string()))?;
    sheet.clear();

    for (row, cells) in headers.rows().iter().enumerate() {
        for (col, snapshot) in cells.iter().enumerate() {
            write_cell(sheet, row as u32, col as u16, snapshot, None)?;
        }
    }

    let first_data_row = headers.len() as u32;
    let empty = CellSnapshot::empty();
    let name_col = name_column.checked_sub(1);

    for (offset, record) in rows.iter().enumerate() {
        let row = first_data_row + offset as u32;
        for col in 0..column_count {
            let snapshot = record.cells.get(col as usize).unwrap_or(&empty);
            let fill = (record.is_matched && Some(col) == name_col).then_some(match_fill);
            write_cell(sheet, row, col, snapshot, fill)?;
        }
    }

    log::info!(
        "wrote {} header rows and {} data rows to sheet '{}'",
        headers.len(),
        rows.len(),
        sheet_name
    );
    Ok(index)
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    snapshot: &CellSnapshot,
    fill_override: Option<&FillStyle>,
) -> ReconcileResult<()> {
    sheet.set_cell_value_at(row, col, snapshot.value().clone())?;

    match fill_override {
        Some(fill) => {
            let style = snapshot.style().clone().with_fill(fill.clone());
            sheet.set_cell_style_at(row, col, &style)?;
        }
        None => sheet.set_cell_style_at(row, col, snapshot.style())?,
    }

    if let Some(link) = snapshot.hyperlink() {
        sheet.set_hyperlink_at(row, col, link.clone())?;
    }
    Ok(())
}

/// Save the workbook as XLSX
pub fn save_workbook(workbook: &Workbook, path: &Path) -> ReconcileResult<()> {
    XlsxWriter::write_file(workbook, path).map_err(|source| ReconcileError::WriteFailure {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("saved {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_sheets_core::{CellValue, Color, Hyperlink, Style};
    use pretty_assertions::assert_eq;

    fn headers() -> HeaderBlock {
        HeaderBlock::new(vec![
            vec![
                CellSnapshot::new(CellValue::string("College"), Style::new().bold(true), None),
                CellSnapshot::new(CellValue::string("Site"), Style::default(), None),
            ],
        ])
    }

    fn row(name: &str, matched: bool, fill: FillStyle) -> RowRecord {
        let mut record = RowRecord::existing(
            name,
            vec![
                CellSnapshot::new(
                    CellValue::string(name),
                    Style::new().italic(true).with_fill(fill),
                    Some(Hyperlink::external(format!("https://{}.edu", name.to_lowercase()))),
                ),
                CellSnapshot::empty(),
            ],
        );
        record.is_matched = matched;
        record
    }

    fn teal() -> FillStyle {
        FillStyle::solid(Color::TEAL)
    }

    #[test]
    fn test_writes_headers_then_rows() {
        let mut wb = Workbook::empty();
        let rows = vec![row("Brown", true, FillStyle::None), row("Rice", false, FillStyle::None)];
        let index = write_merged_sheet(&mut wb, "Sheet", &headers(), &rows, 2, 1, &teal()).unwrap();

        let ws = wb.worksheet(index).unwrap();
        assert_eq!(wb.active_sheet(), index);
        assert_eq!(ws.name(), "Sheet");
        assert_eq!(ws.get_value_at(0, 0), CellValue::string("College"));
        assert!(ws.cell_style_at(0, 0).unwrap().font.bold);
        assert_eq!(ws.get_value_at(1, 0), CellValue::string("Brown"));
        assert_eq!(ws.get_value_at(2, 0), CellValue::string("Rice"));
        assert_eq!(
            ws.hyperlink_at(2, 0).and_then(|l| l.uri()),
            Some("https://rice.edu")
        );
        assert_eq!(ws.max_row(), 3);
        assert_eq!(ws.max_column(), 2);
    }

    #[test]
    fn test_match_fill_overrides_name_cell_only() {
        let yellow = FillStyle::solid(Color::rgb(0xFF, 0xFF, 0x00));
        let rows = vec![row("Brown", true, yellow.clone()), row("Rice", false, yellow.clone())];
        let mut wb = Workbook::empty();
        write_merged_sheet(&mut wb, "Sheet", &HeaderBlock::default(), &rows, 2, 1, &teal()).unwrap();
        let ws = wb.worksheet(0).unwrap();

        let matched = ws.cell_style_at(0, 0).unwrap();
        assert_eq!(matched.fill, teal());
        // Font survives the fill override
        assert!(matched.font.italic);
        assert_eq!(ws.cell_style_at(1, 0).unwrap().fill, yellow);
        assert_eq!(ws.cell_style_at(0, 1).unwrap().fill, FillStyle::None);
    }

    #[test]
    fn test_existing_sheet_is_replaced() {
        let mut wb = Workbook::empty();
        wb.add_worksheet_with_name("Notes").unwrap();
        wb.add_worksheet_with_name("Sheet").unwrap();
        wb.worksheet_mut(1)
            .unwrap()
            .set_cell_value("Z99", "stale")
            .unwrap();

        let index = write_merged_sheet(&mut wb, "Sheet", &headers(), &[], 2, 1, &teal()).unwrap();
        assert_eq!(index, 1);
        assert_eq!(wb.sheet_count(), 2);
        assert_eq!(wb.active_sheet(), 1);
        let ws = wb.worksheet(1).unwrap();
        assert_eq!(ws.get_value("Z99").unwrap(), CellValue::Empty);
        assert_eq!(ws.max_row(), 1);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let mut wb = Workbook::empty();
        let rows = vec![RowRecord::synthesized("MIT", 1, 1)];
        write_merged_sheet(&mut wb, "Sheet", &HeaderBlock::default(), &rows, 3, 1, &teal()).unwrap();
        let ws = wb.worksheet(0).unwrap();
        assert_eq!(ws.cell_count(), 3);
        assert_eq!(ws.max_column(), 3);
        assert_eq!(ws.cell_style_at(0, 0).unwrap().fill, teal());
        assert!(ws.cell_style_at(0, 0).unwrap().font.bold);
    }

    #[test]
    fn test_save_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.xlsx");
        let mut wb = Workbook::empty();
        write_merged_sheet(&mut wb, "Sheet", &headers(), &[], 2, 1, &teal()).unwrap();

        assert!(matches!(
            save_workbook(&wb, &path),
            Err(ReconcileError::WriteFailure { .. })
        ));
    }
}

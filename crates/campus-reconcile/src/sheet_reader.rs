//! Reading the canonical spreadsheet

use std::io::Cursor;
use std::path::PathBuf;

use campus_sheets_core::{Workbook, Worksheet};
use campus_sheets_xlsx::XlsxReader;

use crate::error::{ReconcileError, ReconcileResult};
use crate::snapshot::{CellSnapshot, HeaderBlock, NameSet, RowRecord};

/// Where the source workbook comes from
#[derive(Debug, Clone)]
pub enum WorkbookSource {
    /// A file on disk
    Path(PathBuf),
    /// An XLSX file already in memory (an upload, for instance)
    Bytes(Vec<u8>),
}

impl WorkbookSource {
    fn describe(&self) -> String {
        match self {
            WorkbookSource::Path(path) => path.display().to_string(),
            WorkbookSource::Bytes(bytes) => format!("<{} bytes in memory>", bytes.len()),
        }
    }
}

impl From<PathBuf> for WorkbookSource {
    fn from(path: PathBuf) -> Self {
        WorkbookSource::Path(path)
    }
}

impl From<Vec<u8>> for WorkbookSource {
    fn from(bytes: Vec<u8>) -> Self {
        WorkbookSource::Bytes(bytes)
    }
}

/// Open the source workbook
pub fn open_source(source: &WorkbookSource) -> ReconcileResult<Workbook> {
    let result = match source {
        WorkbookSource::Path(path) => {
            if !path.is_file() {
                return Err(ReconcileError::FileNotFound(path.clone()));
            }
            XlsxReader::read_file(path)
        }
        WorkbookSource::Bytes(bytes) => XlsxReader::read(Cursor::new(bytes.as_slice())),
    };

    result.map_err(|source_err| ReconcileError::UnreadableWorkbook {
        origin: source.describe(),
        source: source_err,
    })
}

/// Where headers, data and names live in the sheet (all 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    /// Rows at the top copied verbatim
    pub header_rows: u32,
    /// First row holding data
    pub data_start_row: u32,
    /// Column holding the name of each row
    pub name_column: u16,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            header_rows: 3,
            data_start_row: 4,
            name_column: 1,
        }
    }
}

/// Everything the merge needs from the source sheet
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SheetExtract {
    /// Data rows with a usable name, in sheet order (duplicates included)
    pub rows: Vec<RowRecord>,
    /// Distinct names of `rows`
    pub names: NameSet,
    pub headers: HeaderBlock,
    /// Number of data columns captured per row
    pub column_count: u16,
}

/// Extract headers, rows and names from a sheet
///
/// A data row is kept only when its name cell holds text that is not blank
/// after trimming. Formula cells count with their cached text.
pub fn read_sheet(sheet: &Worksheet, layout: &SheetLayout) -> SheetExtract {
    let last_row = sheet.max_row();
    // Every stored cell counts toward the width, including style-only ones
    let column_count = sheet.max_column();

    let capture_row = |row: u32| -> Vec<CellSnapshot> {
        (0..column_count)
            .map(|col| CellSnapshot::capture(sheet, row, col))
            .collect()
    };

    let headers = HeaderBlock::new((0..layout.header_rows).map(capture_row).collect());

    let mut rows = Vec::new();
    let mut names = NameSet::new();
    let name_col = layout.name_column.saturating_sub(1);

    for row in layout.data_start_row.saturating_sub(1)..last_row {
        let value = sheet.get_value_at(row, name_col);
        let Some(name) = value.as_string().map(str::trim).filter(|s| !s.is_empty()) else {
            if !value.is_empty() {
                log::debug!(
                    "row {} skipped: name cell holds {} ({})",
                    row + 1,
                    value.type_name(),
                    value
                );
            }
            continue;
        };

        names.insert(name.to_string());
        rows.push(RowRecord::existing(name, capture_row(row)));
    }

    log::info!(
        "read {} data rows ({} distinct names), {} header rows, {} columns from '{}'",
        rows.len(),
        names.len(),
        headers.len(),
        column_count,
        sheet.name()
    );

    SheetExtract {
        rows,
        names,
        headers,
        column_count,
    }
}

/// The sheet the workflow reads: the active one
pub fn source_sheet(workbook: &Workbook) -> ReconcileResult<&Worksheet> {
    workbook
        .active_worksheet()
        .or_else(|| workbook.worksheet(0))
        .ok_or_else(|| ReconcileError::InvalidOptions("workbook has no worksheets".into()))
}

//! Immutable captures of cells and rows

use std::collections::BTreeSet;

use campus_sheets_core::{CellValue, Hyperlink, Style, Worksheet};

/// Set of trimmed names, compared exactly (no case folding), iterated sorted
pub type NameSet = BTreeSet<String>;

/// A cell's value, style and hyperlink, detached from the sheet it came from
///
/// Cells without formatting capture the default style: no fill, the default
/// font and the General number format.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellSnapshot {
    value: CellValue,
    style: Style,
    hyperlink: Option<Hyperlink>,
}

impl CellSnapshot {
    /// Capture one cell (0-based indices)
    pub fn capture(sheet: &Worksheet, row: u32, col: u16) -> Self {
        Self {
            value: sheet.get_value_at(row, col),
            style: sheet.cell_style_at(row, col).cloned().unwrap_or_default(),
            hyperlink: sheet.hyperlink_at(row, col).cloned(),
        }
    }

    /// Build a snapshot from parts
    pub fn new(value: CellValue, style: Style, hyperlink: Option<Hyperlink>) -> Self {
        Self {
            value,
            style,
            hyperlink,
        }
    }

    /// An empty, unstyled cell
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &CellValue {
        &self.value
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn hyperlink(&self) -> Option<&Hyperlink> {
        self.hyperlink.as_ref()
    }
}

/// One data row of the merged output
#[derive(Debug, Clone, PartialEq)]
pub struct RowRecord {
    /// Trimmed, non-empty identity of the row
    pub name: String,
    /// One snapshot per data column
    pub cells: Vec<CellSnapshot>,
    /// The name is in the reconciled candidate set
    pub is_matched: bool,
    /// The row was synthesized from a candidate name
    pub is_new: bool,
}

impl RowRecord {
    /// A row read from the source sheet
    pub fn existing<S: Into<String>>(name: S, cells: Vec<CellSnapshot>) -> Self {
        Self {
            name: name.into(),
            cells,
            is_matched: false,
            is_new: false,
        }
    }

    /// A new row for a candidate name: empty cells except a bold name cell
    ///
    /// `name_column` is 1-based; the row is widened to reach it.
    pub fn synthesized<S: Into<String>>(name: S, column_count: u16, name_column: u16) -> Self {
        let name = name.into();
        let width = column_count.max(name_column) as usize;
        let mut cells = vec![CellSnapshot::empty(); width];
        if let Some(cell) = name_column
            .checked_sub(1)
            .and_then(|idx| cells.get_mut(idx as usize))
        {
            *cell = CellSnapshot::new(
                CellValue::string(name.clone()),
                Style::new().bold(true),
                None,
            );
        }

        Self {
            name,
            cells,
            is_matched: true,
            is_new: true,
        }
    }

    /// The name column snapshot (1-based column), if the row reaches it
    pub fn name_cell(&self, name_column: u16) -> Option<&CellSnapshot> {
        name_column
            .checked_sub(1)
            .and_then(|idx| self.cells.get(idx as usize))
    }
}

/// Header rows captured verbatim from the top of the source sheet
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeaderBlock {
    rows: Vec<Vec<CellSnapshot>>,
}

impl HeaderBlock {
    pub fn new(rows: Vec<Vec<CellSnapshot>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<CellSnapshot>] {
        &self.rows
    }

    /// Number of header rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

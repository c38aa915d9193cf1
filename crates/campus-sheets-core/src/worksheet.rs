//! Worksheet type

use std::collections::BTreeMap;

use crate::cell::{CellAddress, CellData, CellValue};
use crate::error::{Error, Result};
use crate::hyperlink::Hyperlink;
use crate::style::{Style, StylePool};
use crate::{MAX_COLS, MAX_ROWS};

/// A worksheet (single sheet in a workbook)
///
/// Cells are kept in row-major order. A cell exists once it has been given a
/// value or a style, even if the value is [`CellValue::Empty`], so the sheet's
/// extent matches what a spreadsheet application reports.
#[derive(Debug, Clone)]
pub struct Worksheet {
    name: String,
    cells: BTreeMap<(u32, u16), CellData>,
    styles: StylePool,
    hyperlinks: BTreeMap<(u32, u16), Hyperlink>,
}

impl Worksheet {
    /// Create a new worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
            styles: StylePool::new(),
            hyperlinks: BTreeMap::new(),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    // === Cell Access ===

    /// Get a cell by row and column indices
    pub fn cell_at(&self, row: u32, col: u16) -> Option<&CellData> {
        self.cells.get(&(row, col))
    }

    /// Get cell value by address string
    pub fn get_value(&self, address: &str) -> Result<CellValue> {
        let addr = CellAddress::parse(address)?;
        Ok(self.get_value_at(addr.row, addr.col))
    }

    /// Get cell value by indices
    pub fn get_value_at(&self, row: u32, col: u16) -> CellValue {
        self.cell_at(row, col)
            .map(|c| c.value.clone())
            .unwrap_or(CellValue::Empty)
    }

    /// Get a style from this sheet's pool
    pub fn style_by_index(&self, style_index: u32) -> Option<&Style> {
        self.styles.get(style_index)
    }

    /// Get the style of a cell, `None` when the cell does not exist
    pub fn cell_style_at(&self, row: u32, col: u16) -> Option<&Style> {
        self.cell_at(row, col)
            .and_then(|cell| self.styles.get(cell.style_index))
    }

    /// Get the style of a cell by address string
    pub fn cell_style(&self, address: &str) -> Result<Option<&Style>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.cell_style_at(addr.row, addr.col))
    }

    // === Cell Modification ===

    /// Set a cell value by address string
    pub fn set_cell_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_value_at(addr.row, addr.col, value)
    }

    /// Set a cell value by row and column indices, keeping its style
    pub fn set_cell_value_at<V: Into<CellValue>>(
        &mut self,
        row: u32,
        col: u16,
        value: V,
    ) -> Result<()> {
        validate_cell_position(row, col)?;
        self.cells.entry((row, col)).or_default().value = value.into();
        Ok(())
    }

    /// Set a cell style by address string
    pub fn set_cell_style(&mut self, address: &str, style: &Style) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_style_at(addr.row, addr.col, style)
    }

    /// Set a cell style by row and column indices, keeping its value
    pub fn set_cell_style_at(&mut self, row: u32, col: u16, style: &Style) -> Result<()> {
        validate_cell_position(row, col)?;
        let style_index = self.styles.get_or_insert(style.clone());
        self.cells.entry((row, col)).or_default().style_index = style_index;
        Ok(())
    }

    /// Remove every cell and hyperlink
    pub fn clear(&mut self) {
        self.cells.clear();
        self.hyperlinks.clear();
        self.styles = StylePool::new();
    }

    // === Hyperlinks ===

    /// Attach a hyperlink to a cell, replacing any existing one
    pub fn set_hyperlink_at(&mut self, row: u32, col: u16, link: Hyperlink) -> Result<()> {
        validate_cell_position(row, col)?;
        self.hyperlinks.insert((row, col), link);
        Ok(())
    }

    /// Attach a hyperlink by address string
    pub fn set_hyperlink(&mut self, address: &str, link: Hyperlink) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_hyperlink_at(addr.row, addr.col, link)
    }

    /// Get the hyperlink of a cell
    pub fn hyperlink_at(&self, row: u32, col: u16) -> Option<&Hyperlink> {
        self.hyperlinks.get(&(row, col))
    }

    /// Iterate over hyperlinks in row-major order
    pub fn hyperlinks(&self) -> impl Iterator<Item = (u32, u16, &Hyperlink)> {
        self.hyperlinks
            .iter()
            .map(|(&(row, col), link)| (row, col, link))
    }

    // === Extent ===

    /// Number of the last row holding a cell (1-based), 0 when empty
    pub fn max_row(&self) -> u32 {
        self.cells
            .keys()
            .next_back()
            .map(|&(row, _)| row + 1)
            .unwrap_or(0)
    }

    /// Number of the last column holding a cell (1-based), 0 when empty
    pub fn max_column(&self) -> u16 {
        self.cells
            .keys()
            .map(|&(_, col)| col + 1)
            .max()
            .unwrap_or(0)
    }

    /// Get the number of stored cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Check if the worksheet has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over all cells in row-major order
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.cells.iter().map(|(&(row, col), cell)| (row, col, cell))
    }
}

fn validate_cell_position(row: u32, col: u16) -> Result<()> {
    if row >= MAX_ROWS {
        return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
    }
    if col >= MAX_COLS {
        return Err(Error::ColumnOutOfBounds(col, MAX_COLS - 1));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Color, FillStyle};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_worksheet() {
        let ws = Worksheet::new("Sheet");
        assert_eq!(ws.name(), "Sheet");
        assert!(ws.is_empty());
        assert_eq!(ws.max_row(), 0);
        assert_eq!(ws.max_column(), 0);
    }

    #[test]
    fn test_set_cell_values() {
        let mut ws = Worksheet::new("Sheet");
        ws.set_cell_value("A1", "Colleges").unwrap();
        ws.set_cell_value("C4", 42.0).unwrap();

        assert_eq!(ws.get_value("A1").unwrap(), CellValue::string("Colleges"));
        assert_eq!(ws.get_value_at(3, 2), CellValue::Number(42.0));
        assert_eq!(ws.get_value_at(9, 9), CellValue::Empty);
        assert_eq!(ws.max_row(), 4);
        assert_eq!(ws.max_column(), 3);
        assert_eq!(ws.cell_count(), 2);
    }

    #[test]
    fn test_style_only_cell_extends_sheet() {
        let mut ws = Worksheet::new("Sheet");
        ws.set_cell_value("A1", "Yale").unwrap();
        let teal = Style::new().with_fill(FillStyle::solid(Color::TEAL));
        ws.set_cell_style_at(0, 4, &teal).unwrap();

        assert_eq!(ws.max_column(), 5);
        assert_eq!(ws.cell_count(), 2);
        assert_eq!(ws.max_row(), 1);
        assert_eq!(ws.cell_style_at(0, 4), Some(&teal));
        assert_eq!(ws.cell_style_at(0, 0), Some(&Style::default()));
    }

    #[test]
    fn test_value_and_style_are_independent() {
        let mut ws = Worksheet::new("Sheet");
        let bold = Style::new().bold(true);
        ws.set_cell_style("B2", &bold).unwrap();
        ws.set_cell_value("B2", "Brown").unwrap();

        assert_eq!(ws.cell_style("B2").unwrap(), Some(&bold));
        assert_eq!(ws.get_value("B2").unwrap(), CellValue::string("Brown"));
    }

    #[test]
    fn test_hyperlinks() {
        let mut ws = Worksheet::new("Sheet");
        ws.set_hyperlink("A2", Hyperlink::external("https://www.yale.edu"))
            .unwrap();
        ws.set_hyperlink_at(2, 0, Hyperlink::internal("Sheet!A1").with_tooltip("top"))
            .unwrap();

        assert_eq!(ws.hyperlink_at(1, 0).and_then(|l| l.uri()), Some("https://www.yale.edu"));
        assert_eq!(ws.hyperlinks().count(), 2);

        ws.clear();
        assert!(ws.hyperlink_at(2, 0).is_none());
    }

    #[test]
    fn test_out_of_bounds() {
        let mut ws = Worksheet::new("Sheet");
        assert!(ws.set_cell_value_at(MAX_ROWS, 0, 1.0).is_err());
        assert!(ws.set_cell_value_at(0, MAX_COLS, 1.0).is_err());
    }
}

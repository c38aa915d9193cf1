//! # campus-sheets-core
//!
//! Core data structures for the campus-sheets workspace.
//!
//! This crate provides the spreadsheet model the reconciliation engine reads
//! from and writes into:
//! - [`CellValue`] - Cell values (numbers, strings, booleans, errors, formulas)
//! - [`CellAddress`] and [`CellRange`] - Cell addressing and ranges
//! - [`Style`] - Cell formatting (font, fill, number format)
//! - [`Hyperlink`] - External and in-document cell links
//! - [`Workbook`], [`Worksheet`] - The main document structures
//!
//! ## Example
//!
//! ```rust
//! use campus_sheets_core::{CellValue, Workbook};
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//!
//! sheet.set_cell_value("A1", "Yale").unwrap();
//! sheet.set_cell_value_at(1, 0, CellValue::Number(1701.0)).unwrap();
//! assert_eq!(sheet.max_row(), 2);
//! ```

pub mod cell;
pub mod error;
pub mod hyperlink;
pub mod style;
pub mod workbook;
pub mod worksheet;

pub use cell::{CellAddress, CellData, CellRange, CellValue};
pub use error::{Error, Result};
pub use hyperlink::{Hyperlink, HyperlinkTarget};
pub use workbook::Workbook;
pub use worksheet::Worksheet;

pub use style::{Color, FillStyle, FontStyle, NumberFormat, PatternType, Style, StylePool, Underline};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;

//! # campus-sheets-xlsx
//!
//! XLSX (Office Open XML) reader and writer for campus-sheets.
//!
//! Covers what the reconciliation workflow round-trips: cell values (shared
//! and inline strings, numbers, booleans, errors, formulas with cached
//! results), fonts, fills, number formats and cell hyperlinks.

pub mod error;
pub mod reader;
pub mod writer;

mod styles;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use writer::XlsxWriter;

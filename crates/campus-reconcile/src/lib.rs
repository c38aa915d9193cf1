//! # campus-reconcile
//!
//! Reconciles college names found in a document against the canonical list
//! kept in a spreadsheet, then writes a merged, highlighted copy of the sheet.
//!
//! The pipeline, leaves first:
//! - [`snapshot`] - immutable captures of cells and rows
//! - [`sheet_reader`] - headers, data rows and names from the source sheet
//! - [`reconciler`] - candidate lines filtered to college names, then
//!   rewritten to ground-truth spelling by a [`NameOracle`], falling back to
//!   the raw names when the oracle fails
//! - [`merge`] - existing rows plus new candidates, de-duplicated and sorted
//! - [`sheet_writer`] - the merged rows rendered into an output workbook
//! - [`workflow`] - all of the above in one call
//!
//! ## Example
//!
//! ```rust
//! use campus_reconcile::{merge, reconcile, AliasOracle, NameSet};
//!
//! let ground_truth: NameSet = ["MIT", "Yale"].iter().map(|s| s.to_string()).collect();
//! let candidates: NameSet = ["Massachusetts Institute of Technology", "Brown"]
//!     .iter()
//!     .map(|s| s.to_string())
//!     .collect();
//!
//! let oracle = AliasOracle::new().with_alias("Massachusetts Institute of Technology", "MIT");
//! let normalized = reconcile(&oracle, &candidates, &ground_truth).into_names();
//!
//! let rows = merge(Vec::new(), &normalized, &NameSet::new(), 1, 1);
//! let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
//! assert_eq!(names, ["Brown", "MIT"]);
//! ```

pub mod candidates;
pub mod error;
pub mod merge;
pub mod options;
pub mod oracle;
pub mod reconciler;
pub mod sheet_reader;
pub mod sheet_writer;
pub mod snapshot;
pub mod workflow;

pub use candidates::{candidate_payload_from_names, extract_line_candidates, parse_candidate_payload};
pub use error::{CandidatePayloadError, OracleError, ReconcileError, ReconcileResult};
pub use merge::{merge, sort_rows, MergeSummary};
pub use options::{ColumnRef, OracleOptions, OracleProvider, ReconcileOptions};
pub use oracle::{
    build_oracle, unwrap_fenced_json, AliasOracle, FnOracle, GeminiConfig, GeminiOracle, NameOracle,
    NoOracle, OracleRequest, RequestKind,
};
pub use reconciler::{filter_candidates, reconcile, ReconcileOutcome, Reconciliation};
pub use sheet_reader::{open_source, read_sheet, SheetExtract, SheetLayout, WorkbookSource};
pub use sheet_writer::{save_workbook, write_merged_sheet};
pub use snapshot::{CellSnapshot, HeaderBlock, NameSet, RowRecord};
pub use workflow::{ensure_xlsx_extension, ground_truth_names, run, WorkflowReport};

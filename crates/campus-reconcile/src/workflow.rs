//! The end-to-end reconciliation run

use std::path::PathBuf;

use campus_sheets_core::Workbook;

use crate::candidates::parse_candidate_payload;
use crate::error::ReconcileResult;
use crate::merge::{merge, MergeSummary};
use crate::oracle::NameOracle;
use crate::options::{ReconcileOptions, DEFAULT_OUTPUT};
use crate::reconciler::{reconcile, ReconcileOutcome};
use crate::sheet_reader::{open_source, read_sheet, source_sheet, SheetLayout, WorkbookSource};
use crate::sheet_writer::{save_workbook, write_merged_sheet};
use crate::snapshot::NameSet;

/// What a run produced
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowReport {
    pub output: PathBuf,
    pub summary: MergeSummary,
    pub outcome: ReconcileOutcome,
    /// Candidate names parsed from the payload, before normalization
    pub candidate_count: usize,
    /// Why the payload was treated as empty, if it was invalid
    pub payload_error: Option<String>,
}

/// Make a file name end in `.xlsx`
///
/// A blank name becomes the default output name.
pub fn ensure_xlsx_extension(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return DEFAULT_OUTPUT.to_string();
    }
    if name.to_ascii_lowercase().ends_with(".xlsx") {
        name.to_string()
    } else {
        format!("{}.xlsx", name)
    }
}

/// Read the sheet, reconcile the candidates, merge and save
///
/// Opening the source and saving the output are fatal. An invalid candidate
/// payload counts as no candidates, and an oracle failure falls back to the
/// raw names; both are reported, neither stops the run.
pub fn run(
    options: &ReconcileOptions,
    source: &WorkbookSource,
    candidates: &str,
    oracle: &dyn NameOracle,
) -> ReconcileResult<WorkflowReport> {
    let layout = options.validate()?;
    let match_fill = options.match_fill()?;
    let output = PathBuf::from(ensure_xlsx_extension(&options.output));

    let workbook = open_source(source)?;
    let extract = read_sheet(source_sheet(&workbook)?, &layout);

    let (candidate_names, payload_error) = match parse_candidate_payload(candidates) {
        Ok(names) => (names, None),
        Err(err) => {
            log::warn!("{}; continuing with no candidates", err);
            (NameSet::new(), Some(err.to_string()))
        }
    };

    let reconciliation = reconcile(oracle, &candidate_names, &extract.names);

    let width = extract.column_count.max(layout.name_column);
    let rows = merge(
        extract.rows,
        &reconciliation.names,
        &extract.names,
        width,
        layout.name_column,
    );
    let summary = MergeSummary::from_rows(&rows);

    let mut out = Workbook::empty();
    write_merged_sheet(
        &mut out,
        &options.sheet_name,
        &extract.headers,
        &rows,
        width,
        layout.name_column,
        &match_fill,
    )?;
    save_workbook(&out, &output)?;

    Ok(WorkflowReport {
        output,
        summary,
        outcome: reconciliation.outcome,
        candidate_count: candidate_names.len(),
        payload_error,
    })
}

/// The ground-truth names an oracle would be given for this sheet
pub fn ground_truth_names(source: &WorkbookSource, layout: &SheetLayout) -> ReconcileResult<NameSet> {
    let workbook = open_source(source)?;
    Ok(read_sheet(source_sheet(&workbook)?, layout).names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ensure_xlsx_extension() {
        assert_eq!(ensure_xlsx_extension("report"), "report.xlsx");
        assert_eq!(ensure_xlsx_extension("report.xlsx"), "report.xlsx");
        assert_eq!(ensure_xlsx_extension("Report.XLSX"), "Report.XLSX");
        assert_eq!(ensure_xlsx_extension("report.csv"), "report.csv.xlsx");
        assert_eq!(ensure_xlsx_extension("  "), "processed_colleges.xlsx");
    }
}

//! Combining existing rows with reconciled candidates

use std::cmp::Ordering;

use ahash::AHashSet;

use crate::snapshot::{NameSet, RowRecord};

/// Counts describing a merged row set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeSummary {
    pub total: usize,
    /// Rows whose name is in the reconciled candidate set (new rows included)
    pub matched: usize,
    /// Rows synthesized from candidates
    pub added: usize,
    /// Existing rows with no matching candidate
    pub unmatched: usize,
}

impl MergeSummary {
    pub fn from_rows(rows: &[RowRecord]) -> Self {
        let matched = rows.iter().filter(|r| r.is_matched).count();
        let added = rows.iter().filter(|r| r.is_new).count();
        Self {
            total: rows.len(),
            matched,
            added,
            unmatched: rows.len() - matched,
        }
    }
}

/// Merge existing rows with the reconciled candidate names
///
/// Existing rows are flagged when their name is a candidate. Each candidate
/// not already in the sheet becomes a new row with a bold name cell. Names
/// are unique in the result: when the sheet repeats a name, its first row is
/// kept and later ones are dropped. The result is sorted with [`sort_rows`].
///
/// `column_count` and `name_column` (1-based) shape the synthesized rows.
pub fn merge(
    existing_rows: Vec<RowRecord>,
    normalized: &NameSet,
    existing_names: &NameSet,
    column_count: u16,
    name_column: u16,
) -> Vec<RowRecord> {
    let new_rows = normalized
        .iter()
        .filter(|name| !existing_names.contains(*name))
        .map(|name| RowRecord::synthesized(name.as_str(), column_count, name_column));

    let mut seen = AHashSet::new();
    let mut merged = Vec::with_capacity(existing_rows.len() + normalized.len());

    for mut row in existing_rows.into_iter() {
        if !seen.insert(row.name.clone()) {
            log::warn!(
                "duplicate name '{}' in sheet; keeping the first row only",
                row.name
            );
            continue;
        }
        row.is_matched = normalized.contains(&row.name);
        row.is_new = false;
        merged.push(row);
    }

    for row in new_rows {
        if seen.insert(row.name.clone()) {
            merged.push(row);
        }
    }

    sort_rows(&mut merged);

    let summary = MergeSummary::from_rows(&merged);
    log::info!(
        "merged {} rows: {} matched, {} new, {} unmatched",
        summary.total,
        summary.matched,
        summary.added,
        summary.unmatched
    );
    merged
}

/// Sort rows by case-insensitive name, empty names last, exact name on ties
pub fn sort_rows(rows: &mut [RowRecord]) {
    rows.sort_by_cached_key(|row| {
        (
            row.name.is_empty(),
            row.name.to_lowercase(),
            row.name.clone(),
        )
    });
}

/// Order two names the way [`sort_rows`] does
pub fn compare_names(a: &str, b: &str) -> Ordering {
    (a.is_empty(), a.to_lowercase(), a).cmp(&(b.is_empty(), b.to_lowercase(), b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::CellSnapshot;
    use campus_sheets_core::CellValue;
    use pretty_assertions::assert_eq;

    fn set(names: &[&str]) -> NameSet {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn existing(name: &str, note: &str) -> RowRecord {
        RowRecord::existing(
            name,
            vec![
                CellSnapshot::new(CellValue::string(name), Default::default(), None),
                CellSnapshot::new(CellValue::string(note), Default::default(), None),
            ],
        )
    }

    fn names(rows: &[RowRecord]) -> Vec<&str> {
        rows.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_merge_flags_and_adds() {
        let rows = vec![existing("Yale", "a"), existing("MIT", "b"), existing("Rice", "c")];
        let merged = merge(rows, &set(&["MIT", "Yale", "Brown"]), &set(&["Yale", "MIT", "Rice"]), 2, 1);

        assert_eq!(names(&merged), vec!["Brown", "MIT", "Rice", "Yale"]);
        let flags: Vec<(bool, bool)> = merged.iter().map(|r| (r.is_matched, r.is_new)).collect();
        assert_eq!(
            flags,
            vec![(true, true), (true, false), (false, false), (true, false)]
        );
        assert_eq!(merged[0].cells.len(), 2);
        assert_eq!(
            MergeSummary::from_rows(&merged),
            MergeSummary {
                total: 4,
                matched: 3,
                added: 1,
                unmatched: 1,
            }
        );
    }

    #[test]
    fn test_empty_candidates_leave_rows_unmatched() {
        let rows = vec![existing("Yale", "a"), existing("MIT", "b")];
        let merged = merge(rows.clone(), &NameSet::new(), &set(&["Yale", "MIT"]), 2, 1);

        assert_eq!(names(&merged), vec!["MIT", "Yale"]);
        assert!(merged.iter().all(|r| !r.is_matched && !r.is_new));
        assert_eq!(merged[1].cells, rows[0].cells);
    }

    #[test]
    fn test_duplicate_sheet_names_first_wins() {
        let rows = vec![existing("Yale", "first"), existing("Yale", "second")];
        let merged = merge(rows, &set(&["Yale"]), &set(&["Yale"]), 2, 1);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].cells[1].value(), &CellValue::string("first"));
    }

    #[test]
    fn test_sort_is_case_insensitive_and_total() {
        let mut rows = vec![
            existing("bard", ""),
            existing("Brown", ""),
            existing("", ""),
            existing("amherst", ""),
            existing("BROWN", ""),
        ];
        sort_rows(&mut rows);
        assert_eq!(names(&rows), vec!["amherst", "bard", "BROWN", "Brown", ""]);
        assert_eq!(compare_names("BROWN", "Brown"), Ordering::Less);
        assert_eq!(compare_names("", "Zeta"), Ordering::Greater);
    }

    #[test]
    fn test_union_completeness() {
        let existing_names = set(&["A", "B", "C"]);
        let normalized = set(&["B", "D", "E"]);
        let rows = existing_names.iter().map(|n| existing(n, "")).collect();
        let merged = merge(rows, &normalized, &existing_names, 2, 1);

        let expected: NameSet = existing_names.union(&normalized).cloned().collect();
        assert_eq!(names(&merged), expected.iter().map(String::as_str).collect::<Vec<_>>());
    }
}

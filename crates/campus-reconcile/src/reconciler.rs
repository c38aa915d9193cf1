//! Mapping candidate names onto their ground-truth spelling

use std::fmt;

use crate::candidates::parse_candidate_payload;
use crate::error::OracleError;
use crate::oracle::{unwrap_fenced_json, NameOracle, OracleRequest};
use crate::snapshot::NameSet;

/// How a reconciliation ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The oracle answered and its names were used
    Normalized,
    /// There were no candidates, so the oracle was not asked
    NoCandidates,
    /// The oracle failed; the raw candidate names were used instead
    Fallback(OracleError),
}

impl ReconcileOutcome {
    /// Whether name quality is degraded
    pub fn is_fallback(&self) -> bool {
        matches!(self, ReconcileOutcome::Fallback(_))
    }
}

impl fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileOutcome::Normalized => write!(f, "normalized"),
            ReconcileOutcome::NoCandidates => write!(f, "no candidates"),
            ReconcileOutcome::Fallback(err) => write!(f, "raw names used ({})", err),
        }
    }
}

/// Result of [`reconcile`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Candidate names after normalization
    pub names: NameSet,
    pub outcome: ReconcileOutcome,
}

impl Reconciliation {
    pub fn into_names(self) -> NameSet {
        self.names
    }
}

/// Rewrite candidates to ground-truth spelling through the oracle
///
/// Never fails: when the oracle is unavailable or its answer cannot be
/// parsed, the trimmed candidates are returned unchanged and the outcome
/// records why.
pub fn reconcile(
    oracle: &dyn NameOracle,
    candidates: &NameSet,
    ground_truth: &NameSet,
) -> Reconciliation {
    if candidates.is_empty() {
        log::debug!("no candidate names, skipping oracle '{}'", oracle.name());
        return Reconciliation {
            names: NameSet::new(),
            outcome: ReconcileOutcome::NoCandidates,
        };
    }

    ask(oracle, &OracleRequest::new(ground_truth, candidates), candidates)
}

/// Keep only the candidate lines the oracle recognizes as college names
///
/// Lines are trimmed and de-duplicated before the request. Like
/// [`reconcile`], an unavailable oracle or an unreadable answer leaves the
/// lines unfiltered and is recorded in the outcome.
pub fn filter_candidates<'a, I>(oracle: &dyn NameOracle, lines: I) -> Reconciliation
where
    I: IntoIterator<Item = &'a str>,
{
    let lines: NameSet = lines
        .into_iter()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if lines.is_empty() {
        log::debug!("no candidate lines, skipping oracle '{}'", oracle.name());
        return Reconciliation {
            names: NameSet::new(),
            outcome: ReconcileOutcome::NoCandidates,
        };
    }

    ask(oracle, &OracleRequest::filter(&lines), &lines)
}

fn ask(oracle: &dyn NameOracle, request: &OracleRequest, raw: &NameSet) -> Reconciliation {
    let answer = oracle
        .normalize(request)
        .and_then(|response| parse_oracle_response(&response));

    match answer {
        Ok(names) => {
            log::info!(
                "oracle '{}' turned {} {:?} candidates into {} names",
                oracle.name(),
                raw.len(),
                request.kind,
                names.len()
            );
            Reconciliation {
                names,
                outcome: ReconcileOutcome::Normalized,
            }
        }
        Err(err) => {
            log::warn!(
                "{:?} step degraded, using {} raw candidate names: {}",
                request.kind,
                raw.len(),
                err
            );
            Reconciliation {
                names: raw.clone(),
                outcome: ReconcileOutcome::Fallback(err),
            }
        }
    }
}

/// Unwrap and parse an oracle answer
pub fn parse_oracle_response(response: &str) -> Result<NameSet, OracleError> {
    parse_candidate_payload(unwrap_fenced_json(response))
        .map_err(|e| OracleError::Unparsable(e.to_string()))
}

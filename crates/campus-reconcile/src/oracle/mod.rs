//! Name-normalization oracles
//!
//! The reconciler hands an [`OracleRequest`] to a [`NameOracle`] and expects
//! a `{"colleges": [...]}` payload back, possibly wrapped in a code fence.
//! A request either filters raw lines down to college names or normalizes
//! candidates against the ground truth; see [`RequestKind`].
//!
//! - [`GeminiOracle`] asks the Gemini `generateContent` API
//! - [`AliasOracle`] applies a fixed alias table, offline
//! - [`NoOracle`] is always unavailable
//! - [`FnOracle`] wraps a closure

mod alias;
mod gemini;

pub use alias::AliasOracle;
pub use gemini::{GeminiConfig, GeminiOracle};

use crate::candidates::candidate_payload_from_names;
use crate::error::OracleError;
use crate::options::{OracleOptions, OracleProvider};
use crate::snapshot::NameSet;

/// Instructions sent with every normalization request
pub const NORMALIZE_SYSTEM_PROMPT: &str = r#"You are a data cleaning assistant who reconciles two lists of college names.

The user gives you a ground truth list of college names, one per line, and a JSON list of college names extracted from a document.

For every name in the JSON list, decide whether it refers to the same college as a name in the ground truth list, even when it is written differently (abbreviation, acronym, punctuation, word order, "The" prefix). If it does, replace it with the exact ground truth spelling. Otherwise keep it unchanged.

Do not add names that are not in the JSON list. Do not drop names from the JSON list.

Return only JSON in this format:
{
"colleges": [
   "...",
   "..."
   ]
}
"#;

/// Instructions sent with every filter request
pub const FILTER_SYSTEM_PROMPT: &str = r#"You are a text processing assistant who will help the user identify college names that appear within a block of text extracted from a document.

Identify the college names, and return them in JSON format.

If no college names appear within the text, simply return an EMPTY list for colleges field.

IMPORTANT: College names we care about are not usually embedded within bullet point sentences. Instead, they often appear by themselves on a single line without a bullet point.

<JSON format>
{
"colleges": [
   "...",
   "...",
   ]
}
"#;

/// What an oracle is asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestKind {
    /// Keep only the candidate lines that name a college
    Filter,
    /// Rewrite candidates to their ground-truth spelling
    #[default]
    Normalize,
}

/// One oracle request: both name lists plus the rendered prompt
#[derive(Debug, Clone, PartialEq)]
pub struct OracleRequest {
    pub kind: RequestKind,
    /// Names already in the spreadsheet, sorted; empty for filter requests
    pub ground_truth: Vec<String>,
    /// Names surfaced from the document, sorted
    pub candidates: Vec<String>,
}

impl OracleRequest {
    pub fn new(ground_truth: &NameSet, candidates: &NameSet) -> Self {
        Self {
            kind: RequestKind::Normalize,
            ground_truth: ground_truth.iter().cloned().collect(),
            candidates: candidates.iter().cloned().collect(),
        }
    }

    /// Ask which of the given lines are college names
    pub fn filter(lines: &NameSet) -> Self {
        Self {
            kind: RequestKind::Filter,
            ground_truth: Vec::new(),
            candidates: lines.iter().cloned().collect(),
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self.kind {
            RequestKind::Filter => FILTER_SYSTEM_PROMPT,
            RequestKind::Normalize => NORMALIZE_SYSTEM_PROMPT,
        }
    }

    /// Filter requests send the lines as plain text; normalize requests
    /// send both lists as delimited text blocks
    pub fn user_message(&self) -> String {
        match self.kind {
            RequestKind::Filter => self.candidates.join("\n"),
            RequestKind::Normalize => format!(
                "<ground truth list>\n{}\n</ground truth list>\n\n<JSON list>:\n{}\n</JSON list>\n",
                self.ground_truth.join("\n"),
                candidate_payload_from_names(self.candidates.iter().map(String::as_str))
            ),
        }
    }
}

/// A service that answers filter and normalization requests
pub trait NameOracle {
    /// Short name for log messages
    fn name(&self) -> &str;

    /// Answer a request with raw response text
    fn normalize(&self, request: &OracleRequest) -> Result<String, OracleError>;
}

/// Strip the code fence a language model tends to wrap JSON in
///
/// Removes surrounding whitespace and backticks, then a leading `json`
/// language tag.
pub fn unwrap_fenced_json(text: &str) -> &str {
    let trimmed = text.trim_matches(|c: char| c == '`' || c.is_whitespace());
    match trimmed.strip_prefix("json") {
        Some(rest) => rest.trim_start(),
        None => trimmed,
    }
}

/// Oracle that is never available; reconciliation keeps the raw names
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOracle;

impl NameOracle for NoOracle {
    fn name(&self) -> &str {
        "none"
    }

    fn normalize(&self, _request: &OracleRequest) -> Result<String, OracleError> {
        Err(OracleError::Unavailable("no oracle configured".into()))
    }
}

/// Oracle backed by a closure
pub struct FnOracle<F> {
    name: String,
    f: F,
}

impl<F> FnOracle<F>
where
    F: Fn(&OracleRequest) -> Result<String, OracleError>,
{
    pub fn new<S: Into<String>>(name: S, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> NameOracle for FnOracle<F>
where
    F: Fn(&OracleRequest) -> Result<String, OracleError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn normalize(&self, request: &OracleRequest) -> Result<String, OracleError> {
        (self.f)(request)
    }
}

/// Build the oracle selected by the options
pub fn build_oracle(options: &OracleOptions) -> Box<dyn NameOracle> {
    match options.provider {
        OracleProvider::Gemini => Box::new(GeminiOracle::new(GeminiConfig::from_options(options))),
        OracleProvider::Alias => Box::new(AliasOracle::from_table(&options.aliases)),
        OracleProvider::None => Box::new(NoOracle),
    }
}

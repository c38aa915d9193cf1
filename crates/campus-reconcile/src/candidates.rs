//! Candidate payloads and the line heuristic that produces candidate names

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::CandidatePayloadError;
use crate::snapshot::NameSet;

/// The one key a candidate payload carries
pub const COLLEGES_KEY: &str = "colleges";

/// Parse a `{"colleges": [...]}` payload into trimmed names
///
/// A missing, `null` or empty `colleges` list is an empty set, not an error.
/// Entries that are not strings, or are blank, are ignored.
pub fn parse_candidate_payload(text: &str) -> Result<NameSet, CandidatePayloadError> {
    let value: Value = serde_json::from_str(text)?;
    let object = value
        .as_object()
        .ok_or_else(|| CandidatePayloadError::NotAnObject(json_type(&value)))?;

    let entries = match object.get(COLLEGES_KEY) {
        None | Some(Value::Null) => {
            log::warn!("candidate payload has no \"{}\" key", COLLEGES_KEY);
            return Ok(NameSet::new());
        }
        Some(Value::Array(entries)) => entries,
        Some(other) => return Err(CandidatePayloadError::NotAList(json_type(other))),
    };

    let mut names = NameSet::new();
    for entry in entries {
        match entry.as_str().map(str::trim) {
            Some(name) if !name.is_empty() => {
                names.insert(name.to_string());
            }
            Some(_) => {}
            None => log::debug!("ignoring non-string candidate {}", entry),
        }
    }

    if names.is_empty() {
        log::warn!("candidate payload lists no colleges");
    }
    Ok(names)
}

/// Render names as a `{"colleges": [...]}` payload
pub fn candidate_payload_from_names<'a, I>(names: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let list: Vec<&str> = names.into_iter().collect();
    let payload = serde_json::json!({ COLLEGES_KEY: list });
    // A map of strings always serializes
    serde_json::to_string_pretty(&payload).unwrap_or_default()
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

static LINE_CANDIDATE: Lazy<Regex> = Lazy::new(|| {
    let multi_word = r"[A-Z][\w'-]+(?:\s+(?:(?:of|the|and|at|de)|[\w'-]+))+";
    let acronym = r"[A-Z]{2,7}";
    let single_word = r"[A-Z][\w'-]+";
    let commentary = r"(?:\s*\s-\s.*)?";
    Regex::new(&format!(
        r"^\s*((?:{})|(?:{})|(?:{}))\s*{}\s*$",
        multi_word, acronym, single_word, commentary
    ))
    .expect("line candidate pattern is valid")
});

const BULLET: char = '●';

/// Pick lines of document text that look like a bare college name
///
/// A line qualifies when, after trimming, it is not a bullet point and is a
/// capitalized multi-word name, an acronym or a single capitalized word,
/// optionally followed by ` - commentary`. The result is unique and sorted.
pub fn extract_line_candidates(text: &str) -> Vec<String> {
    let found: NameSet = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_bullet(line))
        .filter_map(|line| LINE_CANDIDATE.captures(line))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect();

    if found.is_empty() {
        log::warn!("no candidate lines found in document text");
    }
    found.into_iter().collect()
}

fn is_bullet(line: &str) -> bool {
    line.strip_prefix(BULLET)
        .map_or(false, |rest| rest.starts_with(char::is_whitespace))
}

//! Offline, table-driven normalization

use std::collections::BTreeMap;
use std::path::Path;

use ahash::AHashMap;

use super::{NameOracle, OracleRequest, RequestKind};
use crate::candidates::candidate_payload_from_names;
use crate::error::{OracleError, ReconcileError, ReconcileResult};

/// Oracle that rewrites candidates with an alias table
///
/// A candidate is rewritten when its trimmed, ASCII-lowercased form is a
/// known alias, or when it equals a ground-truth name once case and
/// punctuation are ignored. Anything else passes through unchanged.
#[derive(Debug, Clone, Default)]
pub struct AliasOracle {
    aliases: AHashMap<String, String>,
}

impl AliasOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an alias for a canonical name
    pub fn with_alias<A: AsRef<str>, C: Into<String>>(mut self, alias: A, canonical: C) -> Self {
        self.insert(alias.as_ref(), canonical.into());
        self
    }

    /// Build from an `alias -> canonical` table
    pub fn from_table(table: &BTreeMap<String, String>) -> Self {
        let mut oracle = Self::new();
        for (alias, canonical) in table {
            oracle.insert(alias, canonical.clone());
        }
        oracle
    }

    /// Parse a TOML file of `"alias" = "canonical"` pairs
    pub fn parse_table(text: &str) -> ReconcileResult<BTreeMap<String, String>> {
        toml::from_str(text)
            .map_err(|e| ReconcileError::InvalidOptions(format!("alias table: {}", e)))
    }

    /// Load an alias table file
    pub fn load_table<P: AsRef<Path>>(path: P) -> ReconcileResult<BTreeMap<String, String>> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ReconcileError::InvalidOptions(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse_table(&text)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    fn insert(&mut self, alias: &str, canonical: String) {
        let canonical = canonical.trim().to_string();
        if canonical.is_empty() {
            log::warn!("alias '{}' maps to an empty name, ignored", alias);
            return;
        }
        self.aliases.insert(alias_key(alias), canonical);
    }

    /// Canonical spelling for one candidate
    pub fn resolve<'a>(&'a self, candidate: &'a str, ground_truth: &'a [String]) -> &'a str {
        let candidate = candidate.trim();
        if let Some(canonical) = self.aliases.get(&alias_key(candidate)) {
            return canonical;
        }

        let loose = loose_key(candidate);
        ground_truth
            .iter()
            .find(|name| loose_key(name) == loose)
            .map(String::as_str)
            .unwrap_or(candidate)
    }
}

impl NameOracle for AliasOracle {
    fn name(&self) -> &str {
        "alias"
    }

    fn normalize(&self, request: &OracleRequest) -> Result<String, OracleError> {
        if request.kind == RequestKind::Filter {
            return Err(OracleError::Unavailable(
                "an alias table cannot tell college names from other lines".into(),
            ));
        }
        let resolved: Vec<&str> = request
            .candidates
            .iter()
            .map(|candidate| self.resolve(candidate, &request.ground_truth))
            .collect();
        Ok(candidate_payload_from_names(resolved))
    }
}

fn alias_key(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

/// Lowercased words with punctuation removed: "St. Mary's" -> "st marys"
fn loose_key(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::parse_candidate_payload;
    use pretty_assertions::assert_eq;

    fn ground_truth() -> Vec<String> {
        vec!["MIT".into(), "Saint Mary's College".into(), "Yale".into()]
    }

    #[test]
    fn test_resolve_alias_and_loose_match() {
        let oracle = AliasOracle::new()
            .with_alias("Massachusetts Institute of Technology", "MIT");
        let gt = ground_truth();

        assert_eq!(
            oracle.resolve(" massachusetts institute of technology ", &gt),
            "MIT"
        );
        assert_eq!(oracle.resolve("saint marys college", &gt), "Saint Mary's College");
        assert_eq!(oracle.resolve("YALE", &gt), "Yale");
        assert_eq!(oracle.resolve("Brown", &gt), "Brown");
    }

    #[test]
    fn test_normalize_returns_payload() {
        let oracle = AliasOracle::new()
            .with_alias("Massachusetts Institute of Technology", "MIT");
        let request = OracleRequest {
            kind: RequestKind::Normalize,
            ground_truth: ground_truth(),
            candidates: vec![
                "Brown".into(),
                "Massachusetts Institute of Technology".into(),
                "Yale".into(),
            ],
        };

        let response = oracle.normalize(&request).unwrap();
        let names: Vec<String> = parse_candidate_payload(&response)
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(names, vec!["Brown", "MIT", "Yale"]);
    }

    #[test]
    fn test_parse_table() {
        let table = AliasOracle::parse_table(
            r#"
"Massachusetts Institute of Technology" = "MIT"
"UPenn" = "University of Pennsylvania"
"#,
        )
        .unwrap();
        let oracle = AliasOracle::from_table(&table);
        assert_eq!(oracle.len(), 2);
        assert_eq!(oracle.resolve("upenn", &[]), "University of Pennsylvania");

        assert!(AliasOracle::parse_table("not = [valid").is_err());
    }
}

//! Rule data models
//! Knowledge base (input) and detection result (output); no matching logic lives here

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::error::TlResult;

/// A signature keyword and the technology it indicates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Always lower-case
    pub keyword: String,
    pub technology: String,
}

/// A named group of signatures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub name: String,
    pub signatures: Vec<Signature>,
}

impl CategoryRule {
    /// Distinct technology names this category can report
    pub fn technologies(&self) -> BTreeSet<&str> {
        self.signatures.iter().map(|s| s.technology.as_str()).collect()
    }
}

/// Validated, immutable knowledge base.
///
/// Only `KnowledgeBaseLoader` builds one, so every keyword is lower-case and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeBase {
    categories: Vec<CategoryRule>,
}

impl KnowledgeBase {
    pub(crate) fn from_validated(categories: Vec<CategoryRule>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[CategoryRule] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&CategoryRule> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn signature_count(&self) -> usize {
        self.categories.iter().map(|c| c.signatures.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Detected technologies grouped by category.
///
/// Categories without matches are never stored. Ordered collections keep output
/// stable; callers should still treat membership, not order, as the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DetectionResult(BTreeMap<String, BTreeSet<String>>);

impl DetectionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a technology under a category. Returns `false` if it was already there.
    pub fn insert(&mut self, category: &str, technology: &str) -> bool {
        self.0
            .entry(category.to_string())
            .or_default()
            .insert(technology.to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of categories with at least one match
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn technology_count(&self) -> usize {
        self.0.values().map(BTreeSet::len).sum()
    }

    pub fn get(&self, category: &str) -> Option<&BTreeSet<String>> {
        self.0.get(category)
    }

    pub fn contains(&self, category: &str, technology: &str) -> bool {
        self.0
            .get(category)
            .is_some_and(|techs| techs.contains(technology))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.0.iter().map(|(cat, techs)| (cat.as_str(), techs))
    }

    /// Pretty-printed JSON object, `{"category": ["Tech", ...]}`
    pub fn to_pretty_json(&self) -> TlResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ======== Display (log lines / CLI summary) ========
impl fmt::Display for DetectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "(none)");
        }
        for (i, (category, techs)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            let names: Vec<&str> = techs.iter().map(String::as_str).collect();
            write!(f, "{}: {}", category, names.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_dedups_and_keeps_categories_non_empty() {
        let mut result = DetectionResult::new();
        assert!(result.is_empty());

        assert!(result.insert("frontend", "React"));
        assert!(!result.insert("frontend", "React"));
        assert!(result.insert("frontend", "Vue"));
        assert!(result.insert("cms", "WordPress"));

        assert_eq!(result.len(), 2);
        assert_eq!(result.technology_count(), 3);
        assert!(result.contains("frontend", "React"));
        assert!(!result.contains("backend", "React"));
        assert_eq!(result.categories().collect::<Vec<_>>(), vec!["cms", "frontend"]);
        assert_eq!(result.to_string(), "cms: WordPress; frontend: React, Vue");
    }

    #[test]
    fn test_serializes_as_plain_mapping() {
        let mut result = DetectionResult::new();
        result.insert("frontend", "React");
        let json: serde_json::Value = serde_json::from_str(&result.to_pretty_json().unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({"frontend": ["React"]}));
        assert_eq!(DetectionResult::new().to_pretty_json().unwrap(), "{}");
    }
}

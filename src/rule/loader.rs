//! Knowledge base loader
//! Reads the category → keyword → technology dictionary once at startup and validates it eagerly

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::path::Path;

use tracing::{debug, warn};

use super::model::{CategoryRule, KnowledgeBase, Signature};
use crate::config::{GlobalConfig, KnowledgeBaseSource};
use crate::error::{TechLensError, TlResult};

/// Default knowledge base compiled into the binary
pub const EMBEDDED_KNOWLEDGE_BASE: &str = include_str!("../../data/technologies.json");

/// On-disk shape: `{"category": {"keyword": "Technology"}}`
type RawKnowledgeBase = BTreeMap<String, BTreeMap<String, String>>;

/// Knowledge base loader
pub struct KnowledgeBaseLoader;

impl KnowledgeBaseLoader {
    /// Load from the source named in the configuration
    pub async fn load(config: &GlobalConfig) -> TlResult<KnowledgeBase> {
        match &config.knowledge_base {
            KnowledgeBaseSource::Embedded => Self::embedded(),
            KnowledgeBaseSource::LocalFile(path) => Self::load_file(path).await,
        }
    }

    /// Built-in knowledge base
    pub fn embedded() -> TlResult<KnowledgeBase> {
        debug!("Loading embedded knowledge base");
        Self::from_json_str(EMBEDDED_KNOWLEDGE_BASE)
    }

    /// Knowledge base from a local JSON file
    pub async fn load_file(path: &Path) -> TlResult<KnowledgeBase> {
        debug!("Loading knowledge base from {}", path.display());
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            TechLensError::KnowledgeBaseError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&content).map_err(|e| match e {
            TechLensError::KnowledgeBaseError(msg) => {
                TechLensError::KnowledgeBaseError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> TlResult<KnowledgeBase> {
        let raw: RawKnowledgeBase = serde_json::from_str(json)
            .map_err(|e| TechLensError::KnowledgeBaseError(format!("malformed JSON: {}", e)))?;
        Self::validate(raw)
    }

    /// Check and normalize a parsed knowledge base.
    ///
    /// Keywords are lower-cased here. Two keywords of one category that differ only
    /// by case and name different technologies are rejected, even though a plain
    /// scan could report both names; a matched keyword must name one technology.
    fn validate(raw: RawKnowledgeBase) -> TlResult<KnowledgeBase> {
        let mut categories = Vec::with_capacity(raw.len());

        for (category, entries) in raw {
            if category.trim().is_empty() {
                return Err(TechLensError::KnowledgeBaseError(
                    "category name must not be empty".to_string(),
                ));
            }

            // Lower-cased keyword → technology, to catch case-only collisions
            let mut seen: BTreeMap<String, String> = BTreeMap::new();
            for (keyword, technology) in entries {
                if keyword.trim().is_empty() {
                    return Err(TechLensError::KnowledgeBaseError(format!(
                        "category `{}` has an empty keyword",
                        category
                    )));
                }
                if technology.trim().is_empty() {
                    return Err(TechLensError::KnowledgeBaseError(format!(
                        "keyword `{}` in category `{}` has an empty technology name",
                        keyword, category
                    )));
                }

                match seen.entry(keyword.to_lowercase()) {
                    Entry::Vacant(slot) => {
                        slot.insert(technology.trim().to_string());
                    }
                    Entry::Occupied(slot) if slot.get() == technology.trim() => {
                        debug!("Duplicate keyword `{}` in `{}` ignored", keyword, category);
                    }
                    Entry::Occupied(slot) => {
                        return Err(TechLensError::KnowledgeBaseError(format!(
                            "keyword `{}` in category `{}` maps to both `{}` and `{}`",
                            slot.key(),
                            category,
                            slot.get(),
                            technology
                        )));
                    }
                }
            }

            if seen.is_empty() {
                warn!("Category `{}` has no keywords and will never match", category);
                continue;
            }

            let signatures = seen
                .into_iter()
                .map(|(keyword, technology)| Signature { keyword, technology })
                .collect();
            categories.push(CategoryRule {
                name: category,
                signatures,
            });
        }

        if categories.is_empty() {
            return Err(TechLensError::KnowledgeBaseError(
                "knowledge base defines no keywords".to_string(),
            ));
        }

        let kb = KnowledgeBase::from_validated(categories);
        debug!(
            "Knowledge base loaded: {} categories, {} signatures",
            kb.categories().len(),
            kb.signature_count()
        );
        Ok(kb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn kb_error(json: &str) -> String {
        match KnowledgeBaseLoader::from_json_str(json) {
            Err(TechLensError::KnowledgeBaseError(msg)) => msg,
            other => panic!("expected KnowledgeBaseError, got {:?}", other),
        }
    }

    #[test]
    fn test_keywords_are_lowercased() {
        let kb = KnowledgeBaseLoader::from_json_str(
            r#"{"frontend": {"React": "React", "vue": "Vue"}}"#,
        )
        .unwrap();

        let frontend = kb.category("frontend").unwrap();
        let keywords: Vec<&str> = frontend.signatures.iter().map(|s| s.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["react", "vue"]);
        assert_eq!(kb.signature_count(), 2);
    }

    #[test]
    fn test_several_keywords_for_one_technology() {
        let kb = KnowledgeBaseLoader::from_json_str(
            r#"{"cms": {"wp-content": "WordPress", "wordpress": "WordPress", "WordPress": "WordPress"}}"#,
        )
        .unwrap();
        let cms = kb.category("cms").unwrap();
        assert_eq!(cms.signatures.len(), 2);
        assert_eq!(cms.technologies().into_iter().collect::<Vec<_>>(), vec!["WordPress"]);
    }

    #[test]
    fn test_rejects_malformed_entries() {
        assert!(kb_error("[1, 2, 3]").contains("malformed JSON"));
        assert!(kb_error(r#"{"frontend": {"react": 1}}"#).contains("malformed JSON"));
        assert!(kb_error(r#"{"frontend": ["react"]}"#).contains("malformed JSON"));
        assert!(kb_error(r#"{"": {"react": "React"}}"#).contains("category name"));
        assert!(kb_error(r#"{"frontend": {"  ": "React"}}"#).contains("empty keyword"));
        assert!(kb_error(r#"{"frontend": {"react": ""}}"#).contains("empty technology"));
        assert!(kb_error(r#"{"frontend": {"React": "React", "react": "Preact"}}"#).contains("maps to both"));
        assert!(kb_error("{}").contains("no keywords"));
        assert!(kb_error(r#"{"frontend": {}}"#).contains("no keywords"));
    }

    #[test]
    fn test_empty_category_is_dropped() {
        let kb = KnowledgeBaseLoader::from_json_str(
            r#"{"frontend": {"react": "React"}, "backend": {}}"#,
        )
        .unwrap();
        assert!(kb.category("backend").is_none());
        assert_eq!(kb.categories().len(), 1);
    }

    #[test]
    fn test_embedded_knowledge_base_is_valid() {
        let kb = KnowledgeBaseLoader::embedded().unwrap();
        assert!(!kb.is_empty());
        let frontend = kb.category("frontend_frameworks").unwrap();
        assert!(frontend.technologies().contains("React"));
    }

    #[tokio::test]
    async fn test_load_from_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"frontend": {{"svelte": "Svelte"}}}}"#).unwrap();

        let config = crate::ConfigManager::custom()
            .knowledge_base_file(file.path())
            .build();
        let kb = KnowledgeBaseLoader::load(&config).await.unwrap();
        assert!(kb.category("frontend").unwrap().technologies().contains("Svelte"));
    }

    #[tokio::test]
    async fn test_missing_file_is_startup_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = KnowledgeBaseLoader::load_file(&dir.path().join("nope.json"))
            .await
            .unwrap_err();
        assert!(err.is_startup_fatal());
    }
}

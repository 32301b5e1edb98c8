//! Keyword analyzer: substring matching of knowledge-base signatures against a page
use tracing::debug;

use crate::extractor::PageContent;
use crate::rule::{DetectionResult, KnowledgeBase};

/// Keyword analyzer
pub struct KeywordAnalyzer;

impl KeywordAnalyzer {
    /// Test every (category, keyword, technology) against the page.
    ///
    /// Plain containment, no word boundaries: `react` matches inside `reactive`.
    pub fn analyze(kb: &KnowledgeBase, page: &PageContent, detected: &mut DetectionResult) {
        for category in kb.categories() {
            for signature in &category.signatures {
                // Another keyword already reported this technology
                if detected.contains(&category.name, &signature.technology) {
                    continue;
                }

                if page.contains(&signature.keyword) {
                    debug!(
                        "Keyword match: category={}, keyword={}, technology={}",
                        category.name, signature.keyword, signature.technology
                    );
                    detected.insert(&category.name, &signature.technology);
                }
            }
        }
    }
}

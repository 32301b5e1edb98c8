//! Prompt template for the stack analysis

use crate::error::TlResult;
use crate::rule::DetectionResult;

/// The questions asked about every detected stack, in order
pub const ANALYSIS_ASKS: [&str; 4] = [
    "What kind of stack this is (frontend, backend, databases, frameworks, etc.)",
    "Why the developers might have chosen these technologies.",
    "Strengths and weaknesses of the stack.",
    "What type of product or website this could be.",
];

/// Rendered prompt text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisPrompt(String);

impl AnalysisPrompt {
    /// Embed the URL and the pretty-printed detection mapping
    pub fn render(detection: &DetectionResult, url: &str) -> TlResult<Self> {
        let detected_json = detection.to_pretty_json()?;

        let mut prompt = format!(
            "I scanned the website: {url}\n\
             and detected these technologies/frameworks:\n\n\
             {detected_json}\n\n\
             Please analyze and give short summaries for each:\n"
        );
        for (i, ask) in ANALYSIS_ASKS.iter().enumerate() {
            prompt.push_str(&format!("{}. {}\n", i + 1, ask));
        }

        Ok(Self(prompt))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

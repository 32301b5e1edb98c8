//! Summarization module: prompt building and the external text-generation service
pub mod gemini;
pub mod prompt;
pub mod session;

use std::fmt;

use async_trait::async_trait;

use crate::error::TlResult;

pub use self::gemini::GeminiClient;
pub use self::prompt::{ANALYSIS_ASKS, AnalysisPrompt};
pub use self::session::{AnalysisSession, Summarizer};

/// External text-generation service
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Submit a prompt and return the generated prose
    async fn generate(&self, prompt: &str) -> TlResult<String>;
}

/// Prose returned by the text-generation service, kept opaque
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisText(String);

impl AnalysisText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Blank-line separated blocks, for display
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.0
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

impl fmt::Display for AnalysisText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

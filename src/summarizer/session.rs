//! Summarizer and the per-action analysis memo
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::prompt::AnalysisPrompt;
use super::{AnalysisText, TextGenerator};
use crate::error::TlResult;
use crate::rule::DetectionResult;

/// Turns a detection result into prose through a text generator
#[derive(Clone)]
pub struct Summarizer {
    generator: Arc<dyn TextGenerator>,
}

impl Summarizer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// One prompt, one call, no retry. Errors from the generator are returned as-is.
    pub async fn summarize(&self, detection: &DetectionResult, url: &str) -> TlResult<AnalysisText> {
        let prompt = AnalysisPrompt::render(detection, url)?;
        debug!("Submitting analysis prompt ({} chars) for {}", prompt.as_str().len(), url);

        let text = self.generator.generate(prompt.as_str()).await?;
        info!("Analysis received for {} ({} chars)", url, text.len());
        Ok(AnalysisText::new(text))
    }

    /// Start a user action scoped to one detection result
    pub fn session<'a>(&'a self, detection: &'a DetectionResult, url: &'a str) -> AnalysisSession<'a> {
        AnalysisSession {
            summarizer: self,
            detection,
            url,
            analysis: OnceCell::new(),
        }
    }
}

/// The analysis of one (detection, url) pair, generated at most once.
///
/// Displaying the text and saving it read the same value.
pub struct AnalysisSession<'a> {
    summarizer: &'a Summarizer,
    detection: &'a DetectionResult,
    url: &'a str,
    analysis: OnceCell<AnalysisText>,
}

impl AnalysisSession<'_> {
    pub async fn analysis(&self) -> TlResult<&AnalysisText> {
        self.analysis
            .get_or_try_init(|| self.summarizer.summarize(self.detection, self.url))
            .await
    }

    pub fn url(&self) -> &str {
        self.url
    }

    pub fn detection(&self) -> &DetectionResult {
        self.detection
    }
}

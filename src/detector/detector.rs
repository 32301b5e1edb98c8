//! Detector core: fetch a page, scan it, report technologies per category
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use super::analyzer::KeywordAnalyzer;
use super::fetcher::PageFetcher;
use crate::config::GlobalConfig;
use crate::error::{FetchError, TechLensError, TlResult};
use crate::extractor::PageContent;
use crate::rule::{DetectionResult, KnowledgeBase, KnowledgeBaseLoader};

/// Technology detector
#[derive(Debug, Clone)]
pub struct TechDetector {
    knowledge_base: Arc<KnowledgeBase>,
    fetcher: PageFetcher,
    config: GlobalConfig,
}

impl TechDetector {
    /// Create a detector, loading the knowledge base named in `config`
    pub async fn new(config: GlobalConfig) -> TlResult<Self> {
        let kb = KnowledgeBaseLoader::load(&config).await?;
        Self::with_knowledge_base(Arc::new(kb), config)
    }

    /// Create a detector around an already loaded knowledge base
    pub fn with_knowledge_base(knowledge_base: Arc<KnowledgeBase>, config: GlobalConfig) -> TlResult<Self> {
        if config.http_timeout == 0 {
            return Err(TechLensError::ConfigError(
                "http_timeout must be at least one second".to_string(),
            ));
        }
        let fetcher = PageFetcher::new(config.fetch_timeout())?;
        Ok(Self::with_fetcher(knowledge_base, fetcher, config))
    }

    /// Create a detector around a knowledge base and a prepared fetcher
    pub fn with_fetcher(knowledge_base: Arc<KnowledgeBase>, fetcher: PageFetcher, config: GlobalConfig) -> Self {
        Self {
            knowledge_base,
            fetcher,
            config,
        }
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.knowledge_base
    }

    pub fn config(&self) -> &GlobalConfig {
        &self.config
    }

    /// Fetch `url` and detect technologies on it.
    ///
    /// A page with no known keyword is `Ok` with an empty result; only a failed
    /// fetch is an error.
    pub async fn detect(&self, url: &str) -> Result<DetectionResult, FetchError> {
        debug!("Fetching {} (timeout {:?})", url, self.fetcher.timeout());
        let body = self.fetcher.fetch(url).await?;
        let detected = self.detect_html(&body);
        info!(
            "Detected {} technologies in {} categories on {}",
            detected.technology_count(),
            detected.len(),
            url
        );
        Ok(detected)
    }

    /// Scan an HTML body already in hand
    pub fn detect_html(&self, html: &str) -> DetectionResult {
        detect_html(html, &self.knowledge_base)
    }
}

/// Scan an HTML body against a knowledge base
pub fn detect_html(html: &str, kb: &KnowledgeBase) -> DetectionResult {
    let page = PageContent::parse(html);
    debug!(
        "Page scan surface: {} bytes, {} scripts, {} links, {} metas",
        page.body().len(),
        page.scripts().len(),
        page.links().len(),
        page.metas().len()
    );

    let mut detected = DetectionResult::new();
    KeywordAnalyzer::analyze(kb, &page, &mut detected);
    detected
}

/// One-shot detection without a `TechDetector`
pub async fn detect(url: &str, kb: &KnowledgeBase, timeout: Duration) -> Result<DetectionResult, FetchError> {
    let fetcher = PageFetcher::new(timeout).map_err(|source| FetchError::Transport {
        url: url.to_string(),
        source,
    })?;
    let body = fetcher.fetch(url).await?;
    Ok(detect_html(&body, kb))
}

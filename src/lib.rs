//! rstechlens - website technology stack detection with an AI-written analysis
//!
//! A page is fetched once, lower-cased, and scanned for the signature keywords of a
//! static knowledge base; matches are grouped by category and can then be handed to
//! a text-generation service for a prose summary.

// Global error types
pub use self::error::{FetchError, TechLensError, TlResult};

// Configuration
pub use self::config::{
    ApiKey, ConfigManager, CustomConfigBuilder, GlobalConfig, KnowledgeBaseSource, Secrets,
};

// Knowledge base and results
pub use self::rule::{CategoryRule, DetectionResult, KnowledgeBase, KnowledgeBaseLoader, Signature};

// Page scan surface
pub use self::extractor::{HtmlExtractor, PageContent};

// Detection
pub use self::detector::{KeywordAnalyzer, PageFetcher, TechDetector, detect, detect_html};

// Summarization
pub use self::summarizer::{
    AnalysisPrompt, AnalysisSession, AnalysisText, GeminiClient, Summarizer, TextGenerator,
};

// Presentation
pub use self::report::{IconTable, ReportRenderer};

pub mod config;
pub mod detector;
pub mod error;
pub mod extractor;
pub mod report;
pub mod rule;
pub mod summarizer;

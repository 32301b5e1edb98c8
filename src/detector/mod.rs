//! Detection module: page fetching and keyword matching
pub mod analyzer;
pub mod detector;
pub mod fetcher;

// Core interfaces
pub use self::analyzer::KeywordAnalyzer;
pub use self::detector::{TechDetector, detect, detect_html};
pub use self::fetcher::PageFetcher;

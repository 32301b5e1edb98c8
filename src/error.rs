//! Global error types

use std::time::Duration;

use serde_json::Error as SerdeJsonError;
use thiserror::Error;
use url::ParseError as UrlParseError;

/// Failure to retrieve the target page.
///
/// This is the only error `detect` reports. A page that was fetched but matched
/// nothing is an empty `DetectionResult`, never a `FetchError`.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: UrlParseError,
    },
    #[error("unsupported URL scheme `{scheme}` in `{url}` (expected http or https)")]
    UnsupportedScheme { url: String, scheme: String },
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to read response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// URL the failed request was aimed at
    pub fn url(&self) -> &str {
        match self {
            Self::InvalidUrl { url, .. }
            | Self::UnsupportedScheme { url, .. }
            | Self::Timeout { url, .. }
            | Self::Transport { url, .. }
            | Self::Decode { url, .. } => url,
        }
    }
}

#[derive(Error, Debug)]
pub enum TechLensError {
    // Configuration errors, fatal at startup
    #[error("knowledge base is invalid: {0}")]
    KnowledgeBaseError(String),
    #[error("secrets could not be loaded: {0}")]
    SecretsError(String),
    #[error("missing API credential: {0}")]
    MissingCredential(String),
    #[error("invalid configuration: {0}")]
    ConfigError(String),

    // Detection
    #[error(transparent)]
    Fetch(#[from] FetchError),

    // Summarization
    #[error("summarization failed: {0}")]
    SummarizationError(String),
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    // Serialization
    #[error("JSON error: {0}")]
    JsonError(#[from] SerdeJsonError),
}

impl TechLensError {
    /// Configuration problems that should stop the process before any request is served.
    pub fn is_startup_fatal(&self) -> bool {
        matches!(
            self,
            Self::KnowledgeBaseError(_)
                | Self::SecretsError(_)
                | Self::MissingCredential(_)
                | Self::ConfigError(_)
        )
    }
}

// Global Result type
pub type TlResult<T> = Result<T, TechLensError>;

//! Global configuration: every tunable of a run, built once at startup and passed by reference
pub mod secrets;

use std::path::PathBuf;
use std::time::Duration;

pub use self::secrets::{ApiKey, GEMINI_API_KEY_NAME, Secrets};

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_SECRETS_PATH: &str = ".streamlit/secrets.toml";

/// Where the knowledge base comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeBaseSource {
    Embedded,            // data/technologies.json compiled into the binary
    LocalFile(PathBuf),  // JSON file of the same shape, read at startup
}

/// Global configuration
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    // Knowledge base source
    pub knowledge_base: KnowledgeBaseSource,
    // Secrets file holding the API credential
    pub secrets_path: PathBuf,
    // Page fetch timeout (seconds)
    pub http_timeout: u64,
    // Text-generation model name
    pub model: String,
    // Text-generation API base URL
    pub api_base_url: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            knowledge_base: KnowledgeBaseSource::Embedded,
            secrets_path: PathBuf::from(DEFAULT_SECRETS_PATH),
            http_timeout: DEFAULT_HTTP_TIMEOUT_SECS,
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl GlobalConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout)
    }
}

/// Configuration entry points
pub struct ConfigManager;

impl ConfigManager {
    /// Default configuration
    pub fn get_default() -> GlobalConfig {
        GlobalConfig::default()
    }

    /// Custom configuration
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }
}

/// Chained builder over `GlobalConfig`
#[derive(Debug, Clone, Default)]
pub struct CustomConfigBuilder {
    config: GlobalConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn knowledge_base(mut self, source: KnowledgeBaseSource) -> Self {
        self.config.knowledge_base = source;
        self
    }

    /// Shorthand for `knowledge_base(KnowledgeBaseSource::LocalFile(path))`
    pub fn knowledge_base_file(self, path: impl Into<PathBuf>) -> Self {
        self.knowledge_base(KnowledgeBaseSource::LocalFile(path.into()))
    }

    pub fn secrets_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.secrets_path = path.into();
        self
    }

    pub fn http_timeout(mut self, timeout: u64) -> Self {
        self.config.http_timeout = timeout;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into();
        self
    }

    pub fn build(self) -> GlobalConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConfigManager::get_default();
        assert_eq!(config.knowledge_base, KnowledgeBaseSource::Embedded);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.secrets_path, PathBuf::from(".streamlit/secrets.toml"));
    }

    #[test]
    fn test_custom_builder() {
        let config = ConfigManager::custom()
            .knowledge_base_file("kb.json")
            .secrets_path("/etc/rstechlens/secrets.toml")
            .http_timeout(3)
            .model("gemini-2.0-flash")
            .api_base_url("http://127.0.0.1:9000")
            .build();

        assert_eq!(
            config.knowledge_base,
            KnowledgeBaseSource::LocalFile(PathBuf::from("kb.json"))
        );
        assert_eq!(config.fetch_timeout(), Duration::from_secs(3));
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.api_base_url, "http://127.0.0.1:9000");
    }
}

//! API credential loading
//!
//! The secrets file uses the layout of a Streamlit `secrets.toml`:
//!
//! ```toml
//! [api_keys]
//! GEMINI_API_KEY = "..."
//! ```
//!
//! A non-empty `GEMINI_API_KEY` environment variable wins over the file.

use std::collections::HashMap;
use std::fmt;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{TechLensError, TlResult};

pub const GEMINI_API_KEY_NAME: &str = "GEMINI_API_KEY";

/// API key; never printed by `Debug`
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Default, Deserialize)]
struct SecretsFile {
    #[serde(default)]
    api_keys: HashMap<String, String>,
}

/// Credentials loaded at startup
#[derive(Debug, Clone)]
pub struct Secrets {
    gemini_api_key: ApiKey,
}

impl Secrets {
    pub fn new(gemini_api_key: impl Into<String>) -> TlResult<Self> {
        let key = gemini_api_key.into();
        if key.trim().is_empty() {
            return Err(TechLensError::MissingCredential(format!(
                "{} is empty",
                GEMINI_API_KEY_NAME
            )));
        }
        Ok(Self {
            gemini_api_key: ApiKey(key.trim().to_string()),
        })
    }

    /// Load from the process environment, falling back to the secrets file
    pub async fn load(path: &Path) -> TlResult<Self> {
        let env_value = std::env::var(GEMINI_API_KEY_NAME).ok();
        Self::resolve(env_value, path).await
    }

    /// Resolve the key from an explicit environment value and a secrets file
    pub async fn resolve(env_value: Option<String>, path: &Path) -> TlResult<Self> {
        // 1. Environment first
        if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
            debug!("Using {} from environment", GEMINI_API_KEY_NAME);
            return Self::new(value);
        }

        // 2. Secrets file
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(TechLensError::MissingCredential(format!(
                    "{} is not set and secrets file {} does not exist",
                    GEMINI_API_KEY_NAME,
                    path.display()
                )));
            }
            Err(e) => {
                return Err(TechLensError::SecretsError(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        debug!("Loading {} from {}", GEMINI_API_KEY_NAME, path.display());
        Self::from_toml_str(&content)
    }

    /// Parse the secrets file content
    pub fn from_toml_str(content: &str) -> TlResult<Self> {
        let file: SecretsFile = toml::from_str(content)
            .map_err(|e| TechLensError::SecretsError(format!("malformed secrets file: {}", e)))?;

        match file.api_keys.get(GEMINI_API_KEY_NAME) {
            Some(key) => Self::new(key.as_str()),
            None => Err(TechLensError::MissingCredential(format!(
                "[api_keys].{} not found in secrets file",
                GEMINI_API_KEY_NAME
            ))),
        }
    }

    pub fn gemini_api_key(&self) -> &ApiKey {
        &self.gemini_api_key
    }
}

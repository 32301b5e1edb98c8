//! Google Gemini text generation over the `generateContent` REST endpoint

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use super::TextGenerator;
use crate::config::{ApiKey, GlobalConfig, Secrets};
use crate::error::{TechLensError, TlResult};

/// Gemini client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http_client: Client,
    api_key: ApiKey,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: ApiKey, model: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            // No request timeout: the service decides how long generation may take
            http_client: Client::new(),
            api_key,
            model: model.into(),
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &GlobalConfig, secrets: &Secrets) -> Self {
        Self::new(
            secrets.gemini_api_key().clone(),
            config.model.clone(),
            config.api_base_url.clone(),
        )
    }

    /// Replace the HTTP client, e.g. one with custom proxy settings
    pub fn with_http_client(mut self, http_client: Client) -> Self {
        self.http_client = http_client;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// Concatenate the text parts of the first candidate
    pub fn parse_response(response: &Value) -> TlResult<String> {
        let candidates = response["candidates"]
            .as_array()
            .ok_or_else(|| TechLensError::SummarizationError("no candidates in Gemini response".into()))?;

        let candidate = candidates
            .first()
            .ok_or_else(|| TechLensError::SummarizationError("empty candidates array in Gemini response".into()))?;

        let parts = candidate["content"]["parts"]
            .as_array()
            .ok_or_else(|| TechLensError::SummarizationError("no content parts in Gemini response".into()))?;

        let text: String = parts.iter().filter_map(|part| part["text"].as_str()).collect();
        if text.is_empty() {
            let reason = candidate["finishReason"].as_str().unwrap_or("unknown");
            return Err(TechLensError::SummarizationError(format!(
                "Gemini response has no text (finish reason: {})",
                reason
            )));
        }

        Ok(text)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[instrument(skip(self, prompt), fields(model = %self.model), level = "debug")]
    async fn generate(&self, prompt: &str) -> TlResult<String> {
        let request_body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }]
        });

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| TechLensError::SummarizationError(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(TechLensError::SummarizationError(format!(
                "Gemini API error (status {}): {}",
                status, error_text
            )));
        }

        let response_json: Value = response.json().await.map_err(|e| {
            TechLensError::SummarizationError(format!("failed to parse Gemini response: {}", e))
        })?;
        debug!("Gemini response received");

        Self::parse_response(&response_json)
    }
}

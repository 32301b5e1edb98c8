//! Page fetcher: one GET per detection, bounded by a timeout, never retried

use std::time::Duration;

use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::error::FetchError;

#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    timeout: Duration,
}

impl PageFetcher {
    /// Build a client whose total request time is capped at `timeout`
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, timeout))
    }

    /// Wrap a prepared client. `timeout` must be the one the client was built with;
    /// it is only reported back in `FetchError::Timeout`.
    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch `url` and return its body as text.
    ///
    /// Any HTTP status counts as a fetched page; only transport problems are errors.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        // 1. Parse and check scheme
        let parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::UnsupportedScheme {
                url: url.to_string(),
                scheme: parsed.scheme().to_string(),
            });
        }

        // 2. Send
        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| self.classify(url, e, false))?;
        debug!(
            "Fetched {} (status {}, content-length {:?})",
            url,
            response.status(),
            response.content_length()
        );

        // 3. Read body
        response.text().await.map_err(|e| self.classify(url, e, true))
    }

    fn classify(&self, url: &str, source: reqwest::Error, reading_body: bool) -> FetchError {
        let url = url.to_string();
        if source.is_timeout() {
            FetchError::Timeout {
                url,
                timeout: self.timeout,
            }
        } else if reading_body {
            FetchError::Decode { url, source }
        } else {
            FetchError::Transport { url, source }
        }
    }
}

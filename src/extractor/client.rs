//! HTTP client for the extraction provider
//!
//! Speaks a messages-style completion API over reqwest. Transient provider
//! failures (HTTP 429, 5xx, timeouts) are retried a bounded number of
//! times with a short backoff; definitive rejections fail the call
//! immediately. Oversized inputs surface as a provider rejection and are
//! therefore never retried.

use std::fmt;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::extractor::ExtractionProvider;
use crate::extractor::config::LlmConfig;
use crate::extractor::error::{ConfigError, ExtractError};
use crate::extractor::prompts::EXTRACTION_PROMPT;

const DEFAULT_MODEL: &str = "claude-sonnet-4";
const DEFAULT_MAX_TOKENS: u32 = 8192;
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const API_VERSION: &str = "2023-06-01";

/// Maximum number of provider-level attempts per call
const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY_MS: u64 = 500;

/// Extraction client backed by a remote messages API
pub struct LlmExtractor {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl LlmExtractor {
    /// Build an extractor from loaded provider configuration
    pub fn from_config(config: &LlmConfig) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ConfigError::InvalidHeader(format!("{name}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ConfigError::InvalidHeader(format!("{name}: {e}")))?;
            headers.insert(name, value);
        }

        let mut builder = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .default_headers(headers);

        if let Some(ca_path) = &config.ca_certs_path {
            match std::fs::read(ca_path) {
                Ok(pem) => {
                    let cert = reqwest::Certificate::from_pem(&pem)
                        .map_err(|e| ConfigError::InvalidCaBundle(e.to_string()))?;
                    builder = builder.add_root_certificate(cert);
                    info!("Trusting CA bundle at {}", ca_path.display());
                }
                Err(e) => {
                    warn!(
                        "CA bundle {} not readable, using system roots: {}",
                        ca_path.display(),
                        e
                    );
                }
            }
        }

        let client = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    async fn send(
        &self,
        url: &str,
        request: &MessagesRequest<'_>,
    ) -> Result<String, ExtractError> {
        let response = self
            .client
            .post(url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExtractError::Timeout
                } else {
                    ExtractError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(ExtractError::RateLimited);
            }
            return Err(ExtractError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MessagesResponse = response.json().await.map_err(|e| {
            ExtractError::UnexpectedResponse(format!("invalid response body: {e}"))
        })?;

        let text: String = parsed
            .content
            .iter()
            .filter(|block| block.block_type == "text")
            .map(|block| block.text.as_str())
            .collect();

        if text.is_empty() {
            return Err(ExtractError::UnexpectedResponse(
                "response contained no text blocks".to_string(),
            ));
        }
        Ok(text)
    }
}

// Manual impl so the API key never ends up in debug or log output.
impl fmt::Debug for LlmExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmExtractor")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl ExtractionProvider for LlmExtractor {
    async fn extract(&self, markdown: &str) -> Result<String, ExtractError> {
        let url = format!("{}/v1/messages", self.base_url);
        let prompt = format!(
            "Consider the markdown attached. Extract the useful information \
             from it and return it as formatted markdown.\n\n{markdown}"
        );
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: DEFAULT_MAX_TOKENS,
            system: EXTRACTION_PROMPT,
            messages: vec![Message {
                role: "user",
                content: &prompt,
            }],
        };

        debug!("Sending extraction request, {} bytes of input", markdown.len());

        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.send(&url, &request).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_transient() && attempts < MAX_ATTEMPTS => {
                    warn!(
                        "Provider call failed (attempt {}/{}): {}",
                        attempts, MAX_ATTEMPTS, e
                    );
                    tokio::time::sleep(Duration::from_millis(RETRY_DELAY_MS * attempts as u64))
                        .await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

// ---- Messages API types ----

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn extractor_for(server_url: &str) -> LlmExtractor {
        LlmExtractor::from_config(&LlmConfig {
            base_url: server_url.to_string(),
            api_key: "test-key".to_string(),
            model: Some("test-model".to_string()),
            headers: Default::default(),
            ca_certs_path: None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_extract_returns_text_blocks() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "test-key")
            .match_header("anthropic-version", API_VERSION)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r###"{
                    "content": [
                        {"type": "text", "text": "## Extracted"},
                        {"type": "text", "text": "\ncontent"}
                    ]
                }"###,
            )
            .create_async()
            .await;

        let extractor = extractor_for(&server.url());
        let text = extractor.extract("# Raw page").await.unwrap();

        assert_eq!(text, "## Extracted\ncontent");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_definitive_rejection_is_not_retried() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .with_status(400)
            .with_body(r#"{"error": {"message": "prompt is too long"}}"#)
            .expect(1)
            .create_async()
            .await;

        let extractor = extractor_for(&server.url());
        let err = extractor.extract("huge page").await.unwrap_err();

        match err {
            ExtractError::Api { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("too long"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_transient_failure_retries_up_to_limit() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .with_status(503)
            .with_body(r#"{"error": {"message": "overloaded"}}"#)
            .expect(3)
            .create_async()
            .await;

        let extractor = extractor_for(&server.url());
        let err = extractor.extract("page").await.unwrap_err();

        assert!(matches!(err, ExtractError::Api { status: 503, .. }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_content_is_unexpected() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"content": []}"#)
            .create_async()
            .await;

        let extractor = extractor_for(&server.url());
        let err = extractor.extract("page").await.unwrap_err();

        assert!(matches!(err, ExtractError::UnexpectedResponse(_)));
    }

    #[test]
    fn test_debug_output_redacts_api_key() {
        let extractor = extractor_for("https://llm.internal");
        let debug = format!("{extractor:?}");

        assert!(!debug.contains("test-key"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_invalid_header_name_is_rejected() {
        let mut headers = std::collections::HashMap::new();
        headers.insert("bad header".to_string(), "value".to_string());

        let err = LlmExtractor::from_config(&LlmConfig {
            base_url: "https://llm.internal".to_string(),
            api_key: "k".to_string(),
            model: None,
            headers,
            ca_certs_path: None,
        })
        .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidHeader(_)));
    }
}

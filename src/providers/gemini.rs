//! Gemini `generateContent` provider
//!
//! Sends a single-turn request and pulls the first candidate's first
//! text part out of the response. A well-formed response without that
//! path, or with blank text there, yields the fallback reply
//! `"No response"`.

use crate::config::ProviderConfig;
use crate::error::{ChatkeepError, Result};
use crate::providers::Provider;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reply used when the response carries no candidate text
pub const NO_RESPONSE_TEXT: &str = "No response";

/// Gemini API provider
///
/// # Examples
///
/// ```no_run
/// use chatkeep::config::ProviderConfig;
/// use chatkeep::providers::{GeminiProvider, Provider};
///
/// # async fn example() -> chatkeep::error::Result<()> {
/// let provider = GeminiProvider::new(ProviderConfig::default())?;
/// let reply = provider.generate("Hello!").await?;
/// # Ok(())
/// # }
/// ```
pub struct GeminiProvider {
    client: Client,
    config: ProviderConfig,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl<'a> GenerateRequest<'a> {
    fn single(prompt: &'a str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        }
    }
}

impl GenerateResponse {
    fn into_reply(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| NO_RESPONSE_TEXT.to_string())
    }
}

impl GeminiProvider {
    /// Create a new provider
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use chatkeep::config::ProviderConfig;
    /// use chatkeep::providers::GeminiProvider;
    ///
    /// let provider = GeminiProvider::new(ProviderConfig::default());
    /// assert!(provider.is_ok());
    /// ```
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("chatkeep/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ChatkeepError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Gemini provider: api_base={}, model={}",
            config.api_base,
            config.model
        );
        if config.api_key.is_none() {
            tracing::warn!("No API key configured; requests will be sent unauthenticated");
        }

        Ok(Self { client, config })
    }

    /// Full `generateContent` URL for the configured model
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = self.endpoint();
        tracing::debug!("Sending generateContent request to {}", url);

        let mut request = self.client.post(&url).json(&GenerateRequest::single(prompt));
        if let Some(key) = &self.config.api_key {
            request = request.header("x-goog-api-key", key);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!("generateContent request failed: {}", e);
            ChatkeepError::Provider(format!("Failed to reach API: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("API returned error {}: {}", status, error_text);
            return Err(ChatkeepError::Provider(format!(
                "API returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse generateContent response: {}", e);
            ChatkeepError::Provider(format!("Failed to parse API response: {}", e))
        })?;

        Ok(body.into_reply())
    }

    fn model(&self) -> String {
        self.config.model.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(api_base: &str) -> ProviderConfig {
        ProviderConfig {
            api_base: api_base.to_string(),
            model: "gemini-test".to_string(),
            api_key: None,
            timeout_seconds: 5,
        }
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(GenerateRequest::single("Hi there")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "contents": [ { "parts": [ { "text": "Hi there" } ] } ] })
        );
    }

    #[test]
    fn test_reply_from_first_candidate() {
        let json = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "first" }, { "text": "second" } ] } },
                { "content": { "parts": [ { "text": "other" } ] } }
            ]
        }"#;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.into_reply(), "first");
    }

    #[test]
    fn test_reply_missing_path_is_no_response() {
        for json in [
            r#"{}"#,
            r#"{ "candidates": [] }"#,
            r#"{ "candidates": [ {} ] }"#,
            r#"{ "candidates": [ { "content": { "parts": [] } } ] }"#,
            r#"{ "candidates": [ { "content": { "parts": [ {} ] } } ] }"#,
            r#"{ "candidates": [ { "content": { "parts": [ { "text": "" } ] } } ] }"#,
            r#"{ "candidates": [ { "content": { "parts": [ { "text": "  \n" } ] } } ] }"#,
        ] {
            let response: GenerateResponse = serde_json::from_str(json).unwrap();
            assert_eq!(response.into_reply(), NO_RESPONSE_TEXT, "body: {}", json);
        }
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let provider = GeminiProvider::new(test_config("http://localhost:9999/")).unwrap();
        assert_eq!(
            provider.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_model_reports_configured_model() {
        let provider = GeminiProvider::new(test_config("http://localhost:9999")).unwrap();
        assert_eq!(provider.model(), "gemini-test");
    }
}

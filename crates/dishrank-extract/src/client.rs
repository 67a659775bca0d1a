//! HTTP client for the `generateContent`-style extraction endpoint.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use dishrank_core::{Mention, Review};

use crate::error::ExtractError;
use crate::parse::parse_mentions;
use crate::prompt::extraction_prompt;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Client for the text-understanding capability.
///
/// One [`ExtractClient::extract`] call per review. Use
/// [`ExtractClient::with_base_url`] to point at a mock server in tests.
pub struct ExtractClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Deserialize)]
struct ResponseCandidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl ExtractClient {
    /// Creates a new client pointed at the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, ExtractError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ExtractError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("dishrank/0.1 (dish-extraction)")
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Extracts dish mentions from one review.
    ///
    /// A review with no identifiable items returns an empty vector. Returned
    /// mentions carry the review's id and sentiment clamped to `[0.0, 1.0]`.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::Http`] on network failure.
    /// - [`ExtractError::Api`] on a non-2xx status or a response with no
    ///   usable text.
    /// - [`ExtractError::Parse`] if the model output holds no JSON array.
    pub async fn extract(&self, review: &Review) -> Result<Vec<Mention>, ExtractError> {
        let prompt = extraction_prompt(&review.text);
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: &prompt }],
            }],
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExtractError::Api(format!(
                "extract endpoint returned status {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| ExtractError::Parse {
                context: "generateContent response".to_string(),
                source: e,
            })?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ExtractError::Api("model returned no text".to_string()));
        }

        let mentions = parse_mentions(&text, &review.id)?;
        tracing::debug!(
            review_id = %review.id,
            mentions = mentions.len(),
            "extracted mentions"
        );
        Ok(mentions)
    }
}

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::domain::{AdvisorClient, AppError, ExternalServiceError};

use super::{HttpClientConfig, decode, transport_error};

const SERVICE: &str = "gemini";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content
            .parts
            .into_iter()
            .next()?
            .text
    }
}

/// Gemini `generateContent` client; the key is sent as the `key` query parameter.
pub struct GeminiClient {
    http_client: Client,
    url: String,
    api_key: SecretString,
}

impl GeminiClient {
    pub fn new(url: &str, api_key: SecretString, config: &HttpClientConfig) -> Result<Self, AppError> {
        let http_client = config.build()?;
        info!(url = %url, "Created Gemini client");
        Ok(Self {
            http_client,
            url: url.to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl AdvisorClient for GeminiClient {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, AppError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                max_output_tokens: 256,
            },
        };
        let response = self
            .http_client
            .post(&self.url)
            .query(&[("key", self.api_key.expose_secret())])
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e.without_url()))?;
        let body: GenerateResponse = decode(SERVICE, response).await?;
        body.into_text().ok_or_else(|| {
            AppError::ExternalService(ExternalServiceError::InvalidResponse(
                "gemini: reply has no text candidate".to_string(),
            ))
        })
    }
}

//! Hosted model client for response generation
//!
//! Single attempt per turn: no retries and no timeout override beyond the
//! transport default. A failed turn is reported and the user resubmits.

use crate::config::GenerationConfig;
use crate::error::{Result, ResumeCoachError};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub trait CompletionModel {
    /// Credential presence check. Must pass before any network I/O so a
    /// misconfigured session fails without touching the wire.
    fn ensure_configured(&self) -> Result<()>;

    fn complete(&self, prompt: &str) -> impl std::future::Future<Output = Result<String>> + Send;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationOptions,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationOptions {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

pub struct GeminiClient {
    client: Client,
    config: GenerationConfig,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(config: GenerationConfig, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            config,
            api_key,
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

impl CompletionModel for GeminiClient {
    fn ensure_configured(&self) -> Result<()> {
        match &self.api_key {
            Some(_) => Ok(()),
            None => Err(ResumeCoachError::Configuration(format!(
                "{} is missing from the environment",
                self.config.api_key_env
            ))),
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.ensure_configured()?;
        let api_key = self.api_key.as_deref().unwrap_or_default();

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.api_url, self.config.model
        );
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationOptions {
                max_output_tokens: self.config.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ResumeCoachError::Generation(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ResumeCoachError::Generation(format!(
                "status {}: {}",
                status.as_u16(),
                message
            )));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ResumeCoachError::Generation(e.to_string()))?;

        let text = extract_text(&generated);
        if text.trim().is_empty() {
            return Err(ResumeCoachError::EmptyCompletion);
        }

        debug!("Generation succeeded: {} chars", text.len());
        Ok(text)
    }
}

/// Concatenate the text parts of the first candidate, if any.
fn extract_text(response: &GenerateResponse) -> String {
    response
        .candidates
        .as_deref()
        .and_then(|c| c.first())
        .and_then(|c| c.content.as_ref())
        .and_then(|c| c.parts.as_deref())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

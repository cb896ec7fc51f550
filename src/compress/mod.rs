//! Job description compression via the ScaleDown service
//!
//! Compression is an optimization, not a correctness requirement: every
//! failure path degrades to the original text plus a status the user can
//! read. Nothing in this module returns an error.

use crate::config::CompressionConfig;
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one compression attempt. `text` is always usable; `status`
/// says whether and how much compression actually happened.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionOutcome {
    pub text: String,
    pub status: CompressionStatus,
}

/// Tagged status instead of a bare string so callers can branch on kind;
/// `Display` produces the user-facing wording.
#[derive(Debug, Clone, PartialEq)]
pub enum CompressionStatus {
    Applied { savings_percent: Option<f32> },
    SkippedMissingCredential { key_env: String },
    ArgumentsMismatch,
    SkippedError,
}

impl fmt::Display for CompressionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionStatus::Applied {
                savings_percent: Some(p),
            } => write!(f, "ScaleDown: {:.0}% saved", p),
            CompressionStatus::Applied {
                savings_percent: None,
            } => write!(f, "ScaleDown: Compression Active"),
            CompressionStatus::SkippedMissingCredential { key_env } => {
                write!(f, "Skipped (Missing {})", key_env)
            }
            CompressionStatus::ArgumentsMismatch => {
                write!(f, "Compression Error: Arguments mismatch")
            }
            CompressionStatus::SkippedError => write!(f, "ScaleDown Skipped (Check Logs)"),
        }
    }
}

pub trait ContextCompressor {
    /// Infallible by contract: degraded outcomes carry the input text
    /// unchanged.
    fn compress(&self, text: &str) -> impl std::future::Future<Output = CompressionOutcome> + Send;
}

#[derive(Serialize)]
struct CompressRequest<'a> {
    context: &'a str,
    prompt: &'a str,
    target_model: &'a str,
    ratio: f32,
}

/// The service's actual return shape is adapted here, once. Call sites
/// only ever see `CompressionOutcome`.
#[derive(Deserialize)]
struct CompressResponse {
    content: Option<String>,
    savings_percent: Option<f32>,
}

pub struct ScaleDownClient {
    client: Client,
    config: CompressionConfig,
    api_key: Option<String>,
    /// Model id the compressed text is destined for, forwarded so the
    /// service can count tokens with the right tokenizer.
    target_model: String,
}

impl ScaleDownClient {
    pub fn new(config: CompressionConfig, api_key: Option<String>, target_model: String) -> Self {
        Self {
            client: Client::new(),
            config,
            api_key,
            target_model,
        }
    }

    fn degraded(&self, text: &str, status: CompressionStatus) -> CompressionOutcome {
        CompressionOutcome {
            text: text.to_string(),
            status,
        }
    }
}

impl ContextCompressor for ScaleDownClient {
    async fn compress(&self, text: &str) -> CompressionOutcome {
        let api_key = match &self.api_key {
            Some(key) => key,
            None => {
                return self.degraded(
                    text,
                    CompressionStatus::SkippedMissingCredential {
                        key_env: self.config.api_key_env.clone(),
                    },
                );
            }
        };

        let request = CompressRequest {
            context: text,
            prompt: &self.config.preserve_prompt,
            target_model: &self.target_model,
            ratio: self.config.target_ratio,
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("x-api-key", api_key)
            .json(&request)
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                warn!("Compression request failed: {}", e);
                return self.degraded(text, CompressionStatus::SkippedError);
            }
        };

        let status = response.status();
        if status == reqwest::StatusCode::BAD_REQUEST
            || status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
        {
            let body = response.text().await.unwrap_or_default();
            warn!("Compression arguments rejected ({}): {}", status, body);
            return self.degraded(text, CompressionStatus::ArgumentsMismatch);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Compression service returned {}: {}", status, body);
            return self.degraded(text, CompressionStatus::SkippedError);
        }

        match response.json::<CompressResponse>().await {
            Ok(CompressResponse {
                content: Some(compressed),
                savings_percent,
            }) if !compressed.trim().is_empty() => {
                debug!(
                    "Compressed job description: {} -> {} chars",
                    text.len(),
                    compressed.len()
                );
                CompressionOutcome {
                    text: compressed,
                    status: CompressionStatus::Applied { savings_percent },
                }
            }
            Ok(_) => {
                warn!("Compression service returned no content");
                self.degraded(text, CompressionStatus::SkippedError)
            }
            Err(e) => {
                warn!("Failed to parse compression response: {}", e);
                self.degraded(text, CompressionStatus::SkippedError)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn client_without_key() -> ScaleDownClient {
        let config = Config::default();
        ScaleDownClient::new(config.compression, None, "gemini-2.5-flash".to_string())
    }

    #[tokio::test]
    async fn test_missing_credential_passes_text_through() {
        let client = client_without_key();
        let outcome = client.compress("A very long job description").await;

        assert_eq!(outcome.text, "A very long job description");
        assert_eq!(
            outcome.status,
            CompressionStatus::SkippedMissingCredential {
                key_env: "SCALEDOWN_API_KEY".to_string()
            }
        );
    }

    #[test]
    fn test_degraded_statuses_are_distinct_and_non_empty() {
        let statuses = [
            CompressionStatus::SkippedMissingCredential {
                key_env: "SCALEDOWN_API_KEY".to_string(),
            },
            CompressionStatus::ArgumentsMismatch,
            CompressionStatus::SkippedError,
        ];

        let rendered: Vec<String> = statuses.iter().map(|s| s.to_string()).collect();
        for text in &rendered {
            assert!(!text.is_empty());
        }
        assert_ne!(rendered[0], rendered[1]);
        assert_ne!(rendered[1], rendered[2]);
        assert_ne!(rendered[0], rendered[2]);
    }

    #[test]
    fn test_applied_status_wording() {
        let with_savings = CompressionStatus::Applied {
            savings_percent: Some(42.0),
        };
        assert_eq!(with_savings.to_string(), "ScaleDown: 42% saved");

        let without = CompressionStatus::Applied {
            savings_percent: None,
        };
        assert_eq!(without.to_string(), "ScaleDown: Compression Active");
    }
}

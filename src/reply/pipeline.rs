use super::decoder::{ReplyDecoder, RequestShape};
use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Reply rendered when every attempt against the inference service fails
pub const UNREACHABLE_REPLY: &str = "Error: Unable to reach AI model.";

/// Configuration for the inference endpoint and retry policy
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Inference service URL (POST target)
    pub url: String,

    /// Request body shape the service expects
    pub request_shape: RequestShape,

    /// Response-shape rule for extracting the reply
    pub decoder: ReplyDecoder,

    /// `max_length` passed in nested-shape request bodies
    pub max_length: u32,

    /// Attempt ceiling (total calls, not retries)
    pub max_attempts: u32,

    /// Base backoff delay; attempt N waits N x this before retrying
    pub backoff: Duration,

    /// Per-request timeout on the HTTP client
    pub request_timeout: Duration,

    /// Reply substituted when a well-formed response has an unexpected shape
    pub fallback_reply: String,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            url: "https://api-inference.huggingface.co/models/facebook/blenderbot-400M-distill"
                .to_string(),
            request_shape: RequestShape::Plain,
            decoder: ReplyDecoder::GeneratedText,
            max_length: 100,
            max_attempts: 2,
            backoff: Duration::from_millis(500),
            request_timeout: Duration::from_secs(30),
            fallback_reply: "Sorry, I didn't understand.".to_string(),
        }
    }
}

/// The request-retry-extract sequence converting user text into a bot reply
pub struct ReplyPipeline {
    client: Client,
    config: InferenceConfig,
}

impl ReplyPipeline {
    pub fn new(config: InferenceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build inference HTTP client")?;

        Ok(Self { client, config })
    }

    /// Produce exactly one reply for the given non-empty text
    ///
    /// Never fails: exhausted retries collapse into [`UNREACHABLE_REPLY`],
    /// and an unexpected response shape collapses into the configured
    /// fallback string. Non-2xx status, transport failure, and malformed
    /// JSON are treated identically.
    pub async fn reply(&self, text: &str) -> String {
        for attempt in 1..=self.config.max_attempts {
            match self.attempt(text).await {
                Ok(reply) => {
                    debug!("Inference succeeded on attempt {}", attempt);
                    return reply;
                }
                Err(e) => {
                    warn!(
                        "Inference attempt {}/{} failed: {:#}",
                        attempt, self.config.max_attempts, e
                    );
                    if attempt < self.config.max_attempts {
                        // Linear backoff: attempt index times the base delay.
                        // Suspends only this pipeline, not the caller's loop.
                        tokio::time::sleep(self.config.backoff * attempt).await;
                    }
                }
            }
        }

        warn!(
            "Inference unreachable after {} attempts, rendering error reply",
            self.config.max_attempts
        );
        UNREACHABLE_REPLY.to_string()
    }

    /// One POST + decode against the inference service
    async fn attempt(&self, text: &str) -> Result<String> {
        let body = self.config.request_shape.body(text, self.config.max_length);

        let response = self
            .client
            .post(&self.config.url)
            .json(&body)
            .send()
            .await
            .context("Inference request failed")?
            .error_for_status()
            .context("Inference service returned an error status")?;

        let payload: Value = response
            .json()
            .await
            .context("Inference response was not valid JSON")?;

        Ok(self
            .config
            .decoder
            .decode(&payload)
            .unwrap_or_else(|| self.config.fallback_reply.clone()))
    }
}

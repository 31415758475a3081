use crate::reply::{InferenceConfig, ReplyDecoder, RequestShape};
use crate::speech::{RecognizerConfig, SpeechSource};
use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub inference: InferenceSettings,
    pub speech: SpeechSettings,
    #[serde(default)]
    pub chat: ChatSettings,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

/// Inference endpoint settings
///
/// The target service and its decode rule vary, so both are configuration
/// rather than hard-coded: `provider` picks the response-shape rule,
/// `request_shape` the body layout.
#[derive(Debug, Deserialize)]
pub struct InferenceSettings {
    pub url: String,
    pub provider: ReplyDecoder,
    pub request_shape: RequestShape,
    pub max_length: u32,
    pub max_attempts: u32,
    pub backoff_ms: u64,
    pub timeout_secs: u64,
    pub fallback_reply: String,
}

#[derive(Debug, Deserialize)]
pub struct SpeechSettings {
    /// "native" or "fixture"
    pub backend: String,
    /// Transcript file for the fixture backend
    pub fixture_path: Option<PathBuf>,
    /// BCP-47 language tag for recognition
    pub language: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatSettings {
    /// Bot greeting seeded into every new transcript
    pub greeting: Option<String>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Reply pipeline configuration from the `[inference]` section
    pub fn inference_config(&self) -> InferenceConfig {
        InferenceConfig {
            url: self.inference.url.clone(),
            request_shape: self.inference.request_shape,
            decoder: self.inference.provider,
            max_length: self.inference.max_length,
            max_attempts: self.inference.max_attempts,
            backoff: Duration::from_millis(self.inference.backoff_ms),
            request_timeout: Duration::from_secs(self.inference.timeout_secs),
            fallback_reply: self.inference.fallback_reply.clone(),
        }
    }

    /// Voice input source from the `[speech]` section
    pub fn speech_source(&self) -> Result<SpeechSource> {
        match self.speech.backend.as_str() {
            "native" => Ok(SpeechSource::Native),
            "fixture" => {
                let path = self.speech.fixture_path.clone().ok_or_else(|| {
                    anyhow::anyhow!("speech.backend = \"fixture\" requires speech.fixture_path")
                })?;
                Ok(SpeechSource::Fixture(path))
            }
            other => anyhow::bail!("Unknown speech backend: {}", other),
        }
    }

    /// Recognition session settings from the `[speech]` section
    pub fn recognizer_config(&self) -> RecognizerConfig {
        RecognizerConfig {
            language: self.speech.language.clone(),
            ..RecognizerConfig::default()
        }
    }
}

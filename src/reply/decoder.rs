use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// JSON body shape the target inference service expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestShape {
    /// `{"inputs": <text>}`
    Plain,
    /// `{"inputs": {"text": <text>, "max_length": N}}`
    Nested,
}

impl RequestShape {
    /// Serialize user text into the request body for this shape
    pub fn body(&self, text: &str, max_length: u32) -> Value {
        match self {
            RequestShape::Plain => json!({ "inputs": text }),
            RequestShape::Nested => json!({
                "inputs": { "text": text, "max_length": max_length }
            }),
        }
    }
}

/// Provider-keyed rule for extracting the reply from a response body
///
/// Inference services disagree on where the generated text lives, so the
/// decode rule is injected configuration rather than hard-coded. A shape
/// mismatch yields `None`, never an error; the pipeline substitutes its
/// fallback string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyDecoder {
    /// Top-level object with a `generated_text` field
    GeneratedText,
    /// Array whose first element carries a `generated_text` field
    FirstGeneratedText,
}

impl ReplyDecoder {
    /// Extract a normalized reply string, or `None` if the shape doesn't match
    pub fn decode(&self, body: &Value) -> Option<String> {
        match self {
            ReplyDecoder::GeneratedText => body.get("generated_text"),
            ReplyDecoder::FirstGeneratedText => body.as_array()?.first()?.get("generated_text"),
        }
        .and_then(Value::as_str)
        .map(str::to_string)
    }
}

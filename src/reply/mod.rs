//! Reply pipeline: converts user text into exactly one bot reply
//!
//! The pipeline POSTs the text to a remote text-generation endpoint, retries
//! transport/status/parse failures up to a fixed ceiling with a linearly
//! increasing backoff, and extracts the reply with a provider-keyed shape
//! rule. Every failure mode collapses into the same terminal behavior: a
//! fixed human-readable error string rendered as the reply. The pipeline
//! therefore never yields zero replies and never more than one.

mod decoder;
mod pipeline;

pub use decoder::{ReplyDecoder, RequestShape};
pub use pipeline::{InferenceConfig, ReplyPipeline, UNREACHABLE_REPLY};

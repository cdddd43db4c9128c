//! Server-side reply pipeline: sanitize, prompt, complete, filter.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::CompletionError;
use crate::filter::filter_reply;
use crate::prompt::{GenerationParams, PromptEnvelope};
use crate::sanitize::SanitizedInput;

/// Returned when the remote model could not be reached or refused the call.
pub const TRANSPORT_FALLBACK: &str = "Sorry, there was an error processing your request.";
/// Returned when the remote model answered without any generated text.
pub const NO_RESPONSE_FALLBACK: &str = "Sorry, no relevant response generated.";

/// Opaque remote text-completion function.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, CompletionError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Model,
    TransportFallback,
    NoResponseFallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyOutcome {
    pub reply: String,
    pub source: ReplySource,
}

impl ReplyOutcome {
    fn fallback(err: &CompletionError) -> Self {
        if err.is_transport() {
            Self {
                reply: TRANSPORT_FALLBACK.to_string(),
                source: ReplySource::TransportFallback,
            }
        } else {
            Self {
                reply: NO_RESPONSE_FALLBACK.to_string(),
                source: ReplySource::NoResponseFallback,
            }
        }
    }
}

/// Stateless per request; clones share the backend.
#[derive(Clone)]
pub struct ReplyPipeline {
    backend: Arc<dyn CompletionBackend>,
    params: GenerationParams,
}

impl ReplyPipeline {
    pub fn new(backend: Arc<dyn CompletionBackend>, params: GenerationParams) -> Self {
        Self { backend, params }
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Produce the reply for one raw user message. Never fails: every backend
    /// error is logged and replaced by a fallback sentence.
    pub async fn reply(&self, raw_text: &str) -> ReplyOutcome {
        let input = SanitizedInput::new(raw_text);
        let envelope = PromptEnvelope::wrap(&input);

        tracing::debug!(
            input_len = input.as_str().len(),
            temperature = self.params.temperature,
            max_new_tokens = self.params.max_new_tokens,
            "Requesting completion"
        );

        match self.backend.complete(envelope.as_str(), &self.params).await {
            Ok(raw) => {
                let reply = filter_reply(&raw, &input);
                tracing::debug!(raw = %raw, reply = %reply, "Completion filtered");
                ReplyOutcome {
                    reply,
                    source: ReplySource::Model,
                }
            }
            Err(err) => {
                if err.is_transport() {
                    tracing::error!(error = %err, "Error fetching completion");
                } else {
                    tracing::warn!(error = %err, "Completion had no usable text");
                }
                ReplyOutcome::fallback(&err)
            }
        }
    }
}

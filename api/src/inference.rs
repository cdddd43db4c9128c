//! Client for the hosted text-generation endpoint.

use async_trait::async_trait;
use chatrelay_core::error::CompletionError;
use chatrelay_core::pipeline::CompletionBackend;
use chatrelay_core::prompt::GenerationParams;
use serde::Serialize;

use crate::config::ServerConfig;

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: &'a GenerationParams,
}

pub struct HuggingFaceClient {
    http: reqwest::Client,
    model_url: String,
    api_key: String,
}

impl HuggingFaceClient {
    pub fn new(config: &ServerConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.upstream_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            model_url: config.model_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> CompletionError {
    if err.is_timeout() {
        CompletionError::Timeout
    } else {
        // without_url keeps the model endpoint out of the message
        CompletionError::Transport(err.without_url().to_string())
    }
}

/// Pull the first element's `generated_text` out of a provider response.
///
/// Anything other than a non-empty array whose first object carries a
/// non-empty string is treated as malformed.
pub fn extract_generated_text(body: &serde_json::Value) -> Result<String, CompletionError> {
    body.as_array()
        .and_then(|items| items.first())
        .and_then(|first| first.get("generated_text"))
        .and_then(serde_json::Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .ok_or(CompletionError::Malformed)
}

#[async_trait]
impl CompletionBackend for HuggingFaceClient {
    async fn complete(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, CompletionError> {
        let response = self
            .http
            .post(&self.model_url)
            .bearer_auth(&self.api_key)
            .json(&GenerationRequest {
                inputs: prompt,
                parameters: params,
            })
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                status = %status,
                "Inference request returned non-success status"
            );
            return Err(CompletionError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        let body: serde_json::Value = match serde_json::from_slice(&bytes) {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(error = %err, "Inference response is not JSON");
                return Err(CompletionError::Malformed);
            }
        };
        tracing::debug!(response = %body, "Inference response");

        extract_generated_text(&body)
    }
}

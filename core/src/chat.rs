use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatRequest {
    /// Raw user text, exactly as typed (trimmed by the client)
    pub message: String,
}

/// Successful response of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatReply {
    /// Filtered model output, or a fixed fallback sentence
    pub reply: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

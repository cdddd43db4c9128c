use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chatrelay_core::chat::{ChatReply, ChatRequest};

use crate::error::AppError;
use crate::extract::AppJson;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/chat", post(chat))
}

/// Send one message to the model and get the filtered reply
///
/// Each call is independent; no conversation history is kept. Upstream
/// failures still answer 200 with a fixed fallback reply. A 500 with a
/// plain-text body means the request itself could not be handled.
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Model reply or fallback sentence", body = ChatReply),
        (status = 500, description = "Request could not be handled", body = String, content_type = "text/plain")
    ),
    tag = "chat"
)]
pub async fn chat(
    State(state): State<AppState>,
    AppJson(req): AppJson<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let outcome = state.pipeline.reply(&req.message).await;

    tracing::info!(
        source = ?outcome.source,
        reply_len = outcome.reply.len(),
        "Chat reply produced"
    );

    Ok(Json(ChatReply {
        reply: outcome.reply,
    }))
}

use axum::{Json, Router, routing::get};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "chatrelay API",
        version = "0.1.0",
        description = "Relays chat messages to a hosted language model and returns a filtered reply."
    ),
    paths(
        super::health::health_check,
        super::chat::chat,
    ),
    components(schemas(
        chatrelay_core::chat::ChatRequest,
        chatrelay_core::chat::ChatReply,
        chatrelay_core::chat::HealthResponse,
    ))
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/api-doc/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Body sent for every handler-level fault. Detail goes to the log only.
pub const INTERNAL_ERROR_BODY: &str = "Internal Server Error";

/// Handler-level failure. Model-side errors never end up here: the reply
/// pipeline absorbs them into fallback replies.
#[derive(Debug)]
pub enum AppError {
    /// Request body could not be read as a chat request (500)
    InvalidBody(String),
    /// Internal error (500)
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InvalidBody(msg) => {
                tracing::error!("Error handling the request: invalid body: {}", msg);
            }
            AppError::Internal(msg) => {
                tracing::error!("Error handling the request: {}", msg);
            }
        }

        (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
    }
}

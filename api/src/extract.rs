//! Custom extractors that convert axum rejections to `AppError` responses.
//!
//! Use `AppJson<T>` instead of `axum::Json<T>` in handler signatures so a
//! malformed body takes the same plain-text 500 path as any other fault,
//! rather than axum's default 4xx rejection text.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};

use crate::error::AppError;

pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(map_json_rejection(rejection)),
        }
    }
}

pub fn map_json_rejection(rejection: JsonRejection) -> AppError {
    AppError::InvalidBody(format!(
        "{} ({})",
        rejection.body_text(),
        rejection.status()
    ))
}

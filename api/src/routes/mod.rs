pub mod chat;
pub mod health;
pub mod openapi;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::middleware;
use crate::state::AppState;

/// Full application router with the middleware stack applied.
pub fn app(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .merge(health::router())
        .merge(chat::router())
        .merge(openapi::router())
        .layer(axum::middleware::from_fn(middleware::security_headers::apply))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                // cors wraps the panic handler so its 500 stays readable cross-origin
                .layer(cors)
                .layer(CatchPanicLayer::custom(middleware::panic::handle_panic)),
        )
        .with_state(state)
}

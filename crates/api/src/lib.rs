//! HTTP API layer for quescheetah-rs.
//!
//! - **Endpoints**: `/vote/...` question, answer and response endpoints, `/api-keys/issue`
//! - **Extractors**: API key authentication
//! - **Middleware**: API key resolution, tracing, CORS
//!
//! Every endpoint is a JSON `POST`. Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use endpoints::router;
pub use middleware::AppState;

/// Build the full application: routes, API key resolution, tracing and CORS.
pub fn app(state: AppState) -> Router {
    router()
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

//! API endpoints.

mod answers;
mod api_keys;
mod multiple;
mod questions;
mod user_answers;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    let vote = Router::new()
        .merge(questions::router())
        .merge(answers::router())
        .merge(user_answers::router())
        .merge(multiple::router());

    Router::new()
        .nest("/vote", vote)
        .nest("/api-keys", api_keys::router())
}

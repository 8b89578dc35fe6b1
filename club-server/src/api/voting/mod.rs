//! Voting API 模块

mod handler;

use axum::{
    routing::{get, post},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/clubs", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}/voting", get(handler::status))
        .route("/{id}/voting/start", post(handler::start))
        .route("/{id}/voting/end", post(handler::end))
        .route("/{id}/suggestions", post(handler::suggest))
        .route("/{id}/suggestions/{sid}/vote", post(handler::vote))
}

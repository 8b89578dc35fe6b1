//! Club API 模块

mod handler;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/clubs", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/join", post(handler::join))
        .route("/{id}/leave", post(handler::leave))
        .route("/{id}/books", get(handler::history))
        // Current book transitions (admin only, enforced in handlers)
        .route("/{id}/current-book/select", post(handler::select_winner))
        .route("/{id}/current-book/complete", post(handler::complete_book))
        .route("/{id}/current-book/abandon", post(handler::abandon_book))
        // Admin override escape hatch, bypasses history
        .route(
            "/{id}/current-book",
            put(handler::override_set).delete(handler::override_clear),
        )
}

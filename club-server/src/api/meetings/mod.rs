//! Meeting API 模块

mod handler;

use axum::{
    routing::{get, post},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/clubs/{id}/meetings",
            get(handler::list_for_club).post(handler::create),
        )
        .route(
            "/meetings/{id}",
            get(handler::get_by_id).put(handler::update),
        )
        .route("/meetings/{id}/cancel", post(handler::cancel))
        .route("/meetings/{id}/rsvp", post(handler::rsvp))
        .route("/meetings/{id}/complete", post(handler::complete))
}

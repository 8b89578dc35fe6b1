//! Review API Handlers

use axum::{
    extract::{Path, State},
    Json,
};

use shared::models::{Review, ReviewCreate};

use crate::achievements::{self, ActivityKind};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{book, review};
use crate::utils::validation::{validate_required_text, MAX_NOTE_LEN};
use crate::utils::{AppError, AppResult};

/// GET /api/reviews/book/:book_id - 某本书的书评
pub async fn list_for_book(
    State(state): State<ServerState>,
    Path(book_id): Path<i64>,
) -> AppResult<Json<Vec<Review>>> {
    let reviews = review::find_by_book(&state.pool, book_id).await?;
    Ok(Json(reviews))
}

/// POST /api/reviews - 发表书评
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<ReviewCreate>,
) -> AppResult<Json<Review>> {
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::validation(format!(
            "rating must be between 1 and 5, got {}",
            payload.rating
        )));
    }
    validate_required_text(&payload.content, "content", MAX_NOTE_LEN)?;

    book::find_by_id(&state.pool, payload.book_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Book {} not found", payload.book_id)))?;

    let r = review::create(
        &state.pool,
        current_user.id,
        payload.book_id,
        payload.rating,
        &payload.content,
    )
    .await?;

    achievements::evaluate(
        &state.pool,
        state.config.timezone,
        current_user.id,
        Some(ActivityKind::ReviewCreated),
    )
    .await;

    Ok(Json(r))
}

//! Recommendation API Handlers

use axum::{extract::State, Json};

use shared::models::{Recommendation, RecommendationCreate};

use crate::achievements::{self, ActivityKind};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{book, recommendation, user};
use crate::utils::validation::{validate_optional_text, MAX_SHORT_TEXT_LEN};
use crate::utils::{AppError, AppResult};

/// GET /api/recommendations/received - 收到的荐书
pub async fn list_received(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Recommendation>>> {
    let recs = recommendation::find_received(&state.pool, current_user.id).await?;
    Ok(Json(recs))
}

/// POST /api/recommendations - 向朋友推荐一本书
///
/// 发送方与接收方都会触发一次成就评估。
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<RecommendationCreate>,
) -> AppResult<Json<Recommendation>> {
    validate_optional_text(&payload.message, "message", MAX_SHORT_TEXT_LEN)?;

    if payload.recipient_id == current_user.id {
        return Err(AppError::validation(
            "Cannot recommend a book to yourself".to_string(),
        ));
    }

    user::find_by_id(&state.pool, payload.recipient_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("User {} not found", payload.recipient_id))
        })?;
    book::find_by_id(&state.pool, payload.book_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Book {} not found", payload.book_id)))?;

    let rec = recommendation::create(
        &state.pool,
        current_user.id,
        payload.recipient_id,
        payload.book_id,
        payload.message.as_deref(),
    )
    .await?;

    let tz = state.config.timezone;
    achievements::evaluate(
        &state.pool,
        tz,
        current_user.id,
        Some(ActivityKind::RecommendationSent),
    )
    .await;
    achievements::evaluate(
        &state.pool,
        tz,
        payload.recipient_id,
        Some(ActivityKind::RecommendationReceived),
    )
    .await;

    Ok(Json(rec))
}

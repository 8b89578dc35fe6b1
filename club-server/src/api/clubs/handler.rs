//! Club API Handlers
//!
//! Every read of club state goes through the lazy voting-expiry check:
//! an elapsed cycle is ended (winners flagged) before the response is
//! built, so no client ever observes an expired-but-active cycle.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use shared::models::{
    AbandonBook, Club, ClubBook, ClubCreate, ClubDetail, ClubMembership, ClubSummary,
    CompleteBook, CurrentBookOverride, WinnerSelect,
};

use crate::achievements::{self, ActivityKind};
use crate::auth::{require_active_member, require_club_admin, CurrentUser};
use crate::core::ServerState;
use crate::db::repository::{book, club, club_book, membership, suggestion};
use crate::utils::validation::{
    validate_optional_text, validate_required_text, MAX_NAME_LEN, MAX_NOTE_LEN,
};
use crate::utils::{AppError, AppResult};
use crate::voting::{self, cycle};

/// Query params for listing clubs
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
}

fn default_limit() -> i32 {
    50
}

/// GET /api/clubs - 俱乐部列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<ClubSummary>>> {
    let clubs = club::find_all(&state.pool, query.limit, query.offset).await?;
    Ok(Json(clubs))
}

/// POST /api/clubs - 创建俱乐部 (创建者成为 OWNER)
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Json(payload): Json<ClubCreate>,
) -> AppResult<Json<Club>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let c = club::create(
        &state.pool,
        &payload.name,
        payload.description.as_deref(),
        current_user.id,
    )
    .await?;
    Ok(Json(c))
}

/// GET /api/clubs/:id - 俱乐部详情 (lazy expiry read boundary)
pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ClubDetail>> {
    let c = club::get(&state.pool, id).await?;
    let c = voting::resolve_expired_cycle(&state.pool, c, shared::util::now_millis()).await?;

    let member_count = membership::count_active(&state.pool, id).await?;
    let mine: Option<ClubMembership> = membership::find(&state.pool, id, current_user.id).await?;

    Ok(Json(ClubDetail {
        club: c,
        member_count,
        my_role: mine.as_ref().map(|m| m.role),
        my_status: mine.as_ref().map(|m| m.status),
    }))
}

/// POST /api/clubs/:id/join - 加入俱乐部
pub async fn join(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ClubMembership>> {
    club::get(&state.pool, id).await?;
    let m = membership::join(&state.pool, id, current_user.id).await?;

    achievements::evaluate(
        &state.pool,
        state.config.timezone,
        current_user.id,
        Some(ActivityKind::ClubJoined),
    )
    .await;

    Ok(Json(m))
}

/// POST /api/clubs/:id/leave - 退出俱乐部
pub async fn leave(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    membership::leave(&state.pool, id, current_user.id).await?;
    Ok(Json(true))
}

/// GET /api/clubs/:id/books - 阅读历史
pub async fn history(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<ClubBook>>> {
    require_active_member(&state.pool, id, current_user.id).await?;
    let books = club_book::find_history(&state.pool, id).await?;
    Ok(Json(books))
}

/// POST /api/clubs/:id/current-book/select - 选定获胜建议为当前阅读
pub async fn select_winner(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<WinnerSelect>,
) -> AppResult<Json<ClubBook>> {
    require_club_admin(&state.pool, id, current_user.id).await?;

    let s = suggestion::find_by_id(&state.pool, payload.suggestion_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Suggestion {} not found", payload.suggestion_id))
        })?;
    if s.club_id != id {
        return Err(AppError::validation(
            "Suggestion does not belong to this club".to_string(),
        ));
    }
    if !s.is_winner {
        return Err(AppError::business_rule(
            "Suggestion is not a winner of the last voting cycle".to_string(),
        ));
    }

    let cb = club_book::start(&state.pool, id, s.book_id).await?;
    Ok(Json(cb))
}

/// POST /api/clubs/:id/current-book/complete - 完成当前阅读
pub async fn complete_book(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<CompleteBook>,
) -> AppResult<Json<ClubBook>> {
    require_club_admin(&state.pool, id, current_user.id).await?;

    cycle::validate_rating(payload.rating).map_err(AppError::validation)?;
    validate_required_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    let cb = club_book::complete(&state.pool, id, payload.rating, &payload.notes).await?;
    Ok(Json(cb))
}

/// POST /api/clubs/:id/current-book/abandon - 放弃当前阅读
pub async fn abandon_book(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<AbandonBook>,
) -> AppResult<Json<ClubBook>> {
    require_club_admin(&state.pool, id, current_user.id).await?;

    cycle::validate_reason_code(payload.reason_code).map_err(AppError::validation)?;
    validate_required_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    let cb = club_book::abandon(&state.pool, id, payload.reason_code, &payload.notes).await?;
    Ok(Json(cb))
}

/// PUT /api/clubs/:id/current-book - 管理员直接设置当前书 (跳过历史)
pub async fn override_set(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<CurrentBookOverride>,
) -> AppResult<Json<Club>> {
    require_club_admin(&state.pool, id, current_user.id).await?;

    book::find_by_id(&state.pool, payload.book_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Book {} not found", payload.book_id)))?;

    let c = club::set_current_book_override(&state.pool, id, payload.book_id).await?;
    Ok(Json(c))
}

/// DELETE /api/clubs/:id/current-book - 管理员直接清除当前书 (跳过历史)
pub async fn override_clear(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Club>> {
    require_club_admin(&state.pool, id, current_user.id).await?;
    let c = club::clear_current_book_override(&state.pool, id).await?;
    Ok(Json(c))
}

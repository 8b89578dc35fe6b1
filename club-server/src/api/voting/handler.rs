//! Voting API Handlers
//!
//! Admin actions: start/end the cycle. Member actions: suggest and vote,
//! only while the window is open. The status read is a lazy-expiry
//! boundary like the club detail read.

use axum::{
    extract::{Path, State},
    Json,
};

use shared::models::{BookSuggestion, SuggestionCreate, VotingStart, VotingStatus};

use crate::auth::{require_active_member, require_club_admin, CurrentUser};
use crate::core::ServerState;
use crate::db::repository::{book, club, suggestion};
use crate::utils::time::DAY_MILLIS;
use crate::utils::{AppError, AppResult};
use crate::voting::{self, cycle};

/// GET /api/clubs/:id/voting - 投票状态 (lazy expiry read boundary)
pub async fn status(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<VotingStatus>> {
    require_active_member(&state.pool, id, current_user.id).await?;

    let now = shared::util::now_millis();
    let c = club::get(&state.pool, id).await?;
    let c = voting::resolve_expired_cycle(&state.pool, c, now).await?;

    let suggestions = suggestion::find_with_votes(&state.pool, id).await?;
    let winners: Vec<i64> = suggestions
        .iter()
        .filter(|s| s.is_winner)
        .map(|s| s.id)
        .collect();

    Ok(Json(VotingStatus {
        phase: cycle::phase(&c, !winners.is_empty(), now),
        voting_cycle_active: c.voting_cycle_active,
        voting_starts_at: c.voting_starts_at,
        voting_ends_at: c.voting_ends_at,
        suggestions,
        winners,
    }))
}

/// POST /api/clubs/:id/voting/start - 发起投票 (管理员)
pub async fn start(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<VotingStart>,
) -> AppResult<Json<VotingStatus>> {
    require_club_admin(&state.pool, id, current_user.id).await?;

    cycle::validate_duration_days(payload.duration_days).map_err(AppError::validation)?;

    let now = shared::util::now_millis();
    let starts_at = payload.starts_at.unwrap_or(now);
    if starts_at < now {
        return Err(AppError::validation(
            "starts_at must be now or in the future".to_string(),
        ));
    }
    let ends_at = starts_at + payload.duration_days * DAY_MILLIS;

    let c = club::start_voting(&state.pool, id, current_user.id, starts_at, ends_at).await?;
    let suggestions = suggestion::find_with_votes(&state.pool, id).await?;

    Ok(Json(VotingStatus {
        phase: cycle::phase(&c, false, now),
        voting_cycle_active: c.voting_cycle_active,
        voting_starts_at: c.voting_starts_at,
        voting_ends_at: c.voting_ends_at,
        suggestions,
        winners: Vec::new(),
    }))
}

/// POST /api/clubs/:id/voting/end - 提前结束投票 (管理员) → 获胜名单
pub async fn end(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<VotingStatus>> {
    require_club_admin(&state.pool, id, current_user.id).await?;

    let now = shared::util::now_millis();
    let (c, suggestions) = voting::end_cycle(&state.pool, id).await?;
    let winners: Vec<i64> = suggestions
        .iter()
        .filter(|s| s.is_winner)
        .map(|s| s.id)
        .collect();

    Ok(Json(VotingStatus {
        phase: cycle::phase(&c, !winners.is_empty(), now),
        voting_cycle_active: c.voting_cycle_active,
        voting_starts_at: c.voting_starts_at,
        voting_ends_at: c.voting_ends_at,
        suggestions,
        winners,
    }))
}

/// POST /api/clubs/:id/suggestions - 提名一本书 (成员，窗口期内)
pub async fn suggest(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<SuggestionCreate>,
) -> AppResult<Json<BookSuggestion>> {
    require_active_member(&state.pool, id, current_user.id).await?;

    let now = shared::util::now_millis();
    let c = club::get(&state.pool, id).await?;
    let c = voting::resolve_expired_cycle(&state.pool, c, now).await?;

    if !cycle::window_open(&c, now) {
        return Err(AppError::business_rule(
            "Voting window is not open".to_string(),
        ));
    }

    book::find_by_id(&state.pool, payload.book_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Book {} not found", payload.book_id)))?;

    let s = suggestion::create(&state.pool, id, payload.book_id, current_user.id).await?;
    Ok(Json(s))
}

/// POST /api/clubs/:id/suggestions/:sid/vote - 投票 (成员，窗口期内)
pub async fn vote(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path((id, sid)): Path<(i64, i64)>,
) -> AppResult<Json<bool>> {
    require_active_member(&state.pool, id, current_user.id).await?;

    let now = shared::util::now_millis();
    let c = club::get(&state.pool, id).await?;
    let c = voting::resolve_expired_cycle(&state.pool, c, now).await?;

    if !cycle::window_open(&c, now) {
        return Err(AppError::business_rule(
            "Voting window is not open".to_string(),
        ));
    }

    let s = suggestion::find_by_id(&state.pool, sid)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Suggestion {sid} not found")))?;
    if s.club_id != id {
        return Err(AppError::validation(
            "Suggestion does not belong to this club".to_string(),
        ));
    }

    suggestion::vote(&state.pool, sid, current_user.id).await?;
    Ok(Json(true))
}

//! Achievement API Handlers

use axum::{extract::State, Json};

use shared::models::{Achievement, UserAchievements};

use crate::achievements;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::achievement;
use crate::utils::AppResult;

/// GET /api/achievements - 成就定义列表
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Achievement>>> {
    let defs = achievement::find_active(&state.pool).await?;
    Ok(Json(defs))
}

/// GET /api/achievements/me - 我的成就 (earned + in_progress)
pub async fn mine(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<UserAchievements>> {
    let result = achievements::get_user_achievements(&state.pool, current_user.id).await?;
    Ok(Json(result))
}

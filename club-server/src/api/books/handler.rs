//! Book & Shelf API Handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use shared::models::{Book, BookCreate, UserBook};

use crate::achievements::{self, ActivityKind};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::book;
use crate::utils::validation::{validate_required_text, MAX_NAME_LEN, MAX_TITLE_LEN};
use crate::utils::{AppError, AppResult};

/// Query params for listing books
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

/// GET /api/books - 图书列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let books = book::find_all(&state.pool, query.limit, query.offset).await?;
    Ok(Json(books))
}

/// GET /api/books/:id - 单本图书
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Book>> {
    let b = book::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Book {id} not found")))?;
    Ok(Json(b))
}

/// POST /api/books - 添加图书
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<BookCreate>,
) -> AppResult<Json<Book>> {
    validate_required_text(&payload.title, "title", MAX_TITLE_LEN)?;
    validate_required_text(&payload.author, "author", MAX_NAME_LEN)?;

    let b = book::create(&state.pool, &payload.title, &payload.author).await?;
    Ok(Json(b))
}

/// POST /api/books/:id/finish - 标记读完
///
/// 成就评估在主操作成功后触发，评估失败绝不影响本次标记。
pub async fn finish(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<UserBook>> {
    book::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Book {id} not found")))?;

    let record = book::mark_finished(&state.pool, current_user.id, id).await?;

    achievements::evaluate(
        &state.pool,
        state.config.timezone,
        current_user.id,
        Some(ActivityKind::BookFinished),
    )
    .await;

    Ok(Json(record))
}

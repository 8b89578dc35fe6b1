//! Meeting API Handlers
//!
//! Completion validates everything — notes, attendance overrides, the
//! optional book-outcome bundle — before any write; the repository then
//! applies the whole thing in one transaction (no partial commit).

use axum::{
    extract::{Path, State},
    Json,
};

use shared::models::{
    BookOutcome, ClubBookStatus, ClubMeeting, CompleteMeeting, MeetingAttendee, MeetingCreate,
    MeetingDetail, MeetingStatus, MeetingType, MeetingUpdate, RsvpRequest, RsvpStatus,
};

use crate::auth::{require_active_member, require_club_admin, CurrentUser};
use crate::core::ServerState;
use crate::db::repository::{club, meeting};
use crate::meetings::attendance;
use crate::utils::validation::{
    validate_optional_text, validate_required_text, MAX_NAME_LEN, MAX_NOTE_LEN,
    MAX_SHORT_TEXT_LEN,
};
use crate::utils::{AppError, AppResult};
use crate::voting::cycle;

/// GET /api/clubs/:id/meetings - 俱乐部会议列表
pub async fn list_for_club(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<ClubMeeting>>> {
    require_active_member(&state.pool, id, current_user.id).await?;
    let meetings = meeting::find_by_club(&state.pool, id).await?;
    Ok(Json(meetings))
}

/// POST /api/clubs/:id/meetings - 创建会议 (管理员)
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<MeetingCreate>,
) -> AppResult<Json<ClubMeeting>> {
    require_club_admin(&state.pool, id, current_user.id).await?;

    validate_required_text(&payload.title, "title", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.location, "location", MAX_SHORT_TEXT_LEN)?;

    let m = meeting::create(&state.pool, id, current_user.id, &payload).await?;
    Ok(Json(m))
}

/// GET /api/meetings/:id - 会议详情 (含参会名单)
pub async fn get_by_id(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MeetingDetail>> {
    let m = meeting::get(&state.pool, id).await?;
    require_active_member(&state.pool, m.club_id, current_user.id).await?;

    let attendees: Vec<MeetingAttendee> = meeting::find_attendees(&state.pool, id).await?;
    Ok(Json(MeetingDetail {
        meeting: m,
        attendees,
    }))
}

/// PUT /api/meetings/:id - 编辑会议 (管理员，仅 SCHEDULED)
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<MeetingUpdate>,
) -> AppResult<Json<ClubMeeting>> {
    let m = meeting::get(&state.pool, id).await?;
    require_club_admin(&state.pool, m.club_id, current_user.id).await?;

    if let Some(title) = &payload.title {
        validate_required_text(title, "title", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.location, "location", MAX_SHORT_TEXT_LEN)?;

    let m = meeting::update(&state.pool, id, &payload).await?;
    Ok(Json(m))
}

/// POST /api/meetings/:id/cancel - 取消会议 (管理员，不可逆)
pub async fn cancel(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ClubMeeting>> {
    let m = meeting::get(&state.pool, id).await?;
    require_club_admin(&state.pool, m.club_id, current_user.id).await?;

    let m = meeting::cancel(&state.pool, id).await?;
    Ok(Json(m))
}

/// POST /api/meetings/:id/rsvp - 自助 RSVP (成员)
pub async fn rsvp(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<RsvpRequest>,
) -> AppResult<Json<MeetingAttendee>> {
    let m = meeting::get(&state.pool, id).await?;
    require_active_member(&state.pool, m.club_id, current_user.id).await?;

    // NOT_RESPONDED is the default state, not a selectable answer
    if payload.status == RsvpStatus::NotResponded {
        return Err(AppError::validation(
            "RSVP status must be ATTENDING, MAYBE or NOT_ATTENDING".to_string(),
        ));
    }

    let a = meeting::rsvp(&state.pool, id, current_user.id, payload.status).await?;
    Ok(Json(a))
}

/// POST /api/meetings/:id/complete - 完成会议 (管理员)
///
/// 出席标记由 RSVP 预填，管理员可覆盖任意成员；仅 DISCUSSION 会议且
/// 会议书目等于当前阅读时才接受 book_outcome。
pub async fn complete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<CompleteMeeting>,
) -> AppResult<Json<MeetingDetail>> {
    let m = meeting::get(&state.pool, id).await?;
    require_club_admin(&state.pool, m.club_id, current_user.id).await?;

    if m.status != MeetingStatus::Scheduled {
        return Err(AppError::business_rule(
            "Meeting is already completed or cancelled".to_string(),
        ));
    }

    validate_required_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    if let Some(outcome) = &payload.book_outcome {
        validate_book_outcome(&state, &m, outcome).await?;
    }

    let attendees = meeting::find_attendees(&state.pool, id).await?;
    let marks = attendance::seed_attendance(&attendees, &payload.attendance);

    let m = meeting::complete(
        &state.pool,
        id,
        m.club_id,
        &payload.notes,
        &marks,
        payload.book_outcome.as_ref(),
    )
    .await?;

    let attendees = meeting::find_attendees(&state.pool, id).await?;
    Ok(Json(MeetingDetail {
        meeting: m,
        attendees,
    }))
}

/// The book-outcome bundle is only valid for a DISCUSSION meeting about
/// the club's current book, and must carry the fields its status needs.
async fn validate_book_outcome(
    state: &ServerState,
    m: &ClubMeeting,
    outcome: &BookOutcome,
) -> AppResult<()> {
    if m.meeting_type != MeetingType::Discussion {
        return Err(AppError::business_rule(
            "Book outcome is only allowed for discussion meetings".to_string(),
        ));
    }

    let c = club::get(&state.pool, m.club_id).await?;
    match (m.book_id, c.current_book_id) {
        (Some(meeting_book), Some(current)) if meeting_book == current => {}
        _ => {
            return Err(AppError::business_rule(
                "Book outcome requires the meeting's book to be the club's current book"
                    .to_string(),
            ));
        }
    }

    validate_required_text(&outcome.notes, "book_outcome.notes", MAX_NOTE_LEN)?;
    match outcome.status {
        ClubBookStatus::Completed => {
            let rating = outcome.rating.ok_or_else(|| {
                AppError::validation("book_outcome.rating is required to complete".to_string())
            })?;
            cycle::validate_rating(rating).map_err(AppError::validation)?;
        }
        ClubBookStatus::Abandoned => {
            let code = outcome.reason_code.ok_or_else(|| {
                AppError::validation("book_outcome.reason_code is required to abandon".to_string())
            })?;
            cycle::validate_reason_code(code).map_err(AppError::validation)?;
        }
        ClubBookStatus::InProgress => {
            return Err(AppError::validation(
                "book_outcome.status must be COMPLETED or ABANDONED".to_string(),
            ));
        }
    }
    Ok(())
}

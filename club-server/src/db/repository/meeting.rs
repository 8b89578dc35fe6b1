//! Club Meeting Repository
//!
//! Meetings move SCHEDULED → COMPLETED | CANCELLED (both terminal).
//! Guarded updates restate the SCHEDULED precondition so a completed or
//! cancelled meeting can never be edited again.

use sqlx::SqlitePool;

use shared::models::{
    AttendanceMark, BookOutcome, ClubBookStatus, ClubMeeting, MeetingAttendee, MeetingCreate,
    MeetingUpdate, RsvpStatus,
};

use super::{club_book, RepoError, RepoResult};

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<ClubMeeting>> {
    let m = sqlx::query_as::<_, ClubMeeting>(
        "SELECT id, club_id, title, description, meeting_date, location, meeting_type, status, book_id, meeting_notes, completed_at, created_by, created_at, updated_at FROM club_meeting WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(m)
}

pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<ClubMeeting> {
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Meeting {id} not found")))
}

pub async fn find_by_club(pool: &SqlitePool, club_id: i64) -> RepoResult<Vec<ClubMeeting>> {
    let rows = sqlx::query_as::<_, ClubMeeting>(
        "SELECT id, club_id, title, description, meeting_date, location, meeting_type, status, book_id, meeting_notes, completed_at, created_by, created_at, updated_at FROM club_meeting WHERE club_id = ? ORDER BY meeting_date DESC",
    )
    .bind(club_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(
    pool: &SqlitePool,
    club_id: i64,
    created_by: i64,
    data: &MeetingCreate,
) -> RepoResult<ClubMeeting> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    sqlx::query(
        "INSERT INTO club_meeting (id, club_id, title, description, meeting_date, location, meeting_type, status, book_id, created_by, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'SCHEDULED', ?8, ?9, ?10, ?10)",
    )
    .bind(id)
    .bind(club_id)
    .bind(&data.title)
    .bind(&data.description)
    .bind(data.meeting_date)
    .bind(&data.location)
    .bind(data.meeting_type)
    .bind(data.book_id)
    .bind(created_by)
    .bind(now)
    .execute(pool)
    .await?;

    get(pool, id).await
}

/// Update a meeting's details. Only SCHEDULED meetings can be edited.
pub async fn update(pool: &SqlitePool, id: i64, data: &MeetingUpdate) -> RepoResult<ClubMeeting> {
    let now = shared::util::now_millis();

    let rows = sqlx::query(
        "UPDATE club_meeting SET \
             title = COALESCE(?1, title), \
             description = COALESCE(?2, description), \
             meeting_date = COALESCE(?3, meeting_date), \
             location = COALESCE(?4, location), \
             meeting_type = COALESCE(?5, meeting_type), \
             book_id = COALESCE(?6, book_id), \
             updated_at = ?7 \
         WHERE id = ?8 AND status = 'SCHEDULED'",
    )
    .bind(&data.title)
    .bind(&data.description)
    .bind(data.meeting_date)
    .bind(&data.location)
    .bind(data.meeting_type)
    .bind(data.book_id)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::State(format!(
            "Meeting {id} not found or no longer scheduled"
        )));
    }
    get(pool, id).await
}

/// Cancel a meeting. Irreversible.
pub async fn cancel(pool: &SqlitePool, id: i64) -> RepoResult<ClubMeeting> {
    let now = shared::util::now_millis();

    let rows = sqlx::query(
        "UPDATE club_meeting SET status = 'CANCELLED', updated_at = ? WHERE id = ? AND status = 'SCHEDULED'",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::State(format!(
            "Meeting {id} not found or no longer scheduled"
        )));
    }
    get(pool, id).await
}

pub async fn find_attendees(pool: &SqlitePool, meeting_id: i64) -> RepoResult<Vec<MeetingAttendee>> {
    let rows = sqlx::query_as::<_, MeetingAttendee>(
        "SELECT id, meeting_id, user_id, rsvp_status, actually_attended, marked_at FROM meeting_attendee WHERE meeting_id = ? ORDER BY id",
    )
    .bind(meeting_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Record a member's own RSVP. Upserts the attendee row; allowed only
/// while the meeting is still SCHEDULED.
pub async fn rsvp(
    pool: &SqlitePool,
    meeting_id: i64,
    user_id: i64,
    status: RsvpStatus,
) -> RepoResult<MeetingAttendee> {
    let meeting = get(pool, meeting_id).await?;
    if meeting.status != shared::models::MeetingStatus::Scheduled {
        return Err(RepoError::State(
            "RSVP is closed for this meeting".into(),
        ));
    }

    let id = shared::util::snowflake_id();

    sqlx::query(
        "INSERT INTO meeting_attendee (id, meeting_id, user_id, rsvp_status) VALUES (?1, ?2, ?3, ?4) \
         ON CONFLICT(meeting_id, user_id) DO UPDATE SET rsvp_status = ?4",
    )
    .bind(id)
    .bind(meeting_id)
    .bind(user_id)
    .bind(status)
    .execute(pool)
    .await?;

    let row = sqlx::query_as::<_, MeetingAttendee>(
        "SELECT id, meeting_id, user_id, rsvp_status, actually_attended, marked_at FROM meeting_attendee WHERE meeting_id = ? AND user_id = ?",
    )
    .bind(meeting_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    row.ok_or_else(|| RepoError::Database("Failed to record RSVP".into()))
}

/// Complete a meeting: status, notes, per-attendee attendance marks and —
/// when supplied — the current-book outcome, all in one transaction.
///
/// `marks` is the fully resolved attendance list (RSVP-derived defaults
/// with admin overrides already applied by the caller).
pub async fn complete(
    pool: &SqlitePool,
    meeting_id: i64,
    club_id: i64,
    notes: &str,
    marks: &[AttendanceMark],
    outcome: Option<&BookOutcome>,
) -> RepoResult<ClubMeeting> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "UPDATE club_meeting SET status = 'COMPLETED', meeting_notes = ?1, completed_at = ?2, updated_at = ?2 WHERE id = ?3 AND status = 'SCHEDULED'",
    )
    .bind(notes)
    .bind(now)
    .bind(meeting_id)
    .execute(&mut *tx)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::State(format!(
            "Meeting {meeting_id} not found or already completed"
        )));
    }

    for mark in marks {
        let id = shared::util::snowflake_id();
        sqlx::query(
            "INSERT INTO meeting_attendee (id, meeting_id, user_id, rsvp_status, actually_attended, marked_at) \
             VALUES (?1, ?2, ?3, 'NOT_RESPONDED', ?4, ?5) \
             ON CONFLICT(meeting_id, user_id) DO UPDATE SET actually_attended = ?4, marked_at = ?5",
        )
        .bind(id)
        .bind(meeting_id)
        .bind(mark.user_id)
        .bind(mark.attended)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    if let Some(outcome) = outcome {
        match outcome.status {
            ClubBookStatus::Completed => {
                let rating = outcome.rating.ok_or_else(|| {
                    RepoError::Validation("rating is required to complete the book".into())
                })?;
                club_book::complete_in_tx(&mut tx, club_id, rating, &outcome.notes, now).await?;
            }
            ClubBookStatus::Abandoned => {
                let reason = outcome.reason_code.ok_or_else(|| {
                    RepoError::Validation("reason_code is required to abandon the book".into())
                })?;
                club_book::abandon_in_tx(&mut tx, club_id, reason, &outcome.notes, now).await?;
            }
            ClubBookStatus::InProgress => {
                return Err(RepoError::Validation(
                    "Book outcome must be COMPLETED or ABANDONED".into(),
                ));
            }
        }
    }

    tx.commit().await?;
    get(pool, meeting_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{club, club_book, test_support::test_pool};
    use shared::models::{MeetingStatus, MeetingType};

    fn meeting_input(book_id: Option<i64>) -> MeetingCreate {
        MeetingCreate {
            title: "March discussion".into(),
            description: None,
            meeting_date: 1_700_000_000_000,
            location: Some("Library".into()),
            meeting_type: MeetingType::Discussion,
            book_id,
        }
    }

    #[tokio::test]
    async fn rsvp_upserts_per_member() {
        let pool = test_pool().await;
        let meeting = create(&pool, 10, 1, &meeting_input(None)).await.unwrap();

        let a = rsvp(&pool, meeting.id, 2, RsvpStatus::Maybe).await.unwrap();
        assert_eq!(a.rsvp_status, RsvpStatus::Maybe);

        let a = rsvp(&pool, meeting.id, 2, RsvpStatus::Attending).await.unwrap();
        assert_eq!(a.rsvp_status, RsvpStatus::Attending);

        assert_eq!(find_attendees(&pool, meeting.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn cancel_is_terminal() {
        let pool = test_pool().await;
        let meeting = create(&pool, 10, 1, &meeting_input(None)).await.unwrap();

        let m = cancel(&pool, meeting.id).await.unwrap();
        assert_eq!(m.status, MeetingStatus::Cancelled);

        // No edits, RSVPs or second cancellation afterwards
        assert!(cancel(&pool, meeting.id).await.is_err());
        assert!(rsvp(&pool, meeting.id, 2, RsvpStatus::Attending).await.is_err());
        let err = update(
            &pool,
            meeting.id,
            &MeetingUpdate {
                title: Some("new".into()),
                description: None,
                meeting_date: None,
                location: None,
                meeting_type: None,
                book_id: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::State(_)));
    }

    #[tokio::test]
    async fn complete_persists_marks_and_notes() {
        let pool = test_pool().await;
        let meeting = create(&pool, 10, 1, &meeting_input(None)).await.unwrap();
        rsvp(&pool, meeting.id, 2, RsvpStatus::Attending).await.unwrap();

        let marks = vec![
            AttendanceMark {
                user_id: 1,
                attended: true,
            },
            AttendanceMark {
                user_id: 2,
                attended: false,
            },
        ];
        let m = complete(&pool, meeting.id, 10, "Good turnout", &marks, None)
            .await
            .unwrap();
        assert_eq!(m.status, MeetingStatus::Completed);
        assert!(m.completed_at.is_some());
        assert_eq!(m.meeting_notes.as_deref(), Some("Good turnout"));

        let attendees = find_attendees(&pool, meeting.id).await.unwrap();
        assert_eq!(attendees.len(), 2);
        for a in &attendees {
            assert!(a.marked_at.is_some());
            match a.user_id {
                1 => assert_eq!(a.actually_attended, Some(true)),
                2 => assert_eq!(a.actually_attended, Some(false)),
                _ => unreachable!(),
            }
        }

        // Completion is terminal
        assert!(complete(&pool, meeting.id, 10, "again", &[], None).await.is_err());
    }

    #[tokio::test]
    async fn complete_with_book_outcome_closes_the_club_book() {
        let pool = test_pool().await;
        club_book::start(&pool, 10, 101).await.unwrap();
        let meeting = create(&pool, 10, 1, &meeting_input(Some(101))).await.unwrap();

        let outcome = BookOutcome {
            status: ClubBookStatus::Completed,
            rating: Some(5),
            reason_code: None,
            notes: "Loved it".into(),
        };
        complete(&pool, meeting.id, 10, "Wrapped up Dune", &[], Some(&outcome))
            .await
            .unwrap();

        let c = club::get(&pool, 10).await.unwrap();
        assert!(c.current_book_id.is_none());
        let history = club_book::find_history(&pool, 10).await.unwrap();
        assert_eq!(history[0].status, ClubBookStatus::Completed);
        assert_eq!(history[0].rating, Some(5));
    }

    #[tokio::test]
    async fn failed_outcome_rolls_back_the_meeting() {
        let pool = test_pool().await;
        // No club book in progress → outcome fails → whole completion rolls back
        let meeting = create(&pool, 10, 1, &meeting_input(Some(101))).await.unwrap();

        let outcome = BookOutcome {
            status: ClubBookStatus::Completed,
            rating: Some(4),
            reason_code: None,
            notes: "n".into(),
        };
        let err = complete(&pool, meeting.id, 10, "notes", &[], Some(&outcome))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::State(_)));

        let m = get(&pool, meeting.id).await.unwrap();
        assert_eq!(m.status, MeetingStatus::Scheduled);
    }
}

//! End-to-end club lifecycle against a real on-disk database:
//! voting cycle → winner selection → reading → completion, plus the
//! lazy-expiry path and meeting completion with a book outcome.

use club_server::db::repository::{club, club_book, meeting, membership, suggestion};
use club_server::db::DbService;
use club_server::meetings::attendance;
use club_server::voting::{self, cycle};
use sqlx::SqlitePool;

use shared::models::{
    AttendanceMark, BookOutcome, ClubBookStatus, CyclePhase, MeetingCreate, MeetingStatus,
    MeetingType, RsvpStatus,
};

const DAY: i64 = 86_400_000;

/// Fresh database in a temp dir, migrations applied, seed users/books/club.
async fn setup() -> (tempfile::TempDir, SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("club.db");
    let db = DbService::new(&db_path.to_string_lossy()).await.unwrap();
    let pool = db.pool;

    sqlx::query(
        "INSERT INTO user (id, username, password_hash, display_name, is_active, created_at, updated_at) VALUES \
         (1, 'alice', 'hash', 'Alice', 1, 0, 0), \
         (2, 'bob', 'hash', 'Bob', 1, 0, 0), \
         (3, 'carol', 'hash', 'Carol', 1, 0, 0)",
    )
    .execute(&pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO book (id, title, author, created_at) VALUES \
         (101, 'Dune', 'Frank Herbert', 0), \
         (102, 'Middlemarch', 'George Eliot', 0), \
         (103, 'Kindred', 'Octavia Butler', 0)",
    )
    .execute(&pool)
    .await
    .unwrap();

    (dir, pool)
}

#[tokio::test]
async fn full_voting_cycle_to_completed_book() {
    let (_dir, pool) = setup().await;

    let c = club::create(&pool, "Long Reads", None, 1).await.unwrap();
    membership::join(&pool, c.id, 2).await.unwrap();
    membership::join(&pool, c.id, 3).await.unwrap();

    // Start a 7-day cycle
    let now = shared::util::now_millis();
    let updated = club::start_voting(&pool, c.id, 1, now, now + 7 * DAY)
        .await
        .unwrap();
    assert!(updated.voting_cycle_active);
    assert!(cycle::window_open(&updated, now));

    // Two suggestions; Dune gets 2 votes, Middlemarch 1
    let dune = suggestion::create(&pool, c.id, 101, 2).await.unwrap();
    let middlemarch = suggestion::create(&pool, c.id, 102, 3).await.unwrap();
    suggestion::vote(&pool, dune.id, 1).await.unwrap();
    suggestion::vote(&pool, dune.id, 2).await.unwrap();
    suggestion::vote(&pool, middlemarch.id, 3).await.unwrap();

    // Admin ends voting early → single winner
    let (updated, suggestions) = voting::end_cycle(&pool, c.id).await.unwrap();
    assert!(!updated.voting_cycle_active);
    let winners: Vec<i64> = suggestions
        .iter()
        .filter(|s| s.is_winner)
        .map(|s| s.id)
        .collect();
    assert_eq!(winners, vec![dune.id]);

    // Winner becomes current book, history opens IN_PROGRESS
    let cb = club_book::start(&pool, c.id, 101).await.unwrap();
    assert_eq!(cb.status, ClubBookStatus::InProgress);
    let updated = club::get(&pool, c.id).await.unwrap();
    assert_eq!(updated.current_book_id, Some(101));

    // Suggestions were cleared for the next cycle
    assert!(suggestion::find_with_votes(&pool, c.id).await.unwrap().is_empty());

    // Mutual exclusion: no new cycle while a book is current
    assert!(club::start_voting(&pool, c.id, 1, now, now + DAY).await.is_err());

    // Complete the book → back to NoBook
    let cb = club_book::complete(&pool, c.id, 5, "A classic").await.unwrap();
    assert_eq!(cb.status, ClubBookStatus::Completed);
    let updated = club::get(&pool, c.id).await.unwrap();
    assert!(updated.current_book_id.is_none());
    assert_eq!(cycle::phase(&updated, false, now), CyclePhase::NoBook);
}

#[tokio::test]
async fn elapsed_cycle_resolves_on_read() {
    let (_dir, pool) = setup().await;

    let c = club::create(&pool, "Slow Readers", None, 1).await.unwrap();
    membership::join(&pool, c.id, 2).await.unwrap();

    // Cycle started 8 days ago with a 7-day window
    let now = shared::util::now_millis();
    club::start_voting(&pool, c.id, 1, now - 8 * DAY, now - DAY)
        .await
        .unwrap();
    let s = suggestion::create(&pool, c.id, 103, 2).await.unwrap();

    // Window already elapsed, flag still set
    let stale = club::get(&pool, c.id).await.unwrap();
    assert!(!cycle::window_open(&stale, now));
    assert_eq!(cycle::phase(&stale, false, now), CyclePhase::VotingExpired);

    // The next read resolves the expired cycle without any explicit end call
    let resolved = voting::resolve_expired_cycle(&pool, stale, now).await.unwrap();
    assert!(!resolved.voting_cycle_active);

    let suggestions = suggestion::find_with_votes(&pool, c.id).await.unwrap();
    assert!(suggestions[0].is_winner);
    assert_eq!(suggestions[0].id, s.id);
    assert_eq!(cycle::phase(&resolved, true, now), CyclePhase::WinnerPending);

    // Resolving again is a no-op
    let again = voting::resolve_expired_cycle(&pool, resolved.clone(), now)
        .await
        .unwrap();
    assert_eq!(again.voting_cycle_active, resolved.voting_cycle_active);
}

#[tokio::test]
async fn meeting_completion_with_book_outcome_and_seeded_attendance() {
    let (_dir, pool) = setup().await;

    let c = club::create(&pool, "Discussion Group", None, 1).await.unwrap();
    membership::join(&pool, c.id, 2).await.unwrap();
    membership::join(&pool, c.id, 3).await.unwrap();

    club_book::start(&pool, c.id, 101).await.unwrap();

    let m = meeting::create(
        &pool,
        c.id,
        1,
        &MeetingCreate {
            title: "Dune wrap-up".into(),
            description: None,
            meeting_date: shared::util::now_millis(),
            location: Some("Cafe".into()),
            meeting_type: MeetingType::Discussion,
            book_id: Some(101),
        },
    )
    .await
    .unwrap();

    meeting::rsvp(&pool, m.id, 2, RsvpStatus::Attending).await.unwrap();
    meeting::rsvp(&pool, m.id, 3, RsvpStatus::NotAttending).await.unwrap();

    // Bob defaults to attended, Carol to absent; admin overrides Carol
    let attendees = meeting::find_attendees(&pool, m.id).await.unwrap();
    let marks = attendance::seed_attendance(
        &attendees,
        &[AttendanceMark {
            user_id: 3,
            attended: true,
        }],
    );

    let outcome = BookOutcome {
        status: ClubBookStatus::Abandoned,
        rating: None,
        reason_code: Some(10),
        notes: "Half the club switched editions".into(),
    };
    let m = meeting::complete(&pool, m.id, c.id, "Short session", &marks, Some(&outcome))
        .await
        .unwrap();
    assert_eq!(m.status, MeetingStatus::Completed);

    let attendees = meeting::find_attendees(&pool, m.id).await.unwrap();
    let bob = attendees.iter().find(|a| a.user_id == 2).unwrap();
    let carol = attendees.iter().find(|a| a.user_id == 3).unwrap();
    assert_eq!(bob.actually_attended, Some(true));
    assert_eq!(carol.actually_attended, Some(true)); // override wins

    // Book outcome applied through the same abandon rules
    let history = club_book::find_history(&pool, c.id).await.unwrap();
    assert_eq!(history[0].status, ClubBookStatus::Abandoned);
    assert_eq!(
        history[0].discussion_notes.as_deref(),
        Some("Reason: 10\nNotes: Half the club switched editions")
    );
    let updated = club::get(&pool, c.id).await.unwrap();
    assert!(updated.current_book_id.is_none());
}

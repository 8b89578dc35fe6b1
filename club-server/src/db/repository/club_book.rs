//! Club Book History Repository
//!
//! One row per reading period. Rows are created IN_PROGRESS when a book
//! becomes current and transition exactly once to COMPLETED or ABANDONED;
//! afterwards they are immutable history.

use sqlx::{Sqlite, SqlitePool, Transaction};

use shared::models::ClubBook;

use super::{RepoError, RepoResult};

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<ClubBook>> {
    let row = sqlx::query_as::<_, ClubBook>(
        "SELECT id, club_id, book_id, status, started_at, finished_at, rating, discussion_notes, created_at, updated_at FROM club_book WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_history(pool: &SqlitePool, club_id: i64) -> RepoResult<Vec<ClubBook>> {
    let rows = sqlx::query_as::<_, ClubBook>(
        "SELECT id, club_id, book_id, status, started_at, finished_at, rating, discussion_notes, created_at, updated_at FROM club_book WHERE club_id = ? ORDER BY started_at DESC",
    )
    .bind(club_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_in_progress(pool: &SqlitePool, club_id: i64) -> RepoResult<Option<ClubBook>> {
    let row = sqlx::query_as::<_, ClubBook>(
        "SELECT id, club_id, book_id, status, started_at, finished_at, rating, discussion_notes, created_at, updated_at FROM club_book WHERE club_id = ? AND status = 'IN_PROGRESS'",
    )
    .bind(club_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Make a book current: set `current_book_id` and open an IN_PROGRESS
/// history row, clearing the suggestion slate for the next cycle. One
/// transaction; the guarded club update restates the preconditions.
pub async fn start(pool: &SqlitePool, club_id: i64, book_id: i64) -> RepoResult<ClubBook> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "UPDATE club SET current_book_id = ?, updated_at = ? WHERE id = ? AND current_book_id IS NULL AND voting_cycle_active = 0",
    )
    .bind(book_id)
    .bind(now)
    .bind(club_id)
    .execute(&mut *tx)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::State(
            "Club already has a current book or voting is still active".into(),
        ));
    }

    sqlx::query(
        "INSERT INTO club_book (id, club_id, book_id, status, started_at, created_at, updated_at) VALUES (?1, ?2, ?3, 'IN_PROGRESS', ?4, ?4, ?4)",
    )
    .bind(id)
    .bind(club_id)
    .bind(book_id)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    // Votes cascade with their suggestions
    sqlx::query("DELETE FROM book_suggestion WHERE club_id = ?")
        .bind(club_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to open club book record".into()))
}

/// Transition the active history row to COMPLETED within an existing
/// transaction and clear the club's current book.
pub async fn complete_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    club_id: i64,
    rating: i32,
    notes: &str,
    now: i64,
) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE club_book SET status = 'COMPLETED', finished_at = ?1, rating = ?2, discussion_notes = ?3, updated_at = ?1 WHERE club_id = ?4 AND status = 'IN_PROGRESS'",
    )
    .bind(now)
    .bind(rating)
    .bind(notes)
    .bind(club_id)
    .execute(&mut **tx)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::State("Club has no book in progress".into()));
    }

    sqlx::query("UPDATE club SET current_book_id = NULL, updated_at = ? WHERE id = ?")
        .bind(now)
        .bind(club_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Transition the active history row to ABANDONED within an existing
/// transaction and clear the club's current book. The reason code is an
/// opaque 1-10 vocabulary entry stored alongside the notes.
pub async fn abandon_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    club_id: i64,
    reason_code: i32,
    notes: &str,
    now: i64,
) -> RepoResult<()> {
    let combined = format!("Reason: {reason_code}\nNotes: {notes}");
    let rows = sqlx::query(
        "UPDATE club_book SET status = 'ABANDONED', finished_at = ?1, discussion_notes = ?2, updated_at = ?1 WHERE club_id = ?3 AND status = 'IN_PROGRESS'",
    )
    .bind(now)
    .bind(&combined)
    .bind(club_id)
    .execute(&mut **tx)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::State("Club has no book in progress".into()));
    }

    sqlx::query("UPDATE club SET current_book_id = NULL, updated_at = ? WHERE id = ?")
        .bind(now)
        .bind(club_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

/// Complete the club's current book (rating 1-5, notes recorded).
pub async fn complete(
    pool: &SqlitePool,
    club_id: i64,
    rating: i32,
    notes: &str,
) -> RepoResult<ClubBook> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;
    complete_in_tx(&mut tx, club_id, rating, notes, now).await?;
    tx.commit().await?;

    latest_terminal(pool, club_id).await
}

/// Abandon the club's current book with a reason code and notes.
pub async fn abandon(
    pool: &SqlitePool,
    club_id: i64,
    reason_code: i32,
    notes: &str,
) -> RepoResult<ClubBook> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;
    abandon_in_tx(&mut tx, club_id, reason_code, notes, now).await?;
    tx.commit().await?;

    latest_terminal(pool, club_id).await
}

async fn latest_terminal(pool: &SqlitePool, club_id: i64) -> RepoResult<ClubBook> {
    let row = sqlx::query_as::<_, ClubBook>(
        "SELECT id, club_id, book_id, status, started_at, finished_at, rating, discussion_notes, created_at, updated_at FROM club_book WHERE club_id = ? AND status != 'IN_PROGRESS' ORDER BY finished_at DESC LIMIT 1",
    )
    .bind(club_id)
    .fetch_optional(pool)
    .await?;
    row.ok_or_else(|| RepoError::Database("Failed to read club book record".into()))
}

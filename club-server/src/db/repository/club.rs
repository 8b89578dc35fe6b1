//! Club Repository
//!
//! Holds the voting-cycle fields of the club row. State preconditions
//! are checked before any write; the writes themselves restate the
//! precondition in their `WHERE` clause.

use sqlx::SqlitePool;

use shared::models::{Club, ClubSummary};

use super::{RepoError, RepoResult};

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Club>> {
    let club = sqlx::query_as::<_, Club>(
        "SELECT id, name, description, owner_id, current_book_id, voting_cycle_active, voting_starts_at, voting_ends_at, voting_started_by, created_at, updated_at FROM club WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(club)
}

pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<Club> {
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Club {id} not found")))
}

pub async fn find_all(pool: &SqlitePool, limit: i32, offset: i32) -> RepoResult<Vec<ClubSummary>> {
    let clubs = sqlx::query_as::<_, ClubSummary>(
        "SELECT c.id, c.name, c.description, c.owner_id, c.current_book_id, c.voting_cycle_active, \
         (SELECT COUNT(*) FROM club_membership m WHERE m.club_id = c.id AND m.status = 'ACTIVE') AS member_count \
         FROM club c ORDER BY c.created_at DESC LIMIT ? OFFSET ?",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok(clubs)
}

/// Create a club; the creator becomes its OWNER with an ACTIVE membership.
pub async fn create(
    pool: &SqlitePool,
    name: &str,
    description: Option<&str>,
    owner_id: i64,
) -> RepoResult<Club> {
    let club_id = shared::util::snowflake_id();
    let membership_id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO club (id, name, description, owner_id, voting_cycle_active, created_at, updated_at) VALUES (?, ?, ?, ?, 0, ?, ?)",
    )
    .bind(club_id)
    .bind(name)
    .bind(description)
    .bind(owner_id)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO club_membership (id, club_id, user_id, role, status, created_at, updated_at) VALUES (?, ?, ?, 'OWNER', 'ACTIVE', ?, ?)",
    )
    .bind(membership_id)
    .bind(club_id)
    .bind(owner_id)
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    get(pool, club_id).await
}

/// Start a voting cycle.
///
/// Rejected while a book is current or a cycle is already running —
/// voting only runs when there is no current book.
pub async fn start_voting(
    pool: &SqlitePool,
    club_id: i64,
    started_by: i64,
    starts_at: i64,
    ends_at: i64,
) -> RepoResult<Club> {
    let club = get(pool, club_id).await?;
    if club.current_book_id.is_some() {
        return Err(RepoError::State(
            "Cannot start voting while the club has a current book".into(),
        ));
    }
    if club.voting_cycle_active {
        return Err(RepoError::State("A voting cycle is already active".into()));
    }

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE club SET voting_cycle_active = 1, voting_starts_at = ?, voting_ends_at = ?, voting_started_by = ?, updated_at = ? \
         WHERE id = ? AND current_book_id IS NULL AND voting_cycle_active = 0",
    )
    .bind(starts_at)
    .bind(ends_at)
    .bind(started_by)
    .bind(now)
    .bind(club_id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::State(
            "Voting cycle could not be started (state changed)".into(),
        ));
    }
    get(pool, club_id).await
}

/// End the voting cycle: clear the active flag and flag the winning
/// suggestions (all ties) in one transaction.
pub async fn end_voting(pool: &SqlitePool, club_id: i64, winner_ids: &[i64]) -> RepoResult<Club> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "UPDATE club SET voting_cycle_active = 0, updated_at = ? WHERE id = ? AND voting_cycle_active = 1",
    )
    .bind(now)
    .bind(club_id)
    .execute(&mut *tx)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::State("No active voting cycle to end".into()));
    }

    for id in winner_ids {
        sqlx::query("UPDATE book_suggestion SET is_winner = 1 WHERE id = ? AND club_id = ?")
            .bind(id)
            .bind(club_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    get(pool, club_id).await
}

/// Admin override: set the current book directly, bypassing history.
///
/// Clears any voting-cycle fields so the mutual-exclusion invariant holds.
pub async fn set_current_book_override(
    pool: &SqlitePool,
    club_id: i64,
    book_id: i64,
) -> RepoResult<Club> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE club SET current_book_id = ?, voting_cycle_active = 0, voting_starts_at = NULL, voting_ends_at = NULL, voting_started_by = NULL, updated_at = ? WHERE id = ?",
    )
    .bind(book_id)
    .bind(now)
    .bind(club_id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Club {club_id} not found")));
    }
    get(pool, club_id).await
}

/// Admin override: clear the current book without recording history.
pub async fn clear_current_book_override(pool: &SqlitePool, club_id: i64) -> RepoResult<Club> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE club SET current_book_id = NULL, updated_at = ? WHERE id = ?")
        .bind(now)
        .bind(club_id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Club {club_id} not found")));
    }
    get(pool, club_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    #[tokio::test]
    async fn start_voting_sets_the_window() {
        let pool = test_pool().await;
        let club = start_voting(&pool, 10, 1, 1000, 1000 + 7 * 86_400_000)
            .await
            .unwrap();
        assert!(club.voting_cycle_active);
        assert_eq!(club.voting_starts_at, Some(1000));
        assert_eq!(club.voting_started_by, Some(1));
        assert!(club.current_book_id.is_none());
    }

    #[tokio::test]
    async fn start_voting_rejected_with_current_book() {
        let pool = test_pool().await;
        set_current_book_override(&pool, 10, 101).await.unwrap();

        let err = start_voting(&pool, 10, 1, 1000, 2000).await.unwrap_err();
        assert!(matches!(err, RepoError::State(_)));
    }

    #[tokio::test]
    async fn start_voting_rejected_while_active() {
        let pool = test_pool().await;
        start_voting(&pool, 10, 1, 1000, 2000).await.unwrap();
        let err = start_voting(&pool, 10, 1, 1000, 2000).await.unwrap_err();
        assert!(matches!(err, RepoError::State(_)));
    }

    #[tokio::test]
    async fn override_set_clears_voting_fields() {
        let pool = test_pool().await;
        start_voting(&pool, 10, 1, 1000, 2000).await.unwrap();

        let club = set_current_book_override(&pool, 10, 102).await.unwrap();
        assert_eq!(club.current_book_id, Some(102));
        assert!(!club.voting_cycle_active);
        assert!(club.voting_ends_at.is_none());
    }

    #[tokio::test]
    async fn end_voting_requires_active_cycle() {
        let pool = test_pool().await;
        let err = end_voting(&pool, 10, &[]).await.unwrap_err();
        assert!(matches!(err, RepoError::State(_)));
    }
}

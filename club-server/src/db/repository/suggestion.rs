//! Book Suggestion & Vote Repository

use sqlx::SqlitePool;

use shared::models::{BookSuggestion, SuggestionWithVotes};

use super::{is_unique_violation, RepoError, RepoResult};

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<BookSuggestion>> {
    let s = sqlx::query_as::<_, BookSuggestion>(
        "SELECT id, club_id, book_id, suggested_by, is_winner, created_at FROM book_suggestion WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(s)
}

/// Suggestions for a club with live vote counts, most-voted first.
pub async fn find_with_votes(
    pool: &SqlitePool,
    club_id: i64,
) -> RepoResult<Vec<SuggestionWithVotes>> {
    let rows = sqlx::query_as::<_, SuggestionWithVotes>(
        "SELECT s.id, s.club_id, s.book_id, b.title AS book_title, s.suggested_by, s.is_winner, \
         (SELECT COUNT(*) FROM suggestion_vote v WHERE v.suggestion_id = s.id) AS vote_count \
         FROM book_suggestion s JOIN book b ON b.id = s.book_id \
         WHERE s.club_id = ? ORDER BY vote_count DESC, s.created_at",
    )
    .bind(club_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn create(
    pool: &SqlitePool,
    club_id: i64,
    book_id: i64,
    suggested_by: i64,
) -> RepoResult<BookSuggestion> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    sqlx::query(
        "INSERT INTO book_suggestion (id, club_id, book_id, suggested_by, is_winner, created_at) VALUES (?, ?, ?, ?, 0, ?)",
    )
    .bind(id)
    .bind(club_id)
    .bind(book_id)
    .bind(suggested_by)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            RepoError::Duplicate("This book has already been suggested".into())
        } else {
            e.into()
        }
    })?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create suggestion".into()))
}

/// Cast one member vote; a second vote on the same suggestion is a conflict.
pub async fn vote(pool: &SqlitePool, suggestion_id: i64, user_id: i64) -> RepoResult<()> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    sqlx::query(
        "INSERT INTO suggestion_vote (id, suggestion_id, user_id, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(id)
    .bind(suggestion_id)
    .bind(user_id)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            RepoError::Duplicate("You already voted for this suggestion".into())
        } else {
            e.into()
        }
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    #[tokio::test]
    async fn duplicate_suggestion_is_a_conflict() {
        let pool = test_pool().await;
        create(&pool, 10, 101, 1).await.unwrap();
        let err = create(&pool, 10, 101, 2).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn votes_accumulate_and_deduplicate() {
        let pool = test_pool().await;
        let s = create(&pool, 10, 101, 1).await.unwrap();

        vote(&pool, s.id, 1).await.unwrap();
        vote(&pool, s.id, 2).await.unwrap();
        let err = vote(&pool, s.id, 2).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));

        let rows = find_with_votes(&pool, 10).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].vote_count, 2);
        assert_eq!(rows[0].book_title, "Dune");
    }
}
